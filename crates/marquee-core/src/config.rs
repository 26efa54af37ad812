use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Root URL of the catalog service.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load config: user file if it exists, built-in defaults otherwise.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::config_path())
    }

    fn load_from(path: &Path) -> Result<Self, CoreError> {
        if path.exists() {
            let user_str =
                std::fs::read_to_string(path).map_err(|e| CoreError::Config(e.to_string()))?;
            toml::from_str(&user_str).map_err(|e| CoreError::Config(e.to_string()))
        } else {
            toml::from_str(DEFAULT_CONFIG).map_err(|e| CoreError::Config(e.to_string()))
        }
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::config_path())
    }

    fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to the user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the persisted session file.
    pub fn session_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("session.json"))
            .unwrap_or_else(|| PathBuf::from("session.json"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "marquee")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
