use std::path::PathBuf;

use marquee_api::types::User;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::CoreError;

/// Session state persisted across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub user: User,
    /// Opaque `Cookie` header value captured from the connection after
    /// login. The store only carries it; the connection layer consumes it.
    pub cookie: Option<String>,
}

/// Holds the signed-in user for the lifetime of the process and persists
/// the session as JSON in the platform data dir.
///
/// Written only by the login and logout flows; everything else reads the
/// current user through [`SessionStore::current`].
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    session: Option<StoredSession>,
}

impl SessionStore {
    /// Open the store at `path`, loading a persisted session if one exists.
    /// An unreadable file is treated as signed out.
    pub fn open(path: PathBuf) -> Self {
        let session = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "discarding unreadable session file");
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read session file");
                None
            }
        };

        if let Some(stored) = &session {
            debug!(username = %stored.user.username, "restored session");
        }
        Self { path, session }
    }

    pub fn open_default() -> Self {
        Self::open(AppConfig::session_path())
    }

    pub fn current(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn cookie(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.cookie.as_deref())
    }

    /// Record a fresh login and persist it.
    pub fn set(&mut self, user: User, cookie: Option<String>) -> Result<(), CoreError> {
        self.session = Some(StoredSession { user, cookie });
        self.save()
    }

    /// Drop the session and its persisted file.
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.session = None;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self) -> Result<(), CoreError> {
        let Some(session) = &self.session else {
            return Ok(());
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            serde_json::to_string_pretty(session).map_err(|e| CoreError::Session(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
