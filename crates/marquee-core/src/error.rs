use marquee_api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("config error: {0}")]
    Config(String),

    #[error("session store error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// True when the failure means the server no longer accepts the
    /// session credential and the user must sign in again.
    pub fn is_auth(&self) -> bool {
        matches!(self, CoreError::Api(e) if e.is_auth())
    }
}
