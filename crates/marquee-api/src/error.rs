use thiserror::Error;

/// Errors from the catalog service clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("session rejected (status 401): {message}")]
    Auth { message: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether this failure means the session is missing or no longer
    /// accepted by the server. A 401 response is the sole trigger;
    /// transport failures and malformed bodies classify as generic.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth { .. })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
