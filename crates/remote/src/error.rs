//! Error types for the remote store.

use simplesheet_sheet::SheetError;
use thiserror::Error;

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors raised while talking to the spreadsheet service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Credentials are missing or unusable. Raised before any request is sent.
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// The token endpoint rejected the service account.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The API answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RemoteError {
    /// Create a credentials error.
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials(message.into())
    }
}

impl From<RemoteError> for SheetError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Credentials(message) => SheetError::InvalidParameter(message),
            other => SheetError::Remote(other.to_string()),
        }
    }
}
