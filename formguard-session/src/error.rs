//! Error types for session operations.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-specific errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Value could not be converted to or from JSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid expiration or namespace settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid namespace name
    #[error("Invalid namespace name: {0}")]
    InvalidNamespace(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}
