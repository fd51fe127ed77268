//! Error types for ainotes.

use thiserror::Error;

/// Result type alias using ainotes' Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ainotes operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Remote store could not be contacted or rejected the request.
    ///
    /// Always recoverable: the sync engine falls back to the local cache.
    #[error("Remote store unreachable: {0}")]
    Unreachable(String),

    /// Refine service is not configured (e.g. missing API key).
    #[error("AI service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Refine call was attempted and failed.
    #[error("Refinement failed: {0}")]
    RefinementFailed(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error came from the remote store and should degrade to
    /// local-only behavior rather than reach the caller.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Error::Unreachable(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Unreachable(e.to_string())
    }
}
