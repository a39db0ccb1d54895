//! Error types for s3helper
//!
//! Provider errors are sorted into a handful of categories so they can be
//! reported consistently. Callers treat every category the same way.

use thiserror::Error;

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by s3helper operations
#[derive(Debug, Error)]
pub enum Error {
    /// The bucket, object or policy does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials were rejected or the identity lacks permission
    #[error("Access denied: {0}")]
    Auth(String),

    /// The request conflicts with existing state (bucket exists, bucket not empty)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other request-level error reported by the provider
    #[error("Client error ({code}): {message}")]
    Client { code: String, message: String },

    /// Transport failure: timeout, dispatch error, malformed response
    #[error("Network error: {0}")]
    Network(String),

    /// Local filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A local path that cannot be used as requested
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("{0}")]
    General(String),
}

impl Error {
    /// Whether the error was reported by the provider rather than produced locally
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::Auth(_) | Error::Conflict(_) | Error::Client { .. }
        )
    }
}
