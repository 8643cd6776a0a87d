//! Error types for media-note

use thiserror::Error;

/// Result type alias for media-note operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when ingesting a message context
///
/// Note building itself is infallible; only the typed JSON boundary can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
