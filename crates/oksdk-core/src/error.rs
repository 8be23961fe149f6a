//! Error types for the OK SDK core.

use thiserror::Error;

/// Errors that can occur in the pure core primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed launch parameter {key:?}: {reason}")]
    MalformedLaunchParameters { key: String, reason: String },

    #[error("base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
