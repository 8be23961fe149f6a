//! Error types for the REST layer.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while dispatching or awaiting a REST call.
#[derive(Debug, Error)]
pub enum RestError {
    /// The transport refused to start loading the request.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote endpoint answered with a non-ok status.
    #[error("remote call failed: {0}")]
    Remote(Value),

    /// The dispatcher went away before the call completed.
    #[error("call abandoned before completion")]
    Abandoned,
}

/// Result type for REST operations.
pub type Result<T> = std::result::Result<T, RestError>;
