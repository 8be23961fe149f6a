//! Error types for the SDK.

use oksdk_core::CoreError;
use oksdk_rest::RestError;
use thiserror::Error;

/// Errors that stop session resolution.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Application id or key missing from the configuration.
    #[error("Required arguments app_id/app_key not passed")]
    MissingCredentials,

    /// The platform reported an authorization failure in the fragment.
    #[error("Error with OAUTH authorization: {0}")]
    OAuth(String),

    /// Launch parameters could not be decoded.
    #[error("malformed launch parameters: {0}")]
    MalformedLaunchParameters(#[from] CoreError),

    /// The legacy `sdk.init` handshake failed.
    #[error("Initialization error: {0}")]
    Handshake(String),
}

/// Errors that can occur during SDK operations.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Session resolution error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// REST dispatch error.
    #[error("rest error: {0}")]
    Rest(#[from] RestError),

    /// Core primitive error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;
