//! # OK SDK Core
//!
//! Pure primitives for the OK platform client: digest, UTF-8 codec,
//! launch parameters, canonicalization and request signing.
//!
//! This crate contains no I/O and no transport. It is pure computation
//! over strings and bytes.
//!
//! ## Key Types
//!
//! - [`Md5Digest`] - 128-bit digest used for every platform signature
//! - [`Params`] - Ordered string map for call and launch parameters
//! - [`ClientState`] - Identity and session resolved at initialization
//! - [`AuthMode`] - Whether a call carries credentials and a signature
//!
//! ## Signing
//!
//! ```rust
//! use oksdk_core::{canonicalize, sign, AuthMode, ClientState, Params};
//!
//! let state = ClientState::new(512000, "APPKEY", "https://api.ok.ru/")
//!     .with_session_key("session")
//!     .with_session_secret_key("secret");
//!
//! let params = canonicalize(
//!     &Params::new().with("method", "users.getCurrentUser"),
//!     &state,
//!     AuthMode::Session,
//! );
//! let sig = sign(&params, state.signing_secret());
//! assert_eq!(sig.to_hex().len(), 32);
//! ```

pub mod canonical;
pub mod digest;
pub mod error;
pub mod params;
pub mod signature;
pub mod state;
pub mod utf8;
pub mod util;

pub use canonical::{canonical_string, canonicalize, RESPONSE_FORMAT};
pub use digest::{md5_hex, Md5, Md5Digest};
pub use error::{CoreError, Result};
pub use params::{keys, LaunchParameters, Params};
pub use signature::{sign, sign_raw};
pub use state::{AuthMode, ClientState, Credential, DEFAULT_API_SERVER, REST_ENDPOINT};
pub use utf8::{decode_utf8, encode_utf8};
pub use util::{decode_base64, encode_base64};
