//! # OK SDK REST
//!
//! Signed REST calls and the correlation of their out-of-band responses.
//!
//! ## Overview
//!
//! A call is canonicalized and signed, registered under a fresh callback
//! id, and handed to a [`Transport`] as a URL. The remote endpoint later
//! answers `(status, data, error)` for that id, which the host forwards to
//! [`Dispatcher::complete`]. Each handler fires exactly once; there is no
//! timeout, retry or cancellation.
//!
//! ## Call Lifecycle
//!
//! ```text
//! caller              Dispatcher            Transport          remote
//!   |-- dispatch -------->|                      |                 |
//!   |                     |-- register(id)       |                 |
//!   |                     |-- load(url, id) ---->|---- GET ------->|
//!   |<-- id --------------|                      |                 |
//!   |                     |<-------- complete(id, status, data, error)
//!   |<-- handler(status, data, error)            |                 |
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use oksdk_core::{ClientState, Params};
//! use oksdk_rest::{memory::MemoryTransport, CallOptions, Dispatcher};
//!
//! let transport = Arc::new(MemoryTransport::new());
//! let dispatcher = Dispatcher::new(transport.clone());
//! let state = ClientState::new(512000, "APPKEY", "https://api.ok.ru/")
//!     .with_session_key("session")
//!     .with_session_secret_key("secret");
//!
//! let id = dispatcher
//!     .dispatch(&state, "users.getCurrentUser", Params::new(), None, CallOptions::default())
//!     .unwrap();
//! assert_eq!(transport.request_count(), 1);
//! assert!(dispatcher.complete_raw(id.as_str(), "ok", serde_json::Value::Null, serde_json::Value::Null));
//! ```

pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod request;
pub mod response;
pub mod transport;

pub use dispatcher::{Dispatcher, PendingReply};
pub use error::{RestError, Result};
pub use registry::{CallbackId, CallbackRegistry, PendingCall, CALLBACK_PREFIX};
pub use request::{CallOptions, SignedRequest};
pub use response::{
    handler, payload_to_string, wrap_callback, wrap_callback_with, CallStatus, FailureHandler,
    RestHandler, RestResponse, SuccessHandler,
};
pub use transport::{memory, Transport};
