//! # OK SDK
//!
//! Client SDK for the OK social platform.
//!
//! ## Overview
//!
//! [`Sdk::init`] resolves the session from the page location, either the
//! platform session injected by the container or an OAuth access token
//! from the redirect flow, and redirects to the OAuth page when neither
//! is present. The initialized [`Sdk`] makes signed REST calls, opens the
//! payment page and the platform widgets.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                      Sdk                        │
//! ├──────────────┬──────────────┬───────────────────┤
//! │   Session    │   Payment    │     Widgets       │
//! │  Resolution  │    Page      │                   │
//! ├──────────────┴──────────────┴───────────────────┤
//! │            oksdk-rest (Dispatcher)              │
//! ├─────────────────────────────────────────────────┤
//! │     oksdk-core (digest, params, signing)        │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use oksdk::{memory::MemoryWindow, InitCallbacks, InitConfig, Initialized, Sdk, SdkConfig};
//! use oksdk_rest::memory::MemoryTransport;
//!
//! let window = Arc::new(MemoryWindow::new(
//!     "https://app.example/?api_server=https%3A%2F%2Fapi.ok.ru%2F&session_key=sk&session_secret_key=secret",
//! ));
//! let transport = Arc::new(MemoryTransport::new());
//!
//! let initialized = Sdk::init(
//!     InitConfig::new(512000, "CBAFJIICABABABABA"),
//!     SdkConfig::default(),
//!     window,
//!     transport.clone(),
//!     InitCallbacks::new(),
//! )
//! .unwrap();
//!
//! let Initialized::Ready(sdk) = initialized else { unreachable!() };
//! sdk.call_wrapped("users.getCurrentUser", Default::default(), None, None).unwrap();
//! assert_eq!(transport.request_count(), 1);
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod payment;
pub mod sdk;
pub mod session;
pub mod widgets;

pub use config::{InitConfig, OAuthConfig, SdkConfig};
pub use error::{Result, SdkError, SessionError};
pub use host::{memory, HostWindow};
pub use payment::payment_url;
pub use sdk::{InitCallbacks, Initialized, Sdk, SdkToken};
pub use session::{oauth_authorize_url, Resolution, SessionPhase, SessionResolver};
pub use widgets::{widget_url, WidgetCommand};

pub use oksdk_core::{decode_base64, decode_utf8, encode_base64, encode_utf8, md5_hex, Params};
pub use oksdk_rest::{payload_to_string, CallOptions, CallStatus, CallbackId, PendingReply};
