//! # OK SDK Testkit
//!
//! Testing utilities for the OK SDK.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known digests and signatures for cross-implementation verification
//! - **Generators**: Proptest strategies for parameter maps, secrets and launch queries
//! - **Fixtures**: An initialized SDK over an in-memory window and transport
//!
//! ## Golden Vectors
//!
//! ```rust
//! use oksdk_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, hex) in verify_all_vectors() {
//!     assert!(matches, "{name}: {hex}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use oksdk_testkit::generators::{params, secret};
//!
//! proptest! {
//!     #[test]
//!     fn signature_is_deterministic(params in params(8), secret in secret()) {
//!         prop_assert_eq!(sign(&params, &secret), sign(&params, &secret));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use oksdk_testkit::fixtures::TestFixture;
//!
//! let mut fixture = TestFixture::session();
//! let sdk = fixture.ready();
//! assert!(sdk.state().session_key().is_some());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{recording_callbacks, InitEvent, TestFixture};
