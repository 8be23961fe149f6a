//! Transport abstraction for REST calls.
//!
//! A transport starts loading the signed request URL. It does not wait
//! for the answer: the remote side later reports `(status, data, error)`
//! for the embedded callback id, and the host forwards that to
//! [`Dispatcher::complete`](crate::Dispatcher::complete). In a browser
//! this is a script-tag load whose response invokes a global function.

use crate::error::Result;
use crate::registry::CallbackId;

/// Transport trait for starting remote loads.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait Transport: Send + Sync {
    /// Start loading `url`. The remote is expected to answer once for
    /// `callback`, at some later time.
    ///
    /// An error means the load never started; the call is then dropped
    /// without invoking its handler.
    fn load(&self, url: &str, callback: &CallbackId) -> Result<()>;
}

/// A simple in-memory transport for testing.
///
/// Records every requested load so tests can answer them in any order.
pub mod memory {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use crate::error::RestError;

    /// A load request captured by [`MemoryTransport`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LoadRequest {
        pub url: String,
        pub callback: CallbackId,
    }

    impl LoadRequest {
        /// The query parameter value for `key`, decoded.
        pub fn param(&self, key: &str) -> Option<String> {
            let (_, query) = self.url.split_once('?')?;
            oksdk_core::Params::parse(query)
                .ok()?
                .get(key)
                .map(str::to_string)
        }
    }

    #[derive(Debug, Default)]
    struct Inner {
        requests: VecDeque<LoadRequest>,
        fail_next: Option<String>,
    }

    /// In-memory transport implementation.
    #[derive(Debug, Default)]
    pub struct MemoryTransport {
        inner: Mutex<Inner>,
    }

    impl MemoryTransport {
        /// Create an empty transport.
        pub fn new() -> Self {
            Self::default()
        }

        /// Make the next `load` fail with the given reason.
        pub fn fail_next(&self, reason: impl Into<String>) {
            self.lock().fail_next = Some(reason.into());
        }

        /// Remove and return every recorded load, oldest first.
        pub fn take_requests(&self) -> Vec<LoadRequest> {
            self.lock().requests.drain(..).collect()
        }

        /// Remove and return the oldest recorded load.
        pub fn pop_request(&self) -> Option<LoadRequest> {
            self.lock().requests.pop_front()
        }

        /// Number of loads not yet taken.
        pub fn request_count(&self) -> usize {
            self.lock().requests.len()
        }

        fn lock(&self) -> MutexGuard<'_, Inner> {
            self.inner.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl Transport for MemoryTransport {
        fn load(&self, url: &str, callback: &CallbackId) -> Result<()> {
            let mut inner = self.lock();
            if let Some(reason) = inner.fail_next.take() {
                return Err(RestError::Transport(reason));
            }
            inner.requests.push_back(LoadRequest {
                url: url.to_string(),
                callback: callback.clone(),
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryTransport;
    use super::*;
    use crate::error::RestError;

    #[test]
    fn test_memory_transport_records_loads() {
        let transport = MemoryTransport::new();
        let id = CallbackId::from("__oksdk__callback_1");

        transport
            .load("https://api.ok.ru/fb.do?method=a&js_callback=__oksdk__callback_1", &id)
            .unwrap();

        assert_eq!(transport.request_count(), 1);
        let request = transport.pop_request().unwrap();
        assert_eq!(request.callback, id);
        assert_eq!(request.param("method").as_deref(), Some("a"));
        assert_eq!(request.param("js_callback").as_deref(), Some("__oksdk__callback_1"));
        assert!(transport.pop_request().is_none());
    }

    #[test]
    fn test_memory_transport_failure_is_one_shot() {
        let transport = MemoryTransport::new();
        let id = CallbackId::from("x");

        transport.fail_next("offline");
        assert!(matches!(transport.load("u", &id), Err(RestError::Transport(r)) if r == "offline"));
        assert!(transport.load("u", &id).is_ok());
        assert_eq!(transport.take_requests().len(), 1);
    }
}
