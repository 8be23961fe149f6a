//! Pending-call registry.
//!
//! Every dispatched call gets a process-unique callback id. The pending
//! call is registered before the transport starts loading, so a response
//! that arrives immediately still finds its handler. Completing a call
//! removes it; ids are never reused.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::response::RestHandler;

/// Namespace prefix for generated callback ids.
pub const CALLBACK_PREFIX: &str = "__oksdk__callback_";

/// Identifier correlating a remote response with its originating call.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallbackId(String);

impl CallbackId {
    /// Build the id for the given counter value.
    pub fn new(prefix: &str, counter: u64) -> Self {
        Self(format!("{}{}", prefix, counter))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallbackId({})", self.0)
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallbackId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CallbackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An in-flight call awaiting its single completion.
pub struct PendingCall {
    /// The call's id.
    pub id: CallbackId,
    /// The method name, kept for diagnostics.
    pub method: String,
    /// Caller handler; `None` means the result is ignored.
    pub handler: Option<RestHandler>,
}

impl fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCall")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// Registry of pending calls keyed by callback id.
pub struct CallbackRegistry {
    prefix: String,
    counter: AtomicU64,
    pending: Mutex<HashMap<CallbackId, PendingCall>>,
}

impl CallbackRegistry {
    /// Create a registry using [`CALLBACK_PREFIX`].
    pub fn new() -> Self {
        Self::with_prefix(CALLBACK_PREFIX)
    }

    /// Create a registry with a custom id prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Allocate a fresh id and register the call under it.
    pub fn register(&self, method: &str, handler: Option<RestHandler>) -> CallbackId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let id = CallbackId::new(&self.prefix, n);
        let call = PendingCall {
            id: id.clone(),
            method: method.to_string(),
            handler,
        };
        self.lock().insert(id.clone(), call);
        id
    }

    /// Remove and return a pending call.
    ///
    /// Returns `None` for unknown or already completed ids.
    pub fn take(&self, id: &str) -> Option<PendingCall> {
        self.lock().remove(&CallbackId::from(id))
    }

    /// Whether a call is still pending.
    pub fn is_pending(&self, id: &str) -> bool {
        self.lock().contains_key(&CallbackId::from(id))
    }

    /// Number of calls still awaiting completion.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CallbackId, PendingCall>> {
        // Handlers never run under the lock, so a poisoned map is still consistent
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("prefix", &self.prefix)
            .field("pending", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_monotonic_and_prefixed() {
        let registry = CallbackRegistry::new();
        let a = registry.register("users.getInfo", None);
        let b = registry.register("friends.get", None);

        assert_eq!(a.as_str(), "__oksdk__callback_1");
        assert_eq!(b.as_str(), "__oksdk__callback_2");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_take_is_exactly_once() {
        let registry = CallbackRegistry::new();
        let id = registry.register("users.getInfo", None);

        let call = registry.take(id.as_str()).expect("pending call");
        assert_eq!(call.method, "users.getInfo");
        assert!(registry.take(id.as_str()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_completion() {
        let registry = CallbackRegistry::with_prefix("cb_");
        let first = registry.register("a", None);
        registry.take(first.as_str());
        let second = registry.register("b", None);

        assert_ne!(first, second);
        assert_eq!(second.to_string(), "cb_2");
    }

    #[test]
    fn test_unknown_id() {
        let registry = CallbackRegistry::new();
        assert!(registry.take("__oksdk__callback_99").is_none());
        assert!(!registry.is_pending("__oksdk__callback_99"));
    }

    proptest! {
        #[test]
        fn test_any_completion_order_takes_each_once(
            order in Just((0..16usize).collect::<Vec<_>>()).prop_shuffle()
        ) {
            let registry = CallbackRegistry::new();
            let ids: Vec<_> = (0..16)
                .map(|i| registry.register(&format!("method.{i}"), None))
                .collect();

            let distinct: HashSet<_> = ids.iter().map(|id| id.as_str().to_string()).collect();
            prop_assert_eq!(distinct.len(), ids.len());

            for i in order {
                let call = registry.take(ids[i].as_str());
                prop_assert_eq!(call.map(|c| c.method), Some(format!("method.{i}")));
            }
            prop_assert!(registry.is_empty());
        }
    }
}
