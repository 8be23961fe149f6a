//! REST call dispatcher.
//!
//! Builds the signed request, registers the pending call, starts the
//! transport load and later routes the single completion back to the
//! caller's handler.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use oksdk_core::{ClientState, Params};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::{RestError, Result};
use crate::registry::{CallbackId, CallbackRegistry};
use crate::request::{CallOptions, SignedRequest};
use crate::response::{CallStatus, RestHandler, RestResponse};
use crate::transport::Transport;

/// Dispatches signed calls and correlates their completions.
///
/// Cloning is cheap; clones share the transport and the registry.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    registry: Arc<CallbackRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher over the given transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_registry(transport, CallbackRegistry::new())
    }

    /// Create a dispatcher with a custom registry (e.g. another id prefix).
    pub fn with_registry(transport: Arc<dyn Transport>, registry: CallbackRegistry) -> Self {
        Self {
            transport,
            registry: Arc::new(registry),
        }
    }

    /// Dispatch a call.
    ///
    /// The handler fires once, when [`complete`](Self::complete) is called
    /// with the returned id. If the transport cannot start the load the
    /// call is unregistered, the handler is dropped unfired and the
    /// transport error is returned.
    pub fn dispatch(
        &self,
        state: &ClientState,
        method: &str,
        params: Params,
        handler: Option<RestHandler>,
        options: CallOptions,
    ) -> Result<CallbackId> {
        let request = SignedRequest::build(state, method, params, options);

        // Register before loading so an immediate answer finds its handler
        let id = self.registry.register(method, handler);
        let url = request.url(&state.base_url, &id);

        tracing::debug!(method, callback = %id, no_session = options.no_session, "dispatching call");

        if let Err(e) = self.transport.load(&url, &id) {
            self.registry.take(id.as_str());
            tracing::warn!(method, callback = %id, error = %e, "transport refused call");
            return Err(e);
        }

        Ok(id)
    }

    /// Deliver the completion for `id`.
    ///
    /// Returns `false` when the id is unknown or already completed; that
    /// case is otherwise ignored.
    pub fn complete(&self, id: &str, status: CallStatus, data: Value, error: Value) -> bool {
        let Some(call) = self.registry.take(id) else {
            tracing::warn!(callback = id, "completion for unknown callback id");
            return false;
        };

        tracing::debug!(method = %call.method, callback = id, status = status.as_str(), "call completed");

        if let Some(handler) = call.handler {
            handler(status, data, error);
        }
        true
    }

    /// Like [`complete`](Self::complete), with the raw status literal.
    pub fn complete_raw(&self, id: &str, status: &str, data: Value, error: Value) -> bool {
        self.complete(id, CallStatus::from_literal(status), data, error)
    }

    /// Dispatch a call and get a future for its outcome.
    pub fn call_async(
        &self,
        state: &ClientState,
        method: &str,
        params: Params,
        options: CallOptions,
    ) -> Result<PendingReply> {
        let (tx, rx) = oneshot::channel();
        let handler: RestHandler = Box::new(move |status: CallStatus, data: Value, error: Value| {
            // The receiver may have been dropped; nothing to report then
            let _ = tx.send(RestResponse::new(status, data, error));
        });

        let callback = self.dispatch(state, method, params, Some(handler), options)?;
        Ok(PendingReply { callback, receiver: rx })
    }

    /// Whether `id` is still awaiting completion.
    pub fn is_pending(&self, id: &str) -> bool {
        self.registry.is_pending(id)
    }

    /// Number of calls awaiting completion.
    pub fn pending_count(&self) -> usize {
        self.registry.len()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Future resolving to the outcome of a call made with
/// [`Dispatcher::call_async`].
#[derive(Debug)]
pub struct PendingReply {
    callback: CallbackId,
    receiver: oneshot::Receiver<RestResponse>,
}

impl PendingReply {
    /// The id the remote side must answer.
    pub fn callback_id(&self) -> &CallbackId {
        &self.callback
    }
}

impl Future for PendingReply {
    type Output = Result<Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(response)) => Poll::Ready(response.into_result()),
            Poll::Ready(Err(_)) => Poll::Ready(Err(RestError::Abandoned)),
            Poll::Pending => Poll::Pending,
        }
    }
}
