//! The SDK facade: one initialized client per page.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use oksdk_core::{canonicalize, sign, AuthMode, ClientState, Params};
use oksdk_rest::{
    payload_to_string, wrap_callback, CallOptions, CallStatus, CallbackId, Dispatcher,
    FailureHandler, PendingReply, RestHandler, SuccessHandler, Transport,
};
use serde_json::{json, Value};

use crate::config::{InitConfig, SdkConfig};
use crate::error::{Result, SessionError};
use crate::host::HostWindow;
use crate::session::{Resolution, SessionResolver};

/// Method of the legacy handshake.
pub const HANDSHAKE_METHOD: &str = "sdk.init";

/// Client type reported in the legacy handshake.
pub const HANDSHAKE_CLIENT_TYPE: &str = "SDK_JS";

/// Session data version reported in the legacy handshake.
pub const HANDSHAKE_VERSION: u32 = 2;

/// Handlers notified about the initialization outcome.
#[derive(Default)]
pub struct InitCallbacks {
    on_success: Option<Box<dyn FnOnce() + Send + 'static>>,
    on_failure: Option<Box<dyn FnOnce(String) + Send + 'static>>,
}

impl InitCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    /// Receives the error text.
    pub fn on_failure(mut self, f: impl FnOnce(String) + Send + 'static) -> Self {
        self.on_failure = Some(Box::new(f));
        self
    }

    fn succeed(self) {
        if let Some(f) = self.on_success {
            f();
        }
    }

    fn fail(self, message: String) {
        if let Some(f) = self.on_failure {
            f(message);
        }
    }
}

impl std::fmt::Debug for InitCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitCallbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

/// Session issued by the legacy `sdk.init` handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkToken {
    pub session_key: String,
    pub session_secret_key: String,
}

/// Result of [`Sdk::init`].
#[derive(Debug)]
pub enum Initialized {
    /// The SDK is usable.
    Ready(Sdk),
    /// The host was navigated to this OAuth URL; nothing else happens on
    /// this page.
    Redirecting(String),
}

impl Initialized {
    /// The SDK, if initialization did not redirect.
    pub fn ready(self) -> Option<Sdk> {
        match self {
            Self::Ready(sdk) => Some(sdk),
            Self::Redirecting(_) => None,
        }
    }
}

/// An initialized OK platform client.
///
/// Cloning is cheap; clones share the state, the pending calls and the
/// host.
#[derive(Clone)]
pub struct Sdk {
    config: Arc<SdkConfig>,
    state: Arc<ClientState>,
    dispatcher: Dispatcher,
    host: Arc<dyn HostWindow>,
    sdk_token: Arc<OnceLock<SdkToken>>,
}

impl Sdk {
    /// Resolve the session and build the client.
    ///
    /// On failure the failure handler receives the error text and the
    /// error is returned. On redirect the host is navigated and no
    /// handler fires. Otherwise the success handler fires, immediately or
    /// after the legacy handshake when [`SdkConfig::sdk_version`] is set.
    pub fn init(
        init: InitConfig,
        config: SdkConfig,
        host: Arc<dyn HostWindow>,
        transport: Arc<dyn Transport>,
        callbacks: InitCallbacks,
    ) -> Result<Initialized> {
        let resolved = SessionResolver::new(&config).resolve(&init, host.as_ref());

        let state = match resolved {
            Ok(Resolution::Ready(state)) => state,
            Ok(Resolution::Redirect(url)) => {
                host.navigate(&url);
                return Ok(Initialized::Redirecting(url));
            }
            Err(e) => {
                tracing::warn!(error = %e, "initialization failed");
                callbacks.fail(e.to_string());
                return Err(e.into());
            }
        };

        let sdk = Self::from_state(state, config, host, transport);

        match sdk.config.sdk_version.clone() {
            Some(version) => sdk.handshake(&version, callbacks)?,
            None => callbacks.succeed(),
        }

        Ok(Initialized::Ready(sdk))
    }

    /// Build a client over an already resolved state.
    pub fn from_state(
        state: ClientState,
        config: SdkConfig,
        host: Arc<dyn HostWindow>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            state: Arc::new(state),
            dispatcher: Dispatcher::new(transport),
            host,
            sdk_token: Arc::new(OnceLock::new()),
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub(crate) fn host(&self) -> &dyn HostWindow {
        self.host.as_ref()
    }

    /// Session issued by the legacy handshake, once it completed.
    pub fn sdk_token(&self) -> Option<&SdkToken> {
        self.sdk_token.get()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // REST Calls
    // ─────────────────────────────────────────────────────────────────────────

    /// Dispatch a signed call. See [`Dispatcher::dispatch`].
    pub fn call(
        &self,
        method: &str,
        params: Params,
        handler: Option<RestHandler>,
        options: CallOptions,
    ) -> Result<CallbackId> {
        Ok(self.dispatcher.dispatch(&self.state, method, params, handler, options)?)
    }

    /// Dispatch a call with separate success and failure handlers.
    pub fn call_wrapped(
        &self,
        method: &str,
        params: Params,
        on_success: Option<SuccessHandler<Value>>,
        on_failure: Option<FailureHandler>,
    ) -> Result<CallbackId> {
        self.call(
            method,
            params,
            Some(wrap_callback(on_success, on_failure)),
            CallOptions::default(),
        )
    }

    /// Dispatch a call and await its outcome.
    pub fn call_async(
        &self,
        method: &str,
        params: Params,
        options: CallOptions,
    ) -> Result<PendingReply> {
        Ok(self.dispatcher.call_async(&self.state, method, params, options)?)
    }

    /// Deliver a remote completion. Returns `false` for unknown ids.
    pub fn complete(&self, id: &str, status: CallStatus, data: Value, error: Value) -> bool {
        self.dispatcher.complete(id, status, data, error)
    }

    /// Like [`complete`](Self::complete), with the raw status literal.
    pub fn complete_raw(&self, id: &str, status: &str, data: Value, error: Value) -> bool {
        self.dispatcher.complete_raw(id, status, data, error)
    }

    /// Number of calls awaiting completion.
    pub fn pending_calls(&self) -> usize {
        self.dispatcher.pending_count()
    }

    /// Signature of `params` as a call in the current session would carry.
    ///
    /// Returned in lowercase hex.
    pub fn signature_for(&self, params: &Params) -> String {
        let canonical = canonicalize(params, &self.state, AuthMode::Session);
        sign(&canonical, self.state.signing_secret()).to_hex()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Legacy Handshake
    // ─────────────────────────────────────────────────────────────────────────

    fn handshake(&self, version: &str, callbacks: InitCallbacks) -> Result<()> {
        let session_data = json!({
            "version": HANDSHAKE_VERSION,
            "client_type": HANDSHAKE_CLIENT_TYPE,
            "client_version": version,
            "device_id": self.host.user_agent(),
        });
        let params = Params::new().with("session_data", session_data);

        // Shared so a refused dispatch can still report the failure
        let callbacks = Arc::new(Mutex::new(Some(callbacks)));
        let pending = Arc::clone(&callbacks);
        let token = Arc::clone(&self.sdk_token);

        let handler: RestHandler = Box::new(move |status: CallStatus, data: Value, error: Value| {
            let Some(callbacks) = take(&pending) else {
                return;
            };
            if status.is_ok() {
                let issued = SdkToken {
                    session_key: string_field(&data, "session_key"),
                    session_secret_key: string_field(&data, "session_secret_key"),
                };
                if token.set(issued).is_err() {
                    tracing::warn!("handshake token already set");
                }
                callbacks.succeed();
            } else {
                let e = SessionError::Handshake(payload_to_string(&error));
                tracing::warn!(error = %e, "initialization failed");
                callbacks.fail(e.to_string());
            }
        });

        if let Err(e) = self.call(HANDSHAKE_METHOD, params, Some(handler), CallOptions::no_session()) {
            tracing::warn!(error = %e, "initialization failed");
            if let Some(callbacks) = take(&callbacks) {
                callbacks.fail(e.to_string());
            }
            return Err(e);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Sdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sdk")
            .field("state", &self.state)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

fn take(callbacks: &Mutex<Option<InitCallbacks>>) -> Option<InitCallbacks> {
    callbacks
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

fn string_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
