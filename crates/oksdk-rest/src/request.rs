//! Signed request construction.

use oksdk_core::{canonicalize, keys, sign, AuthMode, ClientState, Md5Digest, Params};

use crate::registry::CallbackId;

/// Per-call options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Send the call without credentials and without a signature.
    pub no_session: bool,
}

impl CallOptions {
    /// Options for an unauthenticated call.
    pub fn no_session() -> Self {
        Self { no_session: true }
    }

    pub fn auth_mode(&self) -> AuthMode {
        if self.no_session {
            AuthMode::NoSession
        } else {
            AuthMode::Session
        }
    }
}

/// Canonical parameters plus signature, built fresh for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    params: Params,
    signature: Option<Md5Digest>,
}

impl SignedRequest {
    /// Merge `method` into `params`, canonicalize and sign.
    ///
    /// Calls made with `no_session` carry no `sig`.
    pub fn build(state: &ClientState, method: &str, params: Params, options: CallOptions) -> Self {
        let params = params.with(keys::METHOD, method);
        let mut params = canonicalize(&params, state, options.auth_mode());

        let signature = match options.auth_mode() {
            AuthMode::Session => {
                if state.session_secret_key.is_none() {
                    tracing::warn!(method, "signing without a session secret key");
                }
                let sig = sign(&params, state.signing_secret());
                params.insert(keys::SIG, sig.to_hex());
                Some(sig)
            }
            AuthMode::NoSession => None,
        };

        Self { params, signature }
    }

    /// The final parameters, `sig` included.
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn signature(&self) -> Option<Md5Digest> {
        self.signature
    }

    /// Full request URL against `base_url`, answering to `callback`.
    pub fn url(&self, base_url: &str, callback: &CallbackId) -> String {
        let query = self.params.to_query_string();
        if query.is_empty() {
            format!("{}?{}={}", base_url, keys::JS_CALLBACK, callback)
        } else {
            format!("{}?{}&{}={}", base_url, query, keys::JS_CALLBACK, callback)
        }
    }
}
