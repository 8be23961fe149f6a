//! Resolved client identity and session state.

use serde::{Deserialize, Serialize};

/// Default REST API server.
pub const DEFAULT_API_SERVER: &str = "https://api.ok.ru/";

/// Path of the REST endpoint, relative to the API server.
pub const REST_ENDPOINT: &str = "fb.do";

/// The credential used to authenticate calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential<'a> {
    /// Platform session mode: a session key issued by the container.
    Session(&'a str),
    /// OAuth token mode: a bearer access token from the redirect flow.
    AccessToken(&'a str),
    /// Neither is available.
    Anonymous,
}

/// How a call authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Attach the session key (or access token) and sign.
    #[default]
    Session,
    /// Strip every credential and do not sign.
    NoSession,
}

/// Client identity and session, resolved once at initialization.
///
/// Built by the session resolver and shared immutably afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    /// Numeric application id.
    pub app_id: u64,
    /// Public application key.
    pub app_key: String,
    /// Session key (platform session mode only).
    pub session_key: Option<String>,
    /// Access token (OAuth token mode only).
    pub access_token: Option<String>,
    /// Secret used to sign requests.
    pub session_secret_key: Option<String>,
    /// API server root, with trailing slash.
    pub api_server: String,
    /// Full REST endpoint URL.
    pub base_url: String,
    /// Container hint passed by the platform.
    pub container: Option<String>,
    /// Preferred header widget id.
    pub header_widget: Option<String>,
}

impl ClientState {
    /// Create a state with no session credentials against the given server.
    pub fn new(app_id: u64, app_key: impl Into<String>, api_server: impl Into<String>) -> Self {
        let api_server = api_server.into();
        Self {
            app_id,
            app_key: app_key.into(),
            session_key: None,
            access_token: None,
            session_secret_key: None,
            base_url: format!("{}{}", api_server, REST_ENDPOINT),
            api_server,
            container: None,
            header_widget: None,
        }
    }

    /// Set the platform session key.
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = Some(key.into());
        self
    }

    /// Set the OAuth access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the signing secret.
    pub fn with_session_secret_key(mut self, secret: impl Into<String>) -> Self {
        self.session_secret_key = Some(secret.into());
        self
    }

    /// The credential calls are made with. The session key wins when both
    /// a session key and an access token are present.
    pub fn credential(&self) -> Credential<'_> {
        if let Some(key) = non_empty(&self.session_key) {
            Credential::Session(key)
        } else if let Some(token) = non_empty(&self.access_token) {
            Credential::AccessToken(token)
        } else {
            Credential::Anonymous
        }
    }

    /// The signing secret, or the empty string when none was provided.
    pub fn signing_secret(&self) -> &str {
        self.session_secret_key.as_deref().unwrap_or("")
    }

    /// Whether the application runs inside the platform container.
    pub fn in_container(&self) -> bool {
        non_empty(&self.container).is_some()
    }

    /// The access token, if one is set and non-empty.
    pub fn access_token(&self) -> Option<&str> {
        non_empty(&self.access_token)
    }

    /// The session key, if one is set and non-empty.
    pub fn session_key(&self) -> Option<&str> {
        non_empty(&self.session_key)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
