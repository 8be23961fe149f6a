//! SDK configuration.
//!
//! [`SdkConfig`] holds the platform endpoints and SDK-wide switches.
//! [`InitConfig`] is the per-page initialization input supplied by the
//! application, usually as JSON.

use serde::{Deserialize, Serialize};

/// Default OAuth / widget host.
pub const DEFAULT_CONNECT_URL: &str = "https://connect.ok.ru/";

/// Default mobile host (payment page).
pub const DEFAULT_MOBILE_URL: &str = "https://m.ok.ru/";

/// Scope requested when the application does not name one.
pub const DEFAULT_SCOPE: &str = "VALUABLE_ACCESS";

/// Configuration for the SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// OAuth and widget host, with trailing slash.
    pub connect_url: String,
    /// Mobile host for the payment page, with trailing slash.
    pub mobile_url: String,
    /// API server used when the platform does not inject one.
    pub api_server: String,
    /// OAuth scope requested by default.
    pub default_scope: String,
    /// Client version for the legacy `sdk.init` handshake.
    /// `None` skips the handshake.
    pub sdk_version: Option<String>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            connect_url: DEFAULT_CONNECT_URL.to_string(),
            mobile_url: DEFAULT_MOBILE_URL.to_string(),
            api_server: oksdk_core::DEFAULT_API_SERVER.to_string(),
            default_scope: DEFAULT_SCOPE.to_string(),
            sdk_version: None,
        }
    }
}

impl SdkConfig {
    pub fn with_connect_url(mut self, url: impl Into<String>) -> Self {
        self.connect_url = url.into();
        self
    }

    pub fn with_mobile_url(mut self, url: impl Into<String>) -> Self {
        self.mobile_url = url.into();
        self
    }

    pub fn with_api_server(mut self, url: impl Into<String>) -> Self {
        self.api_server = url.into();
        self
    }

    pub fn with_default_scope(mut self, scope: impl Into<String>) -> Self {
        self.default_scope = scope.into();
        self
    }

    /// Enable the legacy handshake, reporting `version` as client version.
    pub fn with_sdk_version(mut self, version: impl Into<String>) -> Self {
        self.sdk_version = Some(version.into());
        self
    }
}

/// OAuth redirect settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Requested scope; [`SdkConfig::default_scope`] when absent.
    pub scope: Option<String>,
    /// Redirect URI; the current page when absent.
    pub url: Option<String>,
    /// Opaque value echoed back by the platform.
    pub state: Option<String>,
}

/// Initialization input supplied by the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitConfig {
    pub app_id: Option<u64>,
    pub app_key: Option<String>,
    pub oauth: OAuthConfig,
    /// Query string to use instead of the host's.
    pub location_search: Option<String>,
    /// Fragment to use instead of the host's.
    pub location_hash: Option<String>,
}

impl InitConfig {
    pub fn new(app_id: u64, app_key: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id),
            app_key: Some(app_key.into()),
            ..Self::default()
        }
    }

    /// Parse from the host's JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_oauth(mut self, oauth: OAuthConfig) -> Self {
        self.oauth = oauth;
        self
    }

    pub fn with_location_search(mut self, search: impl Into<String>) -> Self {
        self.location_search = Some(search.into());
        self
    }

    pub fn with_location_hash(mut self, hash: impl Into<String>) -> Self {
        self.location_hash = Some(hash.into());
        self
    }
}
