//! Session resolution.
//!
//! Turns the page location and the application's [`InitConfig`] into a
//! [`ClientState`], or into an OAuth redirect when no session is present.
//!
//! ```text
//!                  ┌──> Ready(ClientState)
//! Uninitialized ───┼──> AwaitingRedirect(url)
//!                  └──> Failed(SessionError)
//! ```

use oksdk_core::{keys, ClientState, Params};

use crate::config::{InitConfig, OAuthConfig, SdkConfig};
use crate::error::SessionError;
use crate::host::HostWindow;

/// Path of the OAuth authorization page on the connect host.
pub const OAUTH_AUTHORIZE_PATH: &str = "oauth/authorize";

/// Where a resolver is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    /// The host was sent to the OAuth page.
    AwaitingRedirect,
    /// Resolution failed; see the returned error.
    Failed,
    /// A session is available.
    Ready,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Calls can be made with this state.
    Ready(ClientState),
    /// The page must navigate to this OAuth URL first.
    Redirect(String),
}

/// Resolves the client state once per page.
#[derive(Debug)]
pub struct SessionResolver<'a> {
    config: &'a SdkConfig,
    phase: SessionPhase,
}

impl<'a> SessionResolver<'a> {
    pub fn new(config: &'a SdkConfig) -> Self {
        Self {
            config,
            phase: SessionPhase::Uninitialized,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Resolve the session from `init` and the host location.
    ///
    /// Does not navigate; the caller acts on [`Resolution::Redirect`].
    pub fn resolve(
        &mut self,
        init: &InitConfig,
        host: &dyn HostWindow,
    ) -> Result<Resolution, SessionError> {
        let result = self.resolve_inner(init, host);
        self.phase = match &result {
            Ok(Resolution::Ready(_)) => SessionPhase::Ready,
            Ok(Resolution::Redirect(_)) => SessionPhase::AwaitingRedirect,
            Err(_) => SessionPhase::Failed,
        };
        result
    }

    fn resolve_inner(
        &self,
        init: &InitConfig,
        host: &dyn HostWindow,
    ) -> Result<Resolution, SessionError> {
        let search = override_or(&init.location_search, || host.location_search());
        let hash = override_or(&init.location_hash, || host.location_hash());

        let query = Params::parse(&search)?;
        let fragment = Params::parse(&hash)?;

        let app_id = init.app_id.filter(|id| *id != 0);
        let app_key = query
            .get_non_empty(keys::APPLICATION_KEY)
            .or_else(|| init.app_key.as_deref().filter(|k| !k.is_empty()));

        let (Some(app_id), Some(app_key)) = (app_id, app_key) else {
            return Err(SessionError::MissingCredentials);
        };

        let explicit_server = query.get_non_empty(keys::API_SERVER);
        if explicit_server.is_none() {
            if let Some(error) = fragment.get(keys::ERROR) {
                return Err(SessionError::OAuth(error.to_string()));
            }
            if !fragment.contains(keys::ACCESS_TOKEN) {
                let url = oauth_authorize_url(self.config, app_id, &init.oauth, &host.location_href());
                tracing::info!(app_id, "no session, redirecting to OAuth");
                tracing::debug!(%url, "OAuth redirect");
                return Ok(Resolution::Redirect(url));
            }
        }

        let api_server = explicit_server.unwrap_or(&self.config.api_server);
        let mut state = ClientState::new(app_id, app_key, api_server);
        state.session_key = owned(query.get_non_empty(keys::SESSION_KEY));
        state.access_token = owned(fragment.get_non_empty(keys::ACCESS_TOKEN));
        state.session_secret_key = owned(
            query
                .get_non_empty(keys::SESSION_SECRET_KEY)
                .or_else(|| fragment.get_non_empty(keys::SESSION_SECRET_KEY)),
        );
        state.container = owned(query.get_non_empty(keys::CONTAINER));
        state.header_widget = owned(query.get_non_empty(keys::HEADER_WIDGET));

        tracing::info!(
            app_id,
            api_server = %state.api_server,
            mode = if state.session_key().is_some() { "session" } else { "token" },
            "session resolved"
        );

        Ok(Resolution::Ready(state))
    }
}

/// Build the OAuth authorization URL.
///
/// Scope falls back to the configured default scope, the redirect URI to
/// `current_href`. Values are percent-encoded.
pub fn oauth_authorize_url(
    config: &SdkConfig,
    client_id: u64,
    oauth: &OAuthConfig,
    current_href: &str,
) -> String {
    let scope = oauth
        .scope
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(&config.default_scope);
    let redirect_uri = oauth
        .url
        .as_deref()
        .filter(|u| !u.is_empty())
        .unwrap_or(current_href);
    let state = oauth.state.as_deref().unwrap_or("");

    format!(
        "{}{}?client_id={}&scope={}&response_type=token&redirect_uri={}&layout=a&state={}",
        config.connect_url,
        OAUTH_AUTHORIZE_PATH,
        client_id,
        urlencoding::encode(scope),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(state),
    )
}

fn override_or(value: &Option<String>, host: impl FnOnce() -> String) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => host(),
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryWindow;
    use oksdk_core::Credential;
    use proptest::prelude::*;

    const APP_KEY: &str = "CBAFJIICABABABABA";

    fn resolve(init: &InitConfig, href: &str) -> (SessionPhase, Result<Resolution, SessionError>) {
        let config = SdkConfig::default();
        let mut resolver = SessionResolver::new(&config);
        let result = resolver.resolve(init, &MemoryWindow::new(href));
        (resolver.phase(), result)
    }

    fn ready(result: Result<Resolution, SessionError>) -> ClientState {
        match result {
            Ok(Resolution::Ready(state)) => state,
            other => panic!("expected ready, got {other:?}"),
        }
    }

    #[test]
    fn test_platform_session_mode() {
        let (phase, result) = resolve(
            &InitConfig::new(512000, APP_KEY),
            "https://app.example/?api_server=https%3A%2F%2Fapi.ok.ru%2F&session_key=sk-1\
             &session_secret_key=secret&container=true&header_widget=w1",
        );

        assert_eq!(phase, SessionPhase::Ready);
        let state = ready(result);
        assert_eq!(state.app_id, 512000);
        assert_eq!(state.app_key, APP_KEY);
        assert_eq!(state.session_key(), Some("sk-1"));
        assert_eq!(state.signing_secret(), "secret");
        assert_eq!(state.base_url, "https://api.ok.ru/fb.do");
        assert!(state.in_container());
        assert_eq!(state.header_widget.as_deref(), Some("w1"));
        assert!(state.access_token().is_none());
    }

    #[test]
    fn test_oauth_token_mode() {
        let (phase, result) = resolve(
            &InitConfig::new(512000, APP_KEY),
            "https://app.example/#access_token=tok&session_secret_key=frag-secret",
        );

        assert_eq!(phase, SessionPhase::Ready);
        let state = ready(result);
        assert_eq!(state.access_token(), Some("tok"));
        assert_eq!(state.signing_secret(), "frag-secret");
        assert_eq!(state.api_server, "https://api.ok.ru/");
        assert!(state.session_key().is_none());
    }

    #[test]
    fn test_session_key_excludes_fragment_token() {
        let (phase, result) = resolve(
            &InitConfig::new(512000, APP_KEY),
            "https://app.example/?api_server=https%3A%2F%2Fapi.ok.ru%2F&session_key=sk-9\
             &session_secret_key=secret#access_token=tok",
        );

        assert_eq!(phase, SessionPhase::Ready);
        let state = ready(result);
        assert_eq!(state.credential(), Credential::Session("sk-9"));
        assert_eq!(state.session_key(), Some("sk-9"));
    }

    #[test]
    fn test_query_secret_wins_over_fragment() {
        let (_, result) = resolve(
            &InitConfig::new(1, APP_KEY),
            "https://app.example/?api_server=https%3A%2F%2Fapi.ok.ru%2F&session_secret_key=q\
             #session_secret_key=f",
        );
        assert_eq!(ready(result).signing_secret(), "q");
    }

    #[test]
    fn test_query_application_key_wins_over_config() {
        let (_, result) = resolve(
            &InitConfig::new(1, "FROM_CONFIG"),
            "https://app.example/?application_key=FROM_QUERY&api_server=https%3A%2F%2Fapi.ok.ru%2F",
        );
        assert_eq!(ready(result).app_key, "FROM_QUERY");
    }

    #[test]
    fn test_location_overrides_host() {
        let init = InitConfig::new(1, APP_KEY)
            .with_location_search("?api_server=https%3A%2F%2Fapi.example.test%2F")
            .with_location_hash("#access_token=tok");
        let (_, result) = resolve(&init, "https://app.example/#error=ignored");

        let state = ready(result);
        assert_eq!(state.api_server, "https://api.example.test/");
        assert_eq!(state.access_token(), Some("tok"));
    }

    #[test]
    fn test_redirect_without_session() {
        let (phase, result) = resolve(&InitConfig::new(512000, APP_KEY), "https://app.example/game");

        assert_eq!(phase, SessionPhase::AwaitingRedirect);
        assert_eq!(
            result.unwrap(),
            Resolution::Redirect(
                "https://connect.ok.ru/oauth/authorize?client_id=512000&scope=VALUABLE_ACCESS\
                 &response_type=token&redirect_uri=https%3A%2F%2Fapp.example%2Fgame&layout=a&state="
                    .to_string()
            )
        );
    }

    #[test]
    fn test_oauth_error() {
        let (phase, result) = resolve(
            &InitConfig::new(512000, APP_KEY),
            "https://app.example/#error=access_denied",
        );

        assert_eq!(phase, SessionPhase::Failed);
        let err = result.unwrap_err();
        assert!(matches!(err, SessionError::OAuth(ref e) if e == "access_denied"));
        assert_eq!(err.to_string(), "Error with OAUTH authorization: access_denied");
    }

    #[test]
    fn test_missing_credentials() {
        for init in [
            InitConfig::default(),
            InitConfig::new(0, APP_KEY),
            InitConfig::new(512000, ""),
        ] {
            let (phase, result) = resolve(&init, "https://app.example/#access_token=tok");
            assert_eq!(phase, SessionPhase::Failed);
            assert_eq!(
                result.unwrap_err().to_string(),
                "Required arguments app_id/app_key not passed"
            );
        }
    }

    #[test]
    fn test_malformed_launch_parameters() {
        let (phase, result) = resolve(&InitConfig::new(1, APP_KEY), "https://app.example/?session_key=%E0%A4%A");
        assert_eq!(phase, SessionPhase::Failed);
        assert!(matches!(result, Err(SessionError::MalformedLaunchParameters(_))));
    }

    #[test]
    fn test_oauth_url_custom_settings() {
        let oauth = OAuthConfig {
            scope: Some("VALUABLE_ACCESS;LONG_ACCESS_TOKEN".to_string()),
            url: Some("https://app.example/cb?x=1".to_string()),
            state: Some("s 1".to_string()),
        };
        let url = oauth_authorize_url(&SdkConfig::default(), 7, &oauth, "https://ignored/");
        assert_eq!(
            url,
            "https://connect.ok.ru/oauth/authorize?client_id=7&scope=VALUABLE_ACCESS%3BLONG_ACCESS_TOKEN\
             &response_type=token&redirect_uri=https%3A%2F%2Fapp.example%2Fcb%3Fx%3D1&layout=a&state=s%201"
        );
    }

    proptest! {
        #[test]
        fn test_platform_launch_resolves_its_parameters(
            app_id in 1u64..=u64::MAX,
            session_key in "[A-Za-z0-9._-]{1,40}",
            secret in "[a-f0-9]{32}",
        ) {
            let launch = Params::new()
                .with(keys::API_SERVER, "https://api.ok.ru/")
                .with(keys::SESSION_KEY, &session_key)
                .with(keys::SESSION_SECRET_KEY, &secret);
            let href = format!("https://app.example/?{}", launch.to_query_string());

            let (phase, result) = resolve(&InitConfig::new(app_id, APP_KEY), &href);

            prop_assert_eq!(phase, SessionPhase::Ready);
            let state = ready(result);
            prop_assert_eq!(state.app_id, app_id);
            prop_assert_eq!(state.session_key(), Some(session_key.as_str()));
            prop_assert_eq!(state.signing_secret(), secret.as_str());
        }

        #[test]
        fn test_redirect_names_the_application(app_id in 1u64..=u64::MAX) {
            let (phase, result) = resolve(&InitConfig::new(app_id, APP_KEY), "https://app.example/");
            let expected_prefix = format!("https://connect.ok.ru/oauth/authorize?client_id={app_id}&");

            prop_assert_eq!(phase, SessionPhase::AwaitingRedirect);
            prop_assert!(matches!(result, Ok(Resolution::Redirect(url)) if url.starts_with(&expected_prefix)));
        }
    }
}
