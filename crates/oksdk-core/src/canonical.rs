//! Parameter canonicalization.
//!
//! Every REST call carries the application key, the caller's credential
//! and a fixed response format. The signature input is the canonical
//! string: keys sorted ascending, `sig` and `access_token` skipped, and
//! `key=value` pairs concatenated with no separator.

use crate::params::{keys, Params};
use crate::state::{AuthMode, ClientState, Credential};

/// Response format requested from the REST API.
pub const RESPONSE_FORMAT: &str = "JSON";

/// Keys that never take part in the signature.
const UNSIGNED_KEYS: [&str; 2] = [keys::SIG, keys::ACCESS_TOKEN];

/// Merge identity parameters into a copy of `params`.
///
/// - `application_key` is always set from the state.
/// - In [`AuthMode::Session`], `session_key` is set when the state has one,
///   otherwise `access_token` when the state has one.
/// - In [`AuthMode::NoSession`], both are removed even if the caller
///   supplied them.
/// - `format` is always [`RESPONSE_FORMAT`].
pub fn canonicalize(params: &Params, state: &ClientState, mode: AuthMode) -> Params {
    let mut out = params.clone();
    out.insert(keys::APPLICATION_KEY, &state.app_key);

    match mode {
        AuthMode::Session => match state.credential() {
            Credential::Session(key) => {
                out.insert(keys::SESSION_KEY, key);
            }
            Credential::AccessToken(token) => {
                out.insert(keys::ACCESS_TOKEN, token);
            }
            Credential::Anonymous => {}
        },
        AuthMode::NoSession => {
            out.remove(keys::SESSION_KEY);
            out.remove(keys::ACCESS_TOKEN);
        }
    }

    out.insert(keys::FORMAT, RESPONSE_FORMAT);
    out
}

/// Build the canonical string used as signature input.
pub fn canonical_string(params: &Params) -> String {
    // Params iterates in ascending key order
    params
        .iter()
        .filter(|(key, _)| !UNSIGNED_KEYS.contains(key))
        .fold(String::new(), |mut acc, (key, value)| {
            acc.push_str(key);
            acc.push('=');
            acc.push_str(value);
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DEFAULT_API_SERVER;

    fn session_state() -> ClientState {
        ClientState::new(512000, "CBAFJIICABABABABA", DEFAULT_API_SERVER)
            .with_session_key("sk-1")
            .with_session_secret_key("secret")
    }

    #[test]
    fn test_injects_identity_in_session_mode() {
        let params = Params::new().with("method", "users.getCurrentUser");
        let out = canonicalize(&params, &session_state(), AuthMode::Session);

        assert_eq!(out.get(keys::APPLICATION_KEY), Some("CBAFJIICABABABABA"));
        assert_eq!(out.get(keys::SESSION_KEY), Some("sk-1"));
        assert_eq!(out.get(keys::FORMAT), Some("JSON"));
        assert!(!out.contains(keys::ACCESS_TOKEN));

        // The caller's map is untouched
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_session_key_beats_access_token() {
        let state = session_state().with_access_token("tok");
        let out = canonicalize(&Params::new(), &state, AuthMode::Session);
        assert_eq!(out.get(keys::SESSION_KEY), Some("sk-1"));
        assert!(!out.contains(keys::ACCESS_TOKEN));
    }

    #[test]
    fn test_access_token_mode() {
        let state = ClientState::new(1, "KEY", DEFAULT_API_SERVER).with_access_token("tok");
        let out = canonicalize(&Params::new(), &state, AuthMode::Session);
        assert_eq!(out.get(keys::ACCESS_TOKEN), Some("tok"));
        assert!(!out.contains(keys::SESSION_KEY));
    }

    #[test]
    fn test_no_session_strips_credentials() {
        let params = Params::new()
            .with(keys::SESSION_KEY, "injected")
            .with(keys::ACCESS_TOKEN, "injected");
        let out = canonicalize(&params, &session_state(), AuthMode::NoSession);

        assert!(!out.contains(keys::SESSION_KEY));
        assert!(!out.contains(keys::ACCESS_TOKEN));
        assert_eq!(out.get(keys::APPLICATION_KEY), Some("CBAFJIICABABABABA"));
    }

    #[test]
    fn test_anonymous_state_adds_no_credential() {
        let state = ClientState::new(1, "KEY", DEFAULT_API_SERVER);
        let out = canonicalize(&Params::new(), &state, AuthMode::Session);
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["application_key", "format"]);
    }

    #[test]
    fn test_canonical_string_sorted_and_filtered() {
        let params = Params::new()
            .with("method", "friends.get")
            .with("application_key", "KEY")
            .with("sig", "deadbeef")
            .with("access_token", "tok")
            .with("format", "JSON");

        assert_eq!(
            canonical_string(&params),
            "application_key=KEYformat=JSONmethod=friends.get"
        );
    }

    #[test]
    fn test_canonical_string_empty() {
        assert_eq!(canonical_string(&Params::new()), "");
    }
}
