//! String parameter maps and launch-parameter parsing.
//!
//! The platform splits session information between the query string and
//! the URL fragment, so both are parsed with [`LaunchParameters::parse`]
//! independently.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Well-known parameter names.
pub mod keys {
    pub const APPLICATION_KEY: &str = "application_key";
    pub const SESSION_KEY: &str = "session_key";
    pub const SESSION_SECRET_KEY: &str = "session_secret_key";
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const API_SERVER: &str = "api_server";
    pub const CONTAINER: &str = "container";
    pub const HEADER_WIDGET: &str = "header_widget";
    pub const ERROR: &str = "error";
    pub const FORMAT: &str = "format";
    pub const METHOD: &str = "method";
    pub const SIG: &str = "sig";
    pub const JS_CALLBACK: &str = "js_callback";
}

/// An ordered mapping of string keys to string values.
///
/// Used both for call parameters and for parsed launch parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params(BTreeMap<String, String>);

/// Parameters parsed from a query string or URL fragment.
pub type LaunchParameters = Params;

impl Params {
    /// Create an empty map.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        self.0.insert(key.into(), value.to_string())
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Look up a value, treating an empty string as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Whether the key is present (even with an empty value).
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over the keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Render as `k=v&k=v` with every key and value percent-encoded.
    pub fn to_query_string(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parse a query string or URL fragment.
    ///
    /// A leading `?` or `#` is dropped. Pairs are split on `&` and on the
    /// first `=`; `+` is read as a space before percent-decoding. A pair
    /// without `=` yields an empty value, and a later duplicate key
    /// replaces an earlier one.
    pub fn parse(source: &str) -> Result<Self> {
        let body = source
            .strip_prefix('?')
            .or_else(|| source.strip_prefix('#'))
            .unwrap_or(source);

        let mut params = Self::new();
        if body.is_empty() {
            return Ok(params);
        }

        for pair in body.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(name, value)?;
            params.insert(name, value);
        }

        Ok(params)
    }
}

/// Form-decode a single value: `+` means space, then `%XX` escapes.
fn decode_component<'a>(key: &str, value: &'a str) -> Result<Cow<'a, str>> {
    let spaced = if value.contains('+') {
        Cow::Owned(value.replace('+', " "))
    } else {
        Cow::Borrowed(value)
    };

    if !spaced.contains('%') {
        return Ok(spaced);
    }

    urlencoding::decode(&spaced)
        .map(|decoded| Cow::Owned(decoded.into_owned()))
        .map_err(|e| {
            tracing::debug!(key, error = %e, "undecodable launch parameter");
            CoreError::MalformedLaunchParameters {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl From<BTreeMap<String, String>> for Params {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
