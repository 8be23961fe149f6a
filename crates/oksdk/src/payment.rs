//! Payment page.

use oksdk_core::{keys, sign, ClientState, Credential, Params};

use crate::config::SdkConfig;
use crate::sdk::Sdk;

/// Path of the payment page on the mobile host.
pub const PAYMENT_PATH: &str = "api/show_payment";

/// Build the signed payment page URL.
///
/// The signature covers the product fields, the application key and the
/// session key; an access token rides along unsigned.
pub fn payment_url(
    config: &SdkConfig,
    state: &ClientState,
    name: &str,
    price: impl ToString,
    code: &str,
) -> String {
    let price = price.to_string();

    let mut fields = vec![
        ("name", name.to_string()),
        ("price", price),
        ("code", code.to_string()),
        (keys::APPLICATION_KEY, state.app_key.clone()),
    ];
    match state.credential() {
        Credential::Session(key) => fields.push((keys::SESSION_KEY, key.to_string())),
        Credential::AccessToken(token) => fields.push((keys::ACCESS_TOKEN, token.to_string())),
        Credential::Anonymous => {}
    }

    let sig = sign(&fields.iter().cloned().collect::<Params>(), state.signing_secret());
    fields.push((keys::SIG, sig.to_hex()));

    let query = fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}{}?{}", config.mobile_url, PAYMENT_PATH, query)
}

impl Sdk {
    /// Open the payment page for a product. Returns the opened URL.
    pub fn show_payment(&self, name: &str, price: impl ToString, code: &str) -> String {
        let url = payment_url(self.config(), self.state(), name, price, code);
        tracing::debug!(code, "opening payment page");
        self.host().open(&url);
        url
    }
}
