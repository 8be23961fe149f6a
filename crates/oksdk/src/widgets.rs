//! Platform widgets.
//!
//! Widgets are pages on the connect host opened in a new browsing
//! context. Their URLs carry a signature over the attachment and the
//! return URL, keyed with the session secret.

use oksdk_core::{decode_base64, decode_utf8, sign_raw, ClientState, Params};
use oksdk_rest::{wrap_callback_with, CallOptions, CallbackId, SuccessHandler};
use serde_json::{json, Value};

use crate::config::SdkConfig;
use crate::error::Result;
use crate::sdk::Sdk;

/// Path of the widget dispatcher on the connect host.
pub const WIDGET_PATH: &str = "dk";

/// Header widget used when the platform does not name one.
pub const DEFAULT_HEADER_WIDGET: &str = "mobile-header-small";

/// Method returning a widget's markup.
pub const WIDGET_CONTENT_METHOD: &str = "widget.getWidgetContent";

/// Widget opened by [`widget_url`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetCommand {
    /// Publish a media topic.
    MediatopicPost,
    /// Invite friends.
    Invite,
    /// Suggest the application to friends.
    Suggest,
}

impl WidgetCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MediatopicPost => "WidgetMediatopicPost",
            Self::Invite => "WidgetInvite",
            Self::Suggest => "WidgetSuggest",
        }
    }
}

impl std::fmt::Display for WidgetCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the signed widget URL.
///
/// `st.signature = md5(["st.attachment=" + feed] + "st.return=" + return_url + secret)`
/// over the raw, unencoded values.
pub fn widget_url(
    config: &SdkConfig,
    state: &ClientState,
    command: WidgetCommand,
    feed: Option<&str>,
    return_url: &str,
) -> String {
    let mut source = String::new();
    if let Some(feed) = feed {
        source.push_str("st.attachment=");
        source.push_str(feed);
    }
    source.push_str("st.return=");
    source.push_str(return_url);
    source.push_str(state.signing_secret());

    let mut url = format!(
        "{}{}?st.cmd={}&st.app={}",
        config.connect_url, WIDGET_PATH, command, state.app_id
    );
    if let Some(feed) = feed {
        url.push_str("&st.attachment=");
        url.push_str(&urlencoding::encode(feed));
    }
    url.push_str("&st.signature=");
    url.push_str(&sign_raw(&source).to_hex());
    url.push_str("&st.return=");
    url.push_str(&urlencoding::encode(return_url));
    if let Some(token) = state.access_token() {
        url.push_str("&st.access_token=");
        url.push_str(&urlencoding::encode(token));
    }
    if let Some(key) = state.session_key() {
        url.push_str("&st.session_key=");
        url.push_str(&urlencoding::encode(key));
    }
    url
}

impl Sdk {
    /// Open the media topic posting widget with `feed` as attachment.
    pub fn widget_post(&self, return_url: &str, feed: &str) -> String {
        self.open_widget(WidgetCommand::MediatopicPost, Some(feed), return_url)
    }

    /// Open the friend invitation widget.
    pub fn widget_invite(&self, return_url: &str) -> String {
        self.open_widget(WidgetCommand::Invite, None, return_url)
    }

    /// Open the application suggestion widget.
    pub fn widget_suggest(&self, return_url: &str) -> String {
        self.open_widget(WidgetCommand::Suggest, None, return_url)
    }

    /// Fetch the back button markup for pages opened outside the
    /// platform.
    ///
    /// Nothing is requested inside a container or in token mode, in which
    /// case `Ok(None)` is returned. Otherwise `on_success` receives the
    /// decoded markup once the call completes.
    pub fn widget_back_button(
        &self,
        on_success: impl FnOnce(String) + Send + 'static,
        style: Option<&str>,
    ) -> Result<Option<CallbackId>> {
        let state = self.state();
        if state.in_container() || state.access_token().is_some() {
            return Ok(None);
        }

        let wid = state
            .header_widget
            .as_deref()
            .filter(|w| !w.is_empty())
            .unwrap_or(DEFAULT_HEADER_WIDGET);
        let mut params = Params::new().with("wid", wid);
        if let Some(style) = style {
            params.insert("style", style);
        }

        let on_success: SuccessHandler<String> = Box::new(on_success);
        let handler = wrap_callback_with(Some(on_success), None, decode_widget_content);
        let id = self.call(WIDGET_CONTENT_METHOD, params, Some(handler), CallOptions::default())?;
        Ok(Some(id))
    }

    fn open_widget(&self, command: WidgetCommand, feed: Option<&str>, return_url: &str) -> String {
        let url = widget_url(self.config(), self.state(), command, feed, return_url);
        tracing::debug!(widget = %command, "opening widget");
        self.host().open(&url);
        url
    }
}

/// Widget content arrives as base64 of UTF-8 markup.
fn decode_widget_content(data: Value) -> std::result::Result<String, Value> {
    let Some(encoded) = data.as_str() else {
        tracing::warn!("widget content is not a string");
        return Err(json!("widget content is not a string"));
    };
    match decode_base64(encoded) {
        Ok(bytes) => Ok(decode_utf8(&bytes)),
        Err(e) => {
            tracing::warn!(error = %e, "undecodable widget content");
            Err(json!(e.to_string()))
        }
    }
}
