//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: an initialized [`Sdk`] over
//! an in-memory transport and window.

use std::sync::{Arc, Mutex};

use oksdk::memory::MemoryWindow;
use oksdk::{InitCallbacks, InitConfig, Initialized, Sdk, SdkConfig, SdkError};
use oksdk_rest::memory::{LoadRequest, MemoryTransport};
use serde_json::Value;

/// Application id used by the fixtures.
pub const APP_ID: u64 = 512000;

/// Application key used by the fixtures.
pub const APP_KEY: &str = "CBAFJIICABABABABA";

/// Page URL of an application launched by the platform container.
pub const SESSION_HREF: &str = "https://app.example/game?api_server=https%3A%2F%2Fapi.ok.ru%2F\
                                &session_key=sk-1&session_secret_key=secret";

/// Page URL after the OAuth redirect flow.
pub const TOKEN_HREF: &str =
    "https://app.example/game#access_token=tok&session_secret_key=frag-secret";

/// Initialization outcome as seen by the callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitEvent {
    Success,
    Failure(String),
}

/// Callbacks that record what fired.
pub fn recording_callbacks() -> (InitCallbacks, Arc<Mutex<Vec<InitEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let on_success = Arc::clone(&events);
    let on_failure = Arc::clone(&events);
    let callbacks = InitCallbacks::new()
        .on_success(move || push(&on_success, InitEvent::Success))
        .on_failure(move |e| push(&on_failure, InitEvent::Failure(e)));
    (callbacks, events)
}

fn push(events: &Mutex<Vec<InitEvent>>, event: InitEvent) {
    if let Ok(mut events) = events.lock() {
        events.push(event);
    }
}

/// A test fixture with an in-memory window and transport.
pub struct TestFixture {
    pub window: Arc<MemoryWindow>,
    pub transport: Arc<MemoryTransport>,
    pub config: SdkConfig,
    pub events: Arc<Mutex<Vec<InitEvent>>>,
}

impl TestFixture {
    /// Create a fixture for a page at `href`.
    pub fn new(href: &str) -> Self {
        Self {
            window: Arc::new(MemoryWindow::new(href).with_user_agent("oksdk-testkit")),
            transport: Arc::new(MemoryTransport::new()),
            config: SdkConfig::default(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A page launched with a platform session.
    pub fn session() -> Self {
        Self::new(SESSION_HREF)
    }

    /// A page returning from the OAuth redirect.
    pub fn token() -> Self {
        Self::new(TOKEN_HREF)
    }

    pub fn with_config(mut self, config: SdkConfig) -> Self {
        self.config = config;
        self
    }

    /// Run initialization with the fixture application.
    pub fn init(&mut self) -> Result<Initialized, SdkError> {
        self.init_with(InitConfig::new(APP_ID, APP_KEY))
    }

    /// Run initialization with a custom configuration.
    pub fn init_with(&mut self, init: InitConfig) -> Result<Initialized, SdkError> {
        let (callbacks, events) = recording_callbacks();
        self.events = events;
        Sdk::init(
            init,
            self.config.clone(),
            self.window.clone(),
            self.transport.clone(),
            callbacks,
        )
    }

    /// Initialize and return the ready SDK.
    ///
    /// # Panics
    ///
    /// Panics if initialization fails or redirects.
    pub fn ready(&mut self) -> Sdk {
        match self.init() {
            Ok(Initialized::Ready(sdk)) => sdk,
            other => panic!("fixture did not initialize: {other:?}"),
        }
    }

    /// What the init callbacks reported so far.
    pub fn events(&self) -> Vec<InitEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// The oldest request not yet taken.
    ///
    /// # Panics
    ///
    /// Panics if the transport saw no request.
    pub fn next_request(&self) -> LoadRequest {
        match self.transport.pop_request() {
            Some(request) => request,
            None => panic!("no request was loaded"),
        }
    }

    /// Complete the oldest outstanding request with `ok` and `data`.
    pub fn answer_ok(&self, sdk: &Sdk, data: Value) -> bool {
        let request = self.next_request();
        sdk.complete_raw(request.callback.as_str(), "ok", data, Value::Null)
    }
}
