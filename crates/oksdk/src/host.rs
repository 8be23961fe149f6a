//! Host window abstraction.
//!
//! The SDK never touches a browser directly. It reads the page location
//! and asks the host to navigate or open a new browsing context through
//! [`HostWindow`].

/// The page the SDK runs in.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait HostWindow: Send + Sync {
    /// Full current URL.
    fn location_href(&self) -> String;

    /// Query part of the current URL, including the leading `?`.
    fn location_search(&self) -> String;

    /// Fragment part of the current URL, including the leading `#`.
    fn location_hash(&self) -> String;

    /// User agent reported in the legacy handshake.
    fn user_agent(&self) -> String {
        String::new()
    }

    /// Navigate the current page away.
    fn navigate(&self, url: &str);

    /// Open `url` in a new browsing context.
    fn open(&self, url: &str);
}

/// A simple in-memory window for testing.
///
/// Serves a fixed location and records navigations and opened URLs.
pub mod memory {
    use super::HostWindow;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    #[derive(Debug, Default)]
    struct Log {
        navigations: Vec<String>,
        opened: Vec<String>,
    }

    /// In-memory window implementation.
    #[derive(Debug)]
    pub struct MemoryWindow {
        href: String,
        user_agent: String,
        log: Mutex<Log>,
    }

    impl MemoryWindow {
        /// Create a window showing `href`.
        pub fn new(href: impl Into<String>) -> Self {
            Self {
                href: href.into(),
                user_agent: String::new(),
                log: Mutex::new(Log::default()),
            }
        }

        pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
            self.user_agent = user_agent.into();
            self
        }

        /// URLs passed to [`HostWindow::navigate`], oldest first.
        pub fn navigations(&self) -> Vec<String> {
            self.lock().navigations.clone()
        }

        /// URLs passed to [`HostWindow::open`], oldest first.
        pub fn opened(&self) -> Vec<String> {
            self.lock().opened.clone()
        }

        fn lock(&self) -> MutexGuard<'_, Log> {
            self.log.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn split(&self) -> (&str, &str) {
            let (before_hash, hash) = match self.href.find('#') {
                Some(i) => self.href.split_at(i),
                None => (self.href.as_str(), ""),
            };
            let search = before_hash.find('?').map(|i| &before_hash[i..]).unwrap_or("");
            (search, hash)
        }
    }

    impl HostWindow for MemoryWindow {
        fn location_href(&self) -> String {
            self.href.clone()
        }

        fn location_search(&self) -> String {
            self.split().0.to_string()
        }

        fn location_hash(&self) -> String {
            self.split().1.to_string()
        }

        fn user_agent(&self) -> String {
            self.user_agent.clone()
        }

        fn navigate(&self, url: &str) {
            self.lock().navigations.push(url.to_string());
        }

        fn open(&self, url: &str) {
            self.lock().opened.push(url.to_string());
        }
    }
}
