//! Browser automation boundary.
//!
//! The scraper only needs a handful of operations from a browser: open a
//! session, navigate, wait for an element, click a link, read the rendered
//! document, and quit. [`Browser`] and [`BrowserSession`] capture exactly
//! that, so the scraper can be driven by a real headless Chrome through
//! [`WebDriver`] or by canned pages in tests.

pub mod webdriver;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScrapeError;

pub use webdriver::WebDriver;

/// Mobile Safari user agent; the mobile sites serve lighter markup to it.
pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Mobile/15E148 Safari/604.1";

/// Default chromedriver endpoint
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    /// Chrome/Chromium binary; chromedriver's default when absent.
    pub chrome_bin: Option<String>,
    pub user_agent: String,
    pub window_size: (u32, u32),
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            chrome_bin: None,
            user_agent: MOBILE_USER_AGENT.to_string(),
            window_size: (1280, 1200),
            headless: true,
        }
    }
}

impl BrowserConfig {
    /// Command-line switches passed to Chrome.
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.headless {
            args.push("--headless=new".to_string());
        }
        args.extend(
            ["--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage", "--disable-extensions"]
                .iter()
                .map(|s| s.to_string()),
        );
        args.push(format!("--window-size={},{}", self.window_size.0, self.window_size.1));
        args.push(format!("user-agent={}", self.user_agent));
        args
    }
}

/// Something that can open browser sessions.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Start a new session. Errors here are always [`ScrapeError::Driver`].
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ScrapeError>;
}

/// One live browser session.
///
/// Callers must call [`BrowserSession::quit`] on every exit path; `quit` is
/// idempotent and never fails.
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// Wait until `selector` (CSS) matches at least one element.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), ScrapeError>;

    /// Wait for a link whose text contains `text`, then click it.
    async fn click_link(&mut self, text: &str, timeout: Duration) -> Result<(), ScrapeError>;

    /// The current rendered document.
    async fn page_source(&mut self) -> Result<String, ScrapeError>;

    async fn quit(&mut self);
}

#[cfg(test)]
pub mod testing {
    //! In-memory browser serving canned pages by URL.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default)]
    pub struct FakeBrowserState {
        pub pages: HashMap<String, String>,
        /// Pages that appear after clicking a link on the keyed URL
        pub after_click: HashMap<String, String>,
        pub visited: Vec<String>,
        pub launches: usize,
        pub quits: usize,
        pub fail_launch: bool,
    }

    #[derive(Clone, Default)]
    pub struct FakeBrowser {
        pub state: Arc<Mutex<FakeBrowserState>>,
        pub open_sessions: Arc<AtomicUsize>,
    }

    impl FakeBrowser {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(self, url: &str, html: &str) -> Self {
            self.state.lock().unwrap().pages.insert(url.to_string(), html.to_string());
            self
        }

        pub fn with_page_after_click(self, url: &str, html: &str) -> Self {
            self.state
                .lock()
                .unwrap()
                .after_click
                .insert(url.to_string(), html.to_string());
            self
        }

        pub fn failing() -> Self {
            let browser = Self::default();
            browser.state.lock().unwrap().fail_launch = true;
            browser
        }

        pub fn visited(&self) -> Vec<String> {
            self.state.lock().unwrap().visited.clone()
        }

        pub fn launches(&self) -> usize {
            self.state.lock().unwrap().launches
        }

        pub fn quits(&self) -> usize {
            self.state.lock().unwrap().quits
        }
    }

    #[async_trait]
    impl Browser for FakeBrowser {
        async fn launch(&self) -> Result<Box<dyn BrowserSession>, ScrapeError> {
            let mut state = self.state.lock().unwrap();
            if state.fail_launch {
                return Err(ScrapeError::Driver("chromedriver not found".to_string()));
            }
            state.launches += 1;
            self.open_sessions.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeSession {
                state: self.state.clone(),
                open_sessions: self.open_sessions.clone(),
                current: None,
                closed: false,
            }))
        }
    }

    pub struct FakeSession {
        state: Arc<Mutex<FakeBrowserState>>,
        open_sessions: Arc<AtomicUsize>,
        current: Option<String>,
        closed: bool,
    }

    #[async_trait]
    impl BrowserSession for FakeSession {
        async fn navigate(&mut self, url: &str) -> Result<(), ScrapeError> {
            let mut state = self.state.lock().unwrap();
            state.visited.push(url.to_string());
            self.current = state.pages.get(url).cloned();
            Ok(())
        }

        async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), ScrapeError> {
            let found = self.current.as_deref().is_some_and(|html| {
                let document = scraper::Html::parse_document(html);
                scraper::Selector::parse(selector)
                    .map(|s| document.select(&s).next().is_some())
                    .unwrap_or(false)
            });
            if found {
                Ok(())
            } else {
                Err(ScrapeError::Timeout {
                    selector: selector.to_string(),
                    secs: timeout.as_secs(),
                })
            }
        }

        async fn click_link(&mut self, text: &str, _timeout: Duration) -> Result<(), ScrapeError> {
            let state = self.state.lock().unwrap();
            let url = state.visited.last().cloned().unwrap_or_default();
            match state.after_click.get(&url) {
                Some(html) => {
                    self.current = Some(html.clone());
                    Ok(())
                }
                None => Err(ScrapeError::NoSuchElement(text.to_string())),
            }
        }

        async fn page_source(&mut self) -> Result<String, ScrapeError> {
            self.current
                .clone()
                .ok_or_else(|| ScrapeError::Protocol("no page loaded".to_string()))
        }

        async fn quit(&mut self) {
            if !self.closed {
                self.closed = true;
                self.state.lock().unwrap().quits += 1;
                self.open_sessions.fetch_sub(1, Ordering::SeqCst);
            }
        }
    }
}
