//! Browser sessions on a running `chromedriver`, driven through `thirtyfour`.

use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::prelude::{By, DesiredCapabilities, ElementQueryable};
use thirtyfour::{ChromeCapabilities, ChromiumLikeCapabilities};
use tracing::{debug, warn};

use super::{Browser, BrowserConfig, BrowserSession};
use crate::error::ScrapeError;

/// Interval between element lookups while waiting
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Launches headless Chrome sessions against a chromedriver endpoint.
#[derive(Clone)]
pub struct WebDriver {
    server_url: String,
    capabilities: ChromeCapabilities,
}

impl WebDriver {
    pub fn new(config: BrowserConfig) -> Result<Self, ScrapeError> {
        let mut capabilities = DesiredCapabilities::chrome();
        for arg in config.chrome_args() {
            capabilities.add_arg(&arg)?;
        }
        if let Some(ref binary) = config.chrome_bin {
            capabilities.set_binary(binary)?;
        }
        Ok(Self {
            server_url: config.webdriver_url.trim_end_matches('/').to_string(),
            capabilities,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

#[async_trait]
impl Browser for WebDriver {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ScrapeError> {
        let driver = thirtyfour::WebDriver::new(self.server_url.as_str(), self.capabilities.clone())
            .await
            .map_err(|e| ScrapeError::Driver(format!("cannot start a session at {}: {}", self.server_url, e)))?;
        debug!(server = %self.server_url, "Browser session started");
        Ok(Box::new(WebDriverSession { driver: Some(driver) }))
    }
}

/// One Chrome session. `None` once quit.
pub struct WebDriverSession {
    driver: Option<thirtyfour::WebDriver>,
}

impl WebDriverSession {
    fn driver(&self) -> Result<&thirtyfour::WebDriver, ScrapeError> {
        self.driver
            .as_ref()
            .ok_or_else(|| ScrapeError::Protocol("session already closed".to_string()))
    }
}

fn timed_out(what: &str, timeout: Duration, e: thirtyfour::error::WebDriverError) -> ScrapeError {
    debug!(target_element = what, error = %e, "Wait gave up");
    ScrapeError::Timeout {
        selector: what.to_string(),
        secs: timeout.as_secs(),
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.driver()?.goto(url).await?;
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), ScrapeError> {
        self.driver()?
            .query(By::Css(selector))
            .wait(timeout, POLL_INTERVAL)
            .first()
            .await
            .map_err(|e| timed_out(selector, timeout, e))?;
        Ok(())
    }

    async fn click_link(&mut self, text: &str, timeout: Duration) -> Result<(), ScrapeError> {
        let link = self
            .driver()?
            .query(By::PartialLinkText(text))
            .wait(timeout, POLL_INTERVAL)
            .first()
            .await
            .map_err(|e| timed_out(text, timeout, e))?;
        link.click().await?;
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, ScrapeError> {
        Ok(self.driver()?.source().await?)
    }

    async fn quit(&mut self) {
        if let Some(driver) = self.driver.take() {
            if let Err(e) = driver.quit().await {
                warn!(error = %e, "Failed to close browser session");
            }
        }
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        let Some(driver) = self.driver.take() else {
            return;
        };
        // Dropped without quit (panic or cancelled request)
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = driver.quit().await {
                        debug!(error = %e, "Background close of dropped browser session failed");
                    }
                });
            }
            Err(_) => warn!("Browser session leaked: no runtime to close it"),
        }
    }
}
