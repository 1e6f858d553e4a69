use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),
}

/// Failures at the browser boundary.
///
/// Only [`ScrapeError::Driver`] is ever shown to an end user; everything else
/// is logged and converted to an empty or absent result by the scraper.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Browser session could not be started: {0}")]
    Driver(String),

    #[error("Timed out after {secs}s waiting for `{selector}`")]
    Timeout { selector: String, secs: u64 },

    #[error("Element not found: {0}")]
    NoSuchElement(String),

    #[error("WebDriver error: {0}")]
    Protocol(String),
}

/// Maximum length for WebDriver error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ScrapeError {
    /// Truncate a message to avoid logging whole page dumps
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn is_driver_failure(&self) -> bool {
        matches!(self, ScrapeError::Driver(_))
    }
}

impl From<thirtyfour::error::WebDriverError> for ScrapeError {
    fn from(e: thirtyfour::error::WebDriverError) -> Self {
        ScrapeError::Protocol(Self::truncate_body(&e.to_string()))
    }
}
