//! Core library for dugout.
//!
//! Scrapes KBO statistics through a headless browser, keeps them in a
//! lock-guarded in-memory cache mirrored to durable storage, and refreshes
//! them on a schedule. The web front-end lives in `dugout-web`.
//!
//! - [`browser`]: the narrow browser-automation boundary (WebDriver)
//! - [`scrape`]: page parsers and the [`Scraper`] that drives sessions
//! - [`cache`]: the [`CacheStore`], its persistence backends and the
//!   recent-results TTL cache
//! - [`refresh`]: the ranking refresh job and its periodic scheduler
//! - [`history`]: average game runtime over a lookback window
//! - [`classify`]: four-band game-duration classification

pub mod browser;
pub mod cache;
pub mod classify;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod refresh;
pub mod scrape;
pub mod time;

pub use cache::{CacheStore, RecentResultsCache};
pub use classify::{classify_duration, DurationBand, Thresholds};
pub use config::Config;
pub use error::{Error, Result, ScrapeError};
pub use history::{collect_history_avg_runtime, HistoryAverage, LookbackWindow};
pub use refresh::{RankingRefresher, RefreshOutcome};
pub use scrape::Scraper;
