use std::sync::Arc;
use std::time::Duration;

use dugout_core::{CacheStore, Config, RankingRefresher, RecentResultsCache, Scraper};

/// Timeout for logo fetches through `/proxy-logo`
const PROXY_TIMEOUT: Duration = Duration::from_secs(8);

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<CacheStore>,
    pub scraper: Scraper,
    pub refresher: Arc<RankingRefresher>,
    pub recent: Arc<RecentResultsCache>,
    /// Client for upstream image fetches
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config, store: Arc<CacheStore>, scraper: Scraper) -> anyhow::Result<Self> {
        let refresher = Arc::new(RankingRefresher::new(scraper.clone(), store.clone()));
        let recent = Arc::new(RecentResultsCache::new(scraper.clone(), config.recent_ttl));
        let http = reqwest::Client::builder().timeout(PROXY_TIMEOUT).build()?;

        Ok(Self {
            config: Arc::new(config),
            store,
            scraper,
            refresher,
            recent,
            http,
        })
    }
}
