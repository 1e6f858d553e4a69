use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::models::{Outcome, RecentResults};
use crate::scrape::Scraper;
use crate::time;

/// Default lifetime of scraped recent results
pub const DEFAULT_RECENT_TTL: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: Instant,
    pub fetched_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Instant::now(),
            fetched_at: Utc::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.cached_at.elapsed()
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

/// Every team's last five outcomes, scraped at most once per TTL.
///
/// The team-rank page lists all teams, so one scrape serves every team.
/// A failed scrape never replaces earlier results.
pub struct RecentResultsCache {
    scraper: Scraper,
    ttl: Duration,
    entry: Mutex<Option<CachedData<HashMap<String, Vec<Outcome>>>>>,
}

impl RecentResultsCache {
    pub fn new(scraper: Scraper, ttl: Duration) -> Self {
        Self {
            scraper,
            ttl,
            entry: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// `team`'s recent results, padded to five entries.
    pub async fn get(&self, team: &str) -> RecentResults {
        let (all, fetched_at) = self.all().await;
        let outcomes = all.get(team).map(Vec::as_slice).unwrap_or_default();
        RecentResults::new(team, outcomes, fetched_at)
    }

    /// Results for every team on the page, with the time they were scraped.
    ///
    /// The lock is held through the scrape so concurrent requests after
    /// expiry wait for one scrape instead of starting their own.
    pub async fn all(&self) -> (HashMap<String, Vec<Outcome>>, DateTime<Utc>) {
        let mut entry = self.entry.lock().await;
        if let Some(cached) = entry.as_ref().filter(|c| c.is_fresh(self.ttl)) {
            debug!(age_secs = cached.age().as_secs(), "Recent results served from cache");
            return (cached.data.clone(), cached.fetched_at);
        }

        let season = Scraper::season_of(time::today());
        let scraped = self.scraper.fetch_recent_results(season).await;
        if scraped.is_empty() {
            warn!(season, "No recent results scraped, keeping previous results");
            return match entry.as_ref() {
                Some(stale) => (stale.data.clone(), stale.fetched_at),
                None => (HashMap::new(), Utc::now()),
            };
        }

        let cached = CachedData::new(scraped);
        let result = (cached.data.clone(), cached.fetched_at);
        *entry = Some(cached);
        result
    }
}
