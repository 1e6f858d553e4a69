//! Ranking refresh: on demand, when stale, and on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::models::RankingSnapshot;
use crate::scrape::Scraper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The snapshot was replaced with this many rows
    Refreshed(usize),
    /// The scrape came back empty; the previous snapshot was kept
    Unchanged,
}

impl RefreshOutcome {
    pub fn refreshed(&self) -> bool {
        matches!(self, RefreshOutcome::Refreshed(_))
    }
}

/// Scrapes the league table into the [`CacheStore`].
///
/// Refreshes are serialised: callers arriving while a scrape runs wait for
/// it instead of starting another.
pub struct RankingRefresher {
    scraper: Scraper,
    store: Arc<CacheStore>,
    gate: tokio::sync::Mutex<()>,
}

impl RankingRefresher {
    pub fn new(scraper: Scraper, store: Arc<CacheStore>) -> Self {
        Self {
            scraper,
            store,
            gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Scrape now and replace the snapshot if anything was found.
    /// Failures are logged, never returned.
    pub async fn refresh_rankings_cache(&self) -> RefreshOutcome {
        let _gate = self.gate.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> RefreshOutcome {
        let rows = self.scraper.fetch_rankings().await;
        if rows.is_empty() {
            warn!("Ranking scrape returned no rows, keeping previous snapshot");
            return RefreshOutcome::Unchanged;
        }

        let count = rows.len();
        if let Err(e) = self.store.replace_rankings(rows, Utc::now()).await {
            warn!(backend = self.store.backend_name(), error = %e, "Failed to persist ranking snapshot");
        }
        info!(rows = count, "Ranking snapshot refreshed");
        RefreshOutcome::Refreshed(count)
    }

    /// Refresh when the snapshot has never been filled or is older than
    /// `ttl`. Returns `None` when it was already fresh.
    pub async fn ensure_fresh(&self, ttl: Duration) -> Option<RefreshOutcome> {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365));
        if !self.store.snapshot().is_stale(ttl) {
            return None;
        }
        let _gate = self.gate.lock().await;
        // Another caller may have refreshed while this one waited
        if !self.store.snapshot().is_stale(ttl) {
            debug!("Ranking snapshot refreshed concurrently");
            return None;
        }
        Some(self.refresh_locked().await)
    }

    /// The snapshot to serve: reloaded from the backend when memory is
    /// empty, then scraped if still empty or older than `ttl`.
    pub async fn current(&self, ttl: Option<Duration>) -> RankingSnapshot {
        if self.store.snapshot().is_empty() {
            self.store.reload_snapshot().await;
        }
        if self.store.snapshot().is_empty() {
            let _gate = self.gate.lock().await;
            if self.store.snapshot().is_empty() {
                self.refresh_locked().await;
            }
        } else if let Some(ttl) = ttl {
            self.ensure_fresh(ttl).await;
        }
        self.store.snapshot()
    }

    /// Refresh once immediately, then every `every`.
    pub fn spawn_periodic(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = every.as_secs(), "Ranking refresh scheduler started");
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let outcome = self.refresh_rankings_cache().await;
                debug!(?outcome, "Scheduled ranking refresh finished");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::FakeBrowser;
    use crate::cache::backend::testing::MemoryBackend;
    use crate::cache::{CachePaths, JsonFileBackend};
    use crate::models::RankingRow;
    use crate::scrape::fixtures::RANKINGS_PAGE;
    use crate::scrape::{ScrapeTimeouts, RANKINGS_URL};
    use tempfile::TempDir;

    async fn refresher(browser: &FakeBrowser, dir: &TempDir) -> RankingRefresher {
        let store = CacheStore::open(Arc::new(JsonFileBackend::new(CachePaths::in_dir(dir.path())))).await;
        let scraper = Scraper::new(Arc::new(browser.clone())).with_timeouts(ScrapeTimeouts::immediate());
        RankingRefresher::new(scraper, Arc::new(store))
    }

    fn stale_row() -> RankingRow {
        RankingRow {
            rank: 1,
            team_name: "두산".to_string(),
            logo_url: String::new(),
            gb: "-".to_string(),
            wins: "1".to_string(),
            draws: "0".to_string(),
            losses: "0".to_string(),
        }
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshot() {
        let dir = TempDir::new().unwrap();
        let browser = FakeBrowser::new().with_page(RANKINGS_URL, RANKINGS_PAGE);
        let refresher = refresher(&browser, &dir).await;
        let started = Utc::now();

        assert_eq!(refresher.refresh_rankings_cache().await, RefreshOutcome::Refreshed(2));
        let snapshot = refresher.store().snapshot();
        let teams: Vec<&str> = snapshot.rankings.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(teams, vec!["LG", "한화"]);
        assert!(snapshot.updated_at.unwrap() >= started);
    }

    #[tokio::test]
    async fn test_empty_scrape_keeps_snapshot() {
        let dir = TempDir::new().unwrap();
        let browser = FakeBrowser::new();
        let refresher = refresher(&browser, &dir).await;
        let at = Utc::now() - chrono::Duration::hours(2);
        refresher.store().replace_rankings(vec![stale_row()], at).await.unwrap();

        assert_eq!(refresher.refresh_rankings_cache().await, RefreshOutcome::Unchanged);
        let snapshot = refresher.store().snapshot();
        assert_eq!(snapshot.updated_at, Some(at));
        assert_eq!(snapshot.rankings, vec![stale_row()]);
    }

    #[tokio::test]
    async fn test_ensure_fresh() {
        let dir = TempDir::new().unwrap();
        let browser = FakeBrowser::new().with_page(RANKINGS_URL, RANKINGS_PAGE);
        let refresher = refresher(&browser, &dir).await;
        let ttl = Duration::from_secs(600);

        // Never filled counts as stale
        assert_eq!(refresher.ensure_fresh(ttl).await, Some(RefreshOutcome::Refreshed(2)));
        assert_eq!(refresher.ensure_fresh(ttl).await, None);
        assert_eq!(browser.launches(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_scrape() {
        let dir = TempDir::new().unwrap();
        let browser = FakeBrowser::new().with_page(RANKINGS_URL, RANKINGS_PAGE);
        let refresher = refresher(&browser, &dir).await;
        let ttl = Duration::from_secs(600);

        let (a, b, c) = tokio::join!(
            refresher.ensure_fresh(ttl),
            refresher.ensure_fresh(ttl),
            refresher.current(Some(ttl)),
        );
        assert_eq!([a, b].iter().filter(|o| o.is_some()).count(), 1);
        assert_eq!(c.rankings.len(), 2);
        assert_eq!(browser.launches(), 1);
    }

    #[tokio::test]
    async fn test_current_reloads_from_backend_first() {
        let dir = TempDir::new().unwrap();
        {
            let browser = FakeBrowser::new().with_page(RANKINGS_URL, RANKINGS_PAGE);
            refresher(&browser, &dir).await.refresh_rankings_cache().await;
        }

        let browser = FakeBrowser::new();
        let refresher = refresher(&browser, &dir).await;
        let snapshot = refresher.current(None).await;
        assert_eq!(snapshot.rankings.len(), 2);
        assert_eq!(browser.launches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_refresh_runs_immediately_and_on_interval() {
        let browser = FakeBrowser::new().with_page(RANKINGS_URL, RANKINGS_PAGE);
        let store = CacheStore::open(Arc::new(MemoryBackend::default())).await;
        let scraper = Scraper::new(Arc::new(browser.clone())).with_timeouts(ScrapeTimeouts::immediate());
        let refresher = Arc::new(RankingRefresher::new(scraper, Arc::new(store)));

        let handle = refresher.clone().spawn_periodic(Duration::from_secs(300));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(browser.launches(), 1);
        assert!(!refresher.store().snapshot().is_empty());

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(browser.launches(), 2);
        handle.abort();
    }
}
