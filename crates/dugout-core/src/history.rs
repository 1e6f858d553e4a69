//! Average game runtime over a lookback window.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::classify::{classify_duration, DurationBand, Thresholds};
use crate::error::ScrapeError;
use crate::models::{runtime_key, ScheduleEntry};
use crate::scrape::{LazySession, Scraper};
use crate::time::compact;

/// Which past dates to aggregate. The window always ends yesterday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookbackWindow {
    Since(NaiveDate),
    Days(u32),
}

impl LookbackWindow {
    /// Dates from the window start through the day before `today`.
    pub fn dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let start = match *self {
            LookbackWindow::Since(date) => date,
            LookbackWindow::Days(days) => today
                .checked_sub_signed(Duration::days(i64::from(days)))
                .unwrap_or(NaiveDate::MIN),
        };
        start.iter_days().take_while(|d| *d < today).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryAverage {
    /// Mean runtime rounded to one decimal; `None` when no game was found.
    pub average_minutes: Option<f64>,
    pub minutes: Vec<u32>,
}

impl HistoryAverage {
    pub fn from_minutes(minutes: Vec<u32>) -> Self {
        let average_minutes = if minutes.is_empty() {
            None
        } else {
            let total: u64 = minutes.iter().map(|&m| u64::from(m)).sum();
            let mean = total as f64 / minutes.len() as f64;
            Some((mean * 10.0).round() / 10.0)
        };
        Self {
            average_minutes,
            minutes,
        }
    }

    pub fn games(&self) -> usize {
        self.minutes.len()
    }

    pub fn band(&self, thresholds: &Thresholds) -> Option<DurationBand> {
        self.average_minutes.map(|avg| classify_duration(avg, thresholds))
    }
}

/// Average runtime of `team`'s games in `window`, against `rivals` only
/// when given.
///
/// Schedules and runtimes come from `store` when cached and are scraped
/// otherwise; scraped values are cached except for `today`. One browser
/// session, opened on the first cache miss, serves the whole aggregation.
/// Only a browser that cannot be started is an error.
pub async fn collect_history_avg_runtime(
    scraper: &Scraper,
    store: &CacheStore,
    team: &str,
    rivals: Option<&HashSet<String>>,
    window: LookbackWindow,
    today: NaiveDate,
) -> Result<HistoryAverage, ScrapeError> {
    let mut session = scraper.lazy_session();
    let collected = collect_minutes(scraper, store, &mut session, team, rivals, window, today).await;
    session.close().await;

    let history = HistoryAverage::from_minutes(collected?);
    info!(
        team,
        games = history.games(),
        average = ?history.average_minutes,
        "History runtime aggregated"
    );
    Ok(history)
}

async fn collect_minutes(
    scraper: &Scraper,
    store: &CacheStore,
    session: &mut LazySession,
    team: &str,
    rivals: Option<&HashSet<String>>,
    window: LookbackWindow,
    today: NaiveDate,
) -> Result<Vec<u32>, ScrapeError> {
    let mut minutes = Vec::new();

    for date in window.dates(today) {
        let Some(games) = schedule_for(scraper, store, session, date, today).await? else {
            continue;
        };

        let relevant = games.iter().filter(|game| {
            game.opponent_of(team)
                .is_some_and(|opponent| rivals.map_or(true, |r| r.contains(opponent)))
        });

        for game in relevant {
            if let Some(m) = runtime_for(scraper, store, session, game, today).await? {
                minutes.push(m);
            }
        }
    }
    Ok(minutes)
}

async fn schedule_for(
    scraper: &Scraper,
    store: &CacheStore,
    session: &mut LazySession,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<Option<Vec<ScheduleEntry>>, ScrapeError> {
    let key = compact(date);
    if let Some(games) = store.schedule(&key) {
        return Ok(Some(games));
    }

    let Some(games) = scraper.schedule_in(session.get().await?, &key).await else {
        return Ok(None);
    };
    if date < today {
        if let Err(e) = store.set_schedule(&key, games.clone()).await {
            warn!(date = %key, error = %e, "Failed to persist schedule");
        }
    }
    debug!(date = %key, games = games.len(), "Schedule scraped");
    Ok(Some(games))
}

async fn runtime_for(
    scraper: &Scraper,
    store: &CacheStore,
    session: &mut LazySession,
    game: &ScheduleEntry,
    today: NaiveDate,
) -> Result<Option<u32>, ScrapeError> {
    let key = runtime_key(&game.game_id, &game.game_date);
    if let Some(m) = store.runtime(&key) {
        return Ok(Some(m));
    }

    let scraped = scraper
        .runtime_in(session.get().await?, &game.game_id, &game.game_date)
        .await;
    let played_before_today = crate::time::parse_compact(&game.game_date).is_some_and(|d| d < today);
    if let (Some(m), true) = (scraped, played_before_today) {
        if let Err(e) = store.set_runtime(&key, m).await {
            warn!(key = %key, error = %e, "Failed to persist runtime");
        }
    }
    Ok(scraped)
}
