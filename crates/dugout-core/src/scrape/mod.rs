//! Scraping of KBO pages through a [`Browser`].
//!
//! Parsers live in the submodules and work on plain HTML strings. The
//! [`Scraper`] owns the browser side: it opens sessions, navigates, waits for
//! the page to render and hands the document to the parsers. Failures never
//! leave this module as errors, except a browser that cannot be started at
//! all; everything else is logged and becomes an empty or absent result.

pub mod rankings;
pub mod recent;
pub mod runtime;
pub mod schedule;
pub mod text;

#[cfg(test)]
pub(crate) mod fixtures;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use crate::browser::{Browser, BrowserSession};
use crate::error::ScrapeError;
use crate::models::{Outcome, RankingRow, ScheduleEntry, TodayMatch};
use crate::time::compact;

pub use rankings::parse_rankings;
pub use recent::parse_recent_results;
pub use runtime::{parse_duration_minutes, parse_runtime};
pub use schedule::{parse_game_cards, parse_schedule, GameCard};

/// Mobile Naver Sports league table
pub const RANKINGS_URL: &str = "https://m.sports.naver.com/kbaseball/record/index";

/// Mobile Naver Sports team-rank tab (with recent results), per season
const TEAM_RANK_URL: &str = "https://m.sports.naver.com/kbaseball/record/kbo";

/// KBO game center, by date or by game
const GAME_CENTER_URL: &str = "https://www.koreabaseball.com/Schedule/GameCenter/Main.aspx";

/// Link text of the review tab on a game's detail view
const REVIEW_TAB_TEXT: &str = "리뷰";

pub fn schedule_url(date: &str) -> String {
    format!("{}?gameDate={}", GAME_CENTER_URL, date)
}

pub fn game_url(game_id: &str, game_date: &str) -> String {
    format!("{}?gameId={}&gameDate={}", GAME_CENTER_URL, game_id, game_date)
}

pub fn review_url(game_id: &str, game_date: &str) -> String {
    format!("{}&section=REVIEW", game_url(game_id, game_date))
}

pub fn team_rank_url(season: i32) -> String {
    format!("{}?seasonCode={}&tab=teamRank", TEAM_RANK_URL, season)
}

/// Bounded waits used while scraping.
#[derive(Debug, Clone, Copy)]
pub struct ScrapeTimeouts {
    /// Waiting for the ranking table to render
    pub rankings: Duration,
    /// Waiting for game-center pages
    pub page: Duration,
    /// Waiting for the team-rank table
    pub team_rank: Duration,
    /// Waiting for the review tab to become clickable
    pub review_tab: Duration,
    /// Pause after a page is ready, for text rendered late by scripts
    pub settle: Duration,
}

impl Default for ScrapeTimeouts {
    fn default() -> Self {
        Self {
            rankings: Duration::from_secs(40),
            page: Duration::from_secs(10),
            team_rank: Duration::from_secs(12),
            review_tab: Duration::from_secs(3),
            settle: Duration::from_millis(1200),
        }
    }
}

impl ScrapeTimeouts {
    /// No settle pauses; for canned pages.
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Drives browser sessions and parses what they render.
/// Clone is cheap - the browser handle is shared.
#[derive(Clone)]
pub struct Scraper {
    browser: Arc<dyn Browser>,
    timeouts: ScrapeTimeouts,
}

impl Scraper {
    pub fn new(browser: Arc<dyn Browser>) -> Self {
        Self {
            browser,
            timeouts: ScrapeTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: ScrapeTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// A session opened on first use and reused afterwards.
    pub fn lazy_session(&self) -> LazySession {
        LazySession {
            browser: self.browser.clone(),
            session: None,
        }
    }

    async fn settle(&self) {
        if !self.timeouts.settle.is_zero() {
            tokio::time::sleep(self.timeouts.settle).await;
        }
    }

    // ===== League table =====

    /// Current league table; empty when the page could not be scraped.
    pub async fn fetch_rankings(&self) -> Vec<RankingRow> {
        let mut session = match self.browser.launch().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Cannot start browser for rankings");
                return Vec::new();
            }
        };
        let result = self.rankings_in(session.as_mut()).await;
        session.quit().await;

        match result {
            Ok(rows) => {
                info!(count = rows.len(), "Rankings scraped");
                rows
            }
            Err(e) => {
                warn!(error = %e, "Rankings scrape failed");
                Vec::new()
            }
        }
    }

    async fn rankings_in(&self, session: &mut dyn BrowserSession) -> Result<Vec<RankingRow>, ScrapeError> {
        session.navigate(RANKINGS_URL).await?;
        session
            .wait_for(rankings::RANKINGS_CONTAINER, self.timeouts.rankings)
            .await?;
        session.wait_for(rankings::RANKINGS_ROW, self.timeouts.rankings).await?;
        self.settle().await;
        let html = session.page_source().await?;
        Ok(parse_rankings(&html))
    }

    // ===== Game center =====

    /// Complete schedule entries for `date` (`YYYYMMDD`). `None` when the page
    /// did not load, as opposed to a day without games.
    pub async fn schedule_in(&self, session: &mut dyn BrowserSession, date: &str) -> Option<Vec<ScheduleEntry>> {
        match self.game_cards_in(session, date).await {
            Ok(cards) => Some(cards.iter().filter_map(GameCard::to_entry).collect()),
            Err(e) => {
                warn!(date, error = %e, "Schedule scrape failed");
                None
            }
        }
    }

    async fn game_cards_in(&self, session: &mut dyn BrowserSession, date: &str) -> Result<Vec<GameCard>, ScrapeError> {
        session.navigate(&schedule_url(date)).await?;
        session.wait_for("body", self.timeouts.page).await?;
        let html = session.page_source().await?;
        Ok(parse_game_cards(&html))
    }

    /// Runtime in minutes of a finished game, from its review panel.
    pub async fn runtime_in(&self, session: &mut dyn BrowserSession, game_id: &str, game_date: &str) -> Option<u32> {
        match self.review_page_in(session, game_id, game_date).await {
            Ok(html) => {
                let minutes = parse_runtime(&html);
                if minutes.is_none() {
                    debug!(game_id, game_date, "No runtime in review panel");
                }
                minutes
            }
            Err(e) => {
                warn!(game_id, game_date, error = %e, "Runtime scrape failed");
                None
            }
        }
    }

    async fn review_page_in(
        &self,
        session: &mut dyn BrowserSession,
        game_id: &str,
        game_date: &str,
    ) -> Result<String, ScrapeError> {
        session.navigate(&game_url(game_id, game_date)).await?;
        self.settle().await;

        // The review tab is script-driven; when it cannot be clicked the
        // section can still be requested directly.
        match session.click_link(REVIEW_TAB_TEXT, self.timeouts.review_tab).await {
            Ok(()) => self.settle().await,
            Err(e) => {
                debug!(game_id, error = %e, "Review tab not clickable, loading review section directly");
                session.navigate(&review_url(game_id, game_date)).await?;
                self.settle().await;
            }
        }
        session.page_source().await
    }

    /// Schedule for one date in a dedicated session.
    pub async fn fetch_schedule_for_date(&self, date: &str) -> Vec<ScheduleEntry> {
        let mut session = self.lazy_session();
        let entries = match session.get().await {
            Ok(s) => self.schedule_in(s, date).await.unwrap_or_default(),
            Err(e) => {
                warn!(date, error = %e, "Cannot start browser for schedule");
                Vec::new()
            }
        };
        session.close().await;
        entries
    }

    /// Runtime of one game in a dedicated session.
    pub async fn fetch_runtime(&self, game_id: &str, game_date: &str) -> Option<u32> {
        let mut session = self.lazy_session();
        let minutes = match session.get().await {
            Ok(s) => self.runtime_in(s, game_id, game_date).await,
            Err(e) => {
                warn!(game_id, error = %e, "Cannot start browser for runtime");
                None
            }
        };
        session.close().await;
        minutes
    }

    /// `team`'s games on `today`'s card. Only a browser that cannot start is
    /// reported as an error; a page that fails to load yields no matches.
    pub async fn fetch_today_matches(&self, team: &str, today: NaiveDate) -> Result<Vec<TodayMatch>, ScrapeError> {
        let date = compact(today);
        let mut session = self.browser.launch().await?;
        let result = self.game_cards_in(session.as_mut(), &date).await;
        session.quit().await;

        match result {
            Ok(cards) => {
                let matches: Vec<TodayMatch> = cards.iter().filter_map(|card| card.match_for(team)).collect();
                debug!(team, date = %date, cards = cards.len(), matches = matches.len(), "Today's card scraped");
                Ok(matches)
            }
            Err(e) => {
                warn!(team, date = %date, error = %e, "Today's game cards could not be scraped, treating as no game");
                Ok(Vec::new())
            }
        }
    }

    // ===== Recent results =====

    /// Last five outcomes of every team. Empty when the page could not be
    /// scraped.
    pub async fn fetch_recent_results(&self, season: i32) -> HashMap<String, Vec<Outcome>> {
        let mut session = match self.browser.launch().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Cannot start browser for recent results");
                return HashMap::new();
            }
        };
        let result = self.recent_in(session.as_mut(), season).await;
        session.quit().await;

        result.unwrap_or_else(|e| {
            warn!(error = %e, "Recent results scrape failed");
            HashMap::new()
        })
    }

    async fn recent_in(
        &self,
        session: &mut dyn BrowserSession,
        season: i32,
    ) -> Result<HashMap<String, Vec<Outcome>>, ScrapeError> {
        session.navigate(&team_rank_url(season)).await?;
        session.wait_for(recent::TEAM_ROW, self.timeouts.team_rank).await?;

        let mut results = parse_recent_results(&session.page_source().await?);
        if results.values().all(Vec::is_empty) {
            // Result badges render after the table; give them one more chance
            self.settle().await;
            results = parse_recent_results(&session.page_source().await?);
        }
        Ok(results)
    }

    /// Season of `date`; the KBO season runs within one calendar year.
    pub fn season_of(date: NaiveDate) -> i32 {
        date.year()
    }
}

/// A browser session started on first use and always quit by
/// [`LazySession::close`].
pub struct LazySession {
    browser: Arc<dyn Browser>,
    session: Option<Box<dyn BrowserSession>>,
}

impl LazySession {
    pub async fn get(&mut self) -> Result<&mut dyn BrowserSession, ScrapeError> {
        if self.session.is_none() {
            self.session = Some(self.browser.launch().await?);
        }
        match self.session.as_mut() {
            Some(session) => Ok(session.as_mut()),
            None => Err(ScrapeError::Driver("session unavailable".to_string())),
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub async fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.quit().await;
        }
    }
}
