//! Average game duration page.

use std::collections::HashSet;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Html;
use axum::{Form, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use dugout_core::classify::DurationBand;
use dugout_core::models::recent::is_known_team;
use dugout_core::{collect_history_avg_runtime, time, ScrapeError};

use super::ranking::TokenQuery;
use crate::auth::ensure_refresh_authorized;
use crate::render;
use crate::state::AppState;

const SELECT_TEAM: &str = "팀을 선택해주세요.";
const DRIVER_UNAVAILABLE: &str =
    "브라우저를 시작하지 못했습니다. chromedriver가 실행 중인지(WEBDRIVER_URL) 확인한 뒤 다시 시도해주세요.";
const NO_HISTORY: &str = "과거 경기 데이터가 없습니다.";

/// What the hour page shows below the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourView {
    pub team: Option<String>,
    pub lines: Vec<String>,
    pub average_minutes: Option<f64>,
    pub band: Option<DurationBand>,
}

impl HourView {
    fn message(team: Option<&str>, line: &str) -> Self {
        Self {
            team: team.map(str::to_string),
            lines: vec![line.to_string()],
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HourForm {
    #[serde(default)]
    pub myteam: String,
}

/// GET /hour
pub async fn hour_form() -> Html<String> {
    render::hour_page(&HourView::default())
}

/// POST /hour
pub async fn hour_submit(State(state): State<AppState>, Form(form): Form<HourForm>) -> Html<String> {
    let view = hour_view(&state, form.myteam.trim(), time::today()).await;
    render::hour_page(&view)
}

/// GET /hour/ping
pub async fn ping() -> &'static str {
    "pong"
}

/// POST /hour/reset-cache -- drop cached runtimes and schedules
pub async fn reset_cache(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, String)> {
    ensure_refresh_authorized(&state.config, query.token.as_deref(), &headers)?;
    state.store.clear_history().await.map_err(|e| {
        warn!(error = %e, "Failed to clear history caches");
        (StatusCode::INTERNAL_SERVER_ERROR, "failed to clear caches".to_string())
    })?;
    Ok(Json(json!({ "ok": true })))
}

/// Rivals on today's card, then the average runtime against them. With no
/// game today every opponent in the window counts.
pub async fn hour_view(state: &AppState, team: &str, today: NaiveDate) -> HourView {
    if team.is_empty() || !is_known_team(team) {
        return HourView::message(None, SELECT_TEAM);
    }

    let matches = match state.scraper.fetch_today_matches(team, today).await {
        Ok(matches) => matches,
        Err(e) => return driver_failure(team, &e),
    };

    let mut rivals: Vec<String> = Vec::new();
    for m in matches {
        if !rivals.contains(&m.rival) {
            rivals.push(m.rival);
        }
    }

    let mut view = HourView {
        team: Some(team.to_string()),
        ..HourView::default()
    };
    let rival_set: Option<HashSet<String>> = if rivals.is_empty() {
        view.lines.push(format!(
            "오늘 {}의 경기를 찾지 못해 모든 상대팀과의 경기로 계산합니다.",
            team
        ));
        None
    } else {
        view.lines.push(format!("오늘 {}의 상대팀은 {}입니다.", team, rivals.join(", ")));
        Some(rivals.iter().cloned().collect())
    };

    let history = match collect_history_avg_runtime(
        &state.scraper,
        &state.store,
        team,
        rival_set.as_ref(),
        state.config.lookback,
        today,
    )
    .await
    {
        Ok(history) => history,
        Err(e) => return driver_failure(team, &e),
    };

    match history.average_minutes {
        Some(avg) => {
            let matchup = if rivals.is_empty() {
                team.to_string()
            } else {
                format!("{} vs {}", team, rivals.join(", "))
            };
            view.lines.push(format!(
                "과거 {} 평균 경기시간: {:.1}분 ({}경기)",
                matchup,
                avg,
                history.games()
            ));
            view.average_minutes = Some(avg);
            view.band = history.band(&state.config.thresholds);
        }
        None => view.lines.push(NO_HISTORY.to_string()),
    }

    info!(team, rivals = ?rivals, average = ?view.average_minutes, "Hour page computed");
    view
}

fn driver_failure(team: &str, e: &ScrapeError) -> HourView {
    warn!(team, error = %e, "Browser unavailable for hour page");
    HourView::message(Some(team), DRIVER_UNAVAILABLE)
}
