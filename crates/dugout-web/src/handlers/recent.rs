use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;

use dugout_core::models::recent::is_known_team;
use dugout_core::models::{RecentResults, TEAMS};

use crate::render;
use crate::state::AppState;

/// GET /recent
pub async fn recent_page(State(state): State<AppState>) -> Html<String> {
    let (all, fetched_at) = state.recent.all().await;
    let results: Vec<RecentResults> = TEAMS
        .iter()
        .map(|team| {
            let outcomes = all.get(*team).map(Vec::as_slice).unwrap_or_default();
            RecentResults::new(team, outcomes, fetched_at)
        })
        .collect();
    render::recent_page(&results)
}

/// GET /api/recent/{team}
pub async fn api_recent(State(state): State<AppState>, Path(team): Path<String>) -> Response {
    if !is_known_team(&team) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "unknown team" }))).into_response();
    }
    let recent = state.recent.get(&team).await;
    Json(json!({ "team": recent.team, "results": recent.results })).into_response()
}
