use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dugout_core::models::RankingSnapshot;

use crate::auth::ensure_refresh_authorized;
use crate::render;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub ok: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub refreshed: bool,
}

/// GET /
pub async fn dashboard() -> Html<String> {
    render::dashboard()
}

/// GET /team-ranking
pub async fn team_ranking(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.refresher.current(state.config.cache_ttl).await;
    render::ranking_page(&snapshot)
}

/// GET /team-ranking.json
pub async fn team_ranking_json(State(state): State<AppState>) -> Json<RankingSnapshot> {
    Json(state.store.snapshot())
}

/// GET /cache.json -- the persisted snapshot document as stored
pub async fn cache_json(State(state): State<AppState>) -> Response {
    match state.store.raw_snapshot_json().await {
        Ok(raw) => ([(header::CONTENT_TYPE, "application/json; charset=utf-8")], raw).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to read persisted snapshot");
            (StatusCode::INTERNAL_SERVER_ERROR, "cache unavailable").into_response()
        }
    }
}

/// GET|POST /refresh -- scrape now
pub async fn refresh(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, (StatusCode, String)> {
    ensure_refresh_authorized(&state.config, query.token.as_deref(), &headers)?;

    let outcome = state.refresher.refresh_rankings_cache().await;
    info!(?outcome, "Manual ranking refresh");
    Ok(Json(RefreshResponse {
        ok: true,
        updated_at: state.store.snapshot().updated_at,
        refreshed: outcome.refreshed(),
    }))
}
