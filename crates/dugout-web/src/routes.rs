use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, hour, proxy, ranking, recent};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    // The recent-results API is read from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(ranking::dashboard))
        // Rankings
        .route("/team-ranking", get(ranking::team_ranking))
        .route("/team-ranking.json", get(ranking::team_ranking_json))
        .route("/cache.json", get(ranking::cache_json))
        .route("/refresh", get(ranking::refresh).post(ranking::refresh))
        .route("/proxy-logo", get(proxy::proxy_logo))
        // Average game duration
        .route("/hour", get(hour::hour_form).post(hour::hour_submit))
        .route("/hour/ping", get(hour::ping))
        .route("/hour/reset-cache", post(hour::reset_cache))
        // Recent results
        .route("/recent", get(recent::recent_page))
        .route("/api/recent/{team}", get(recent::api_recent))
        .route("/ping", get(handlers::ping))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
