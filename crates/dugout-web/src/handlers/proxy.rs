use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::warn;

use dugout_core::browser::MOBILE_USER_AGENT;

use crate::state::AppState;

/// Logo hosts reject requests without a sports-site referer
const LOGO_REFERER: &str = "https://sports.naver.com";
const DEFAULT_CONTENT_TYPE: &str = "image/png";

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

/// GET /proxy-logo?url= -- relay a team logo through this server
pub async fn proxy_logo(State(state): State<AppState>, Query(query): Query<ProxyQuery>) -> Response {
    let Some(url) = query.url.filter(|u| !u.trim().is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing URL").into_response();
    };

    let upstream = state
        .http
        .get(&url)
        .header(header::REFERER, LOGO_REFERER)
        .header(header::USER_AGENT, MOBILE_USER_AGENT)
        .send()
        .await;

    match upstream {
        Ok(resp) if resp.status() == reqwest::StatusCode::OK => {
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string();
            let body = Body::from_stream(resp.bytes_stream());
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Ok(resp) => {
            warn!(url = %url, status = resp.status().as_u16(), "Logo upstream returned an error");
            (
                StatusCode::BAD_GATEWAY,
                format!("Image fetch failed with status {}", resp.status().as_u16()),
            )
                .into_response()
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Logo fetch failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error fetching image: {}", e)).into_response()
        }
    }
}
