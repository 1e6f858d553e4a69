use axum::http::{HeaderMap, StatusCode};

use dugout_core::Config;

/// Header accepted in place of the `token` query parameter
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// Check the refresh token when one is configured. The query parameter
/// takes precedence over the header.
pub fn ensure_refresh_authorized(
    config: &Config,
    query_token: Option<&str>,
    headers: &HeaderMap,
) -> Result<(), (StatusCode, String)> {
    let Some(expected) = config.refresh_token.as_deref() else {
        return Ok(());
    };

    let token = query_token.filter(|t| !t.is_empty()).or_else(|| {
        headers
            .get(REFRESH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    });

    if token.is_some_and(|t| t == expected) {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid refresh token".to_string()))
    }
}
