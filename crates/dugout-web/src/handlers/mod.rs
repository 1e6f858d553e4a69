//! HTTP handlers, grouped by page.

pub mod hour;
pub mod proxy;
pub mod ranking;
pub mod recent;

/// GET /ping
pub async fn ping() -> &'static str {
    "pong"
}
