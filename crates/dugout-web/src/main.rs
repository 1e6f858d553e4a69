//! dugout - KBO team rankings, average game duration and recent results.
//!
//! Scrapes through a chromedriver-controlled headless Chrome, caches what it
//! finds and serves it over HTTP.

mod auth;
mod handlers;
mod render;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dugout_core::browser::WebDriver;
use dugout_core::cache::{CacheBackend, CacheStore, JsonFileBackend};
use dugout_core::config::{Config, LogFormat};
use dugout_core::Scraper;

use state::AppState;

/// Initialize the tracing subscriber. Console output always; a daily log
/// file as well when `LOG_DIR` is set. The returned guard flushes the file
/// writer and must live as long as the process.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(dir, "dugout.log");
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(true);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Warning: could not create log directory {} ({}), file logging disabled", dir.display(), e);
                (None, None)
            }
        },
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    match config.log_format {
        LogFormat::Json => registry.with(fmt::layer().json().with_current_span(false)).init(),
        LogFormat::Text => registry.with(fmt::layer().with_target(true)).init(),
    }
    guard
}

async fn build_store(config: &Config) -> Result<Arc<CacheStore>> {
    let backend: Arc<dyn CacheBackend> = match &config.database_url {
        #[cfg(feature = "postgres")]
        Some(url) => Arc::new(
            dugout_core::cache::PostgresBackend::connect(url)
                .await
                .context("Failed to connect to DATABASE_URL")?,
        ),
        #[cfg(not(feature = "postgres"))]
        Some(_) => {
            warn!("DATABASE_URL is set but this build has no postgres support, using JSON files");
            Arc::new(JsonFileBackend::new(config.cache_paths.clone()))
        }
        None => Arc::new(JsonFileBackend::new(config.cache_paths.clone())),
    };
    Ok(Arc::new(CacheStore::open(backend).await))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("Invalid configuration")?;
    let _log_guard = init_tracing(&config);
    info!(version = env!("CARGO_PKG_VERSION"), "dugout starting");

    let store = build_store(&config).await?;
    info!(backend = store.backend_name(), "Cache store ready");

    let browser = WebDriver::new(config.browser.clone()).context("Failed to create WebDriver client")?;
    let scraper = Scraper::new(Arc::new(browser));

    let bind_addr = config.bind_addr;
    let refresh_interval = config.refresh_interval;
    let state = AppState::new(config, store, scraper)?;
    let scheduler = state.refresher.clone().spawn_periodic(refresh_interval);

    let router = routes::create_router(state);
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("Listening on {}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.abort();
    info!("dugout shutting down");
    Ok(())
}
