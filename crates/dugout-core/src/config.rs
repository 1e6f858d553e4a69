//! Service configuration.
//!
//! Everything is read from environment variables (the binary loads a `.env`
//! file first, if there is one). Unset or empty variables take their
//! defaults; values that are set but malformed are rejected at startup.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;

use crate::browser::BrowserConfig;
use crate::cache::{CachePaths, DEFAULT_RECENT_TTL};
use crate::classify::Thresholds;
use crate::error::{Error, Result};
use crate::history::LookbackWindow;

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_REFRESH_INTERVAL_MIN: u64 = 5;

/// Upper bound for `LOOKBACK_DAYS`, about ten seasons
pub const MAX_LOOKBACK_DAYS: u32 = 3650;

/// First day of the 2025 regular season
pub const DEFAULT_HISTORY_START: &str = "2025-03-22";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub cache_paths: CachePaths,
    /// Selects the Postgres backend when set
    pub database_url: Option<String>,
    pub refresh_interval: Duration,
    /// Read-through refresh of rankings older than this
    pub cache_ttl: Option<Duration>,
    pub lookback: LookbackWindow,
    pub thresholds: Thresholds,
    /// Required by `/refresh` when set
    pub refresh_token: Option<String>,
    pub recent_ttl: Duration,
    pub browser: BrowserConfig,
    pub log_format: LogFormat,
    /// Daily-rotated log files are written here when set
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; used by tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let ip: IpAddr = parse(&var, "BIND_ADDR")?.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port: u16 = parse(&var, "PORT")?.unwrap_or(DEFAULT_PORT);

        let defaults = CachePaths::in_dir(Path::new("."));
        let cache_paths = CachePaths {
            snapshot: var("CACHE_FILE").map(PathBuf::from).unwrap_or(defaults.snapshot),
            runtimes: var("RUNTIME_CACHE_FILE").map(PathBuf::from).unwrap_or(defaults.runtimes),
            schedules: var("SCHEDULE_CACHE_FILE").map(PathBuf::from).unwrap_or(defaults.schedules),
        };

        let interval_min: u64 = parse(&var, "CACHE_INTERVAL_MIN")?.unwrap_or(DEFAULT_REFRESH_INTERVAL_MIN);
        if interval_min == 0 {
            return Err(Error::Config("CACHE_INTERVAL_MIN must be at least 1".to_string()));
        }
        let refresh_interval = minutes(interval_min, "CACHE_INTERVAL_MIN")?;
        let cache_ttl = parse::<u64>(&var, "CACHE_TTL_MIN")?
            .map(|m| minutes(m, "CACHE_TTL_MIN"))
            .transpose()?;

        let lookback = match parse::<u32>(&var, "LOOKBACK_DAYS")? {
            Some(days) if days > MAX_LOOKBACK_DAYS => {
                return Err(Error::Config(format!(
                    "LOOKBACK_DAYS must be at most {}, got {}",
                    MAX_LOOKBACK_DAYS, days
                )));
            }
            Some(days) => LookbackWindow::Days(days),
            None => {
                let start = var("HISTORY_START_DATE").unwrap_or_else(|| DEFAULT_HISTORY_START.to_string());
                let date = NaiveDate::parse_from_str(&start, "%Y-%m-%d")
                    .map_err(|_| Error::Config(format!("HISTORY_START_DATE must be YYYY-MM-DD, got {:?}", start)))?;
                LookbackWindow::Since(date)
            }
        };

        let fallback = Thresholds::default();
        let thresholds = Thresholds::new(
            parse(&var, "THRESHOLD_FAST")?.unwrap_or(fallback.t1),
            parse(&var, "THRESHOLD_NORMAL")?.unwrap_or(fallback.t2),
            parse(&var, "THRESHOLD_LONG")?.unwrap_or(fallback.t3),
        )?;

        let recent_ttl = parse::<u64>(&var, "RECENT_TTL")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RECENT_TTL);

        let mut browser = BrowserConfig::default();
        if let Some(url) = var("WEBDRIVER_URL") {
            browser.webdriver_url = url;
        }
        browser.chrome_bin = var("CHROME_BIN");

        let log_format = match var("LOG_FORMAT") {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(f) if f.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(f) => return Err(Error::Config(format!("LOG_FORMAT must be text or json, got {:?}", f))),
            None => LogFormat::Text,
        };

        Ok(Self {
            bind_addr: SocketAddr::new(ip, port),
            cache_paths,
            database_url: var("DATABASE_URL"),
            refresh_interval,
            cache_ttl,
            lookback,
            thresholds,
            refresh_token: var("REFRESH_TOKEN"),
            recent_ttl,
            browser,
            log_format,
            log_dir: var("LOG_DIR").map(PathBuf::from),
        })
    }
}

fn minutes(value: u64, name: &str) -> Result<Duration> {
    value
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| Error::Config(format!("{} is too large: {}", name, value)))
}

fn parse<T>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
{
    var(name)
        .map(|value| {
            value
                .parse()
                .map_err(|_| Error::Config(format!("{} has an invalid value: {:?}", name, value)))
        })
        .transpose()
}
