//! Caching of scraped data.
//!
//! - [`CacheStore`]: ranking snapshot plus append-only runtime and schedule
//!   maps, held in memory and mirrored to a [`CacheBackend`]
//! - [`JsonFileBackend`]: three JSON documents, replaced atomically
//! - `PostgresBackend` (feature `postgres`): the same layout in tables
//! - [`RecentResultsCache`]: short-lived cache of recent results

pub mod backend;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod recent;
pub mod store;

pub use backend::{CacheBackend, CachePaths, JsonFileBackend};
#[cfg(feature = "postgres")]
pub use postgres::PostgresBackend;
pub use recent::{RecentResultsCache, DEFAULT_RECENT_TTL};
pub use store::CacheStore;
