use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::backend::CacheBackend;
use crate::error::Result;
use crate::models::{RankingRow, RankingSnapshot, RuntimeIndex, RuntimeRecord, ScheduleEntry, ScheduleIndex};

#[derive(Debug, Default)]
struct HistoryMaps {
    runtimes: RuntimeIndex,
    schedules: ScheduleIndex,
}

/// In-memory cache mirrored to a [`CacheBackend`].
///
/// The ranking snapshot and the runtime/schedule maps sit behind separate
/// locks. Locks are held only to read or swap in-memory data; backend writes
/// happen after release, on a cloned structure, in the order the mutations
/// were made.
pub struct CacheStore {
    snapshot: Mutex<RankingSnapshot>,
    history: Mutex<HistoryMaps>,
    backend: Arc<dyn CacheBackend>,
    snapshot_writes: tokio::sync::Mutex<()>,
    runtime_writes: tokio::sync::Mutex<()>,
    schedule_writes: tokio::sync::Mutex<()>,
}

impl CacheStore {
    /// Empty store; nothing is read from the backend.
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            snapshot: Mutex::new(RankingSnapshot::default()),
            history: Mutex::new(HistoryMaps::default()),
            backend,
            snapshot_writes: tokio::sync::Mutex::new(()),
            runtime_writes: tokio::sync::Mutex::new(()),
            schedule_writes: tokio::sync::Mutex::new(()),
        }
    }

    /// Store loaded from `backend`. Unreadable documents are replaced by
    /// empty defaults.
    pub async fn open(backend: Arc<dyn CacheBackend>) -> Self {
        let store = Self::new(backend);
        store.reload_snapshot().await;

        let runtimes = store.backend.load_runtimes().await.unwrap_or_else(|e| {
            warn!(backend = store.backend.name(), error = %e, "Runtime cache unreadable, starting empty");
            RuntimeIndex::new()
        });
        let schedules = store.backend.load_schedules().await.unwrap_or_else(|e| {
            warn!(backend = store.backend.name(), error = %e, "Schedule cache unreadable, starting empty");
            ScheduleIndex::new()
        });
        info!(
            backend = store.backend.name(),
            rankings = store.snapshot().rankings.len(),
            runtimes = runtimes.len(),
            schedules = schedules.len(),
            "Cache loaded"
        );
        *store.lock_history() = HistoryMaps { runtimes, schedules };
        store
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    fn lock_snapshot(&self) -> MutexGuard<'_, RankingSnapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_history(&self) -> MutexGuard<'_, HistoryMaps> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== Ranking snapshot =====

    /// A consistent copy of the current snapshot.
    pub fn snapshot(&self) -> RankingSnapshot {
        self.lock_snapshot().clone()
    }

    /// Replace the snapshot with `rows` stamped `updated_at`, then persist it.
    /// An empty list leaves everything untouched and returns `Ok(false)`.
    ///
    /// The in-memory snapshot is replaced even when persisting fails.
    pub async fn replace_rankings(&self, rows: Vec<RankingRow>, updated_at: DateTime<Utc>) -> Result<bool> {
        if rows.is_empty() {
            return Ok(false);
        }
        let _gate = self.snapshot_writes.lock().await;
        let snapshot = RankingSnapshot::new(rows, updated_at);
        *self.lock_snapshot() = snapshot.clone();
        self.backend.save_snapshot(&snapshot).await?;
        Ok(true)
    }

    /// Re-read the snapshot from the backend, keeping the in-memory copy if
    /// the backend has nothing usable.
    pub async fn reload_snapshot(&self) -> RankingSnapshot {
        let loaded = match self.backend.load_snapshot().await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "Ranking cache unreadable, using empty default");
                None
            }
        };
        let mut current = self.lock_snapshot();
        if let Some(snapshot) = loaded.filter(|s| !s.is_empty()) {
            *current = snapshot;
        }
        current.clone()
    }

    /// The persisted snapshot document, or an empty document when nothing
    /// has been written yet.
    pub async fn raw_snapshot_json(&self) -> Result<String> {
        match self.backend.raw_snapshot().await? {
            Some(raw) => Ok(raw),
            None => Ok(serde_json::to_string_pretty(&RankingSnapshot::default())?),
        }
    }

    // ===== Runtimes =====

    pub fn runtime(&self, key: &str) -> Option<u32> {
        self.lock_history().runtimes.get(key).map(|r| r.runtime_minutes)
    }

    /// Record a runtime. Existing keys are never overwritten; returns whether
    /// the value was stored.
    pub async fn set_runtime(&self, key: &str, minutes: u32) -> Result<bool> {
        let _gate = self.runtime_writes.lock().await;
        let record = RuntimeRecord { runtime_minutes: minutes };
        let all = {
            let mut history = self.lock_history();
            if history.runtimes.contains_key(key) {
                return Ok(false);
            }
            history.runtimes.insert(key.to_string(), record);
            history.runtimes.clone()
        };
        self.backend.save_runtime(&all, key, record).await?;
        Ok(true)
    }

    // ===== Schedules =====

    pub fn schedule(&self, date: &str) -> Option<Vec<ScheduleEntry>> {
        self.lock_history().schedules.get(date).cloned()
    }

    /// Record the schedule of `date` (`YYYYMMDD`). Existing dates are never
    /// overwritten; returns whether the value was stored.
    pub async fn set_schedule(&self, date: &str, games: Vec<ScheduleEntry>) -> Result<bool> {
        let _gate = self.schedule_writes.lock().await;
        let all = {
            let mut history = self.lock_history();
            if history.schedules.contains_key(date) {
                return Ok(false);
            }
            history.schedules.insert(date.to_string(), games.clone());
            history.schedules.clone()
        };
        self.backend.save_schedule(&all, date, &games).await?;
        Ok(true)
    }

    /// Number of cached runtimes and schedule dates.
    pub fn history_len(&self) -> (usize, usize) {
        let history = self.lock_history();
        (history.runtimes.len(), history.schedules.len())
    }

    /// Drop every runtime and schedule entry, in memory and in the backend.
    pub async fn clear_history(&self) -> Result<()> {
        let _runtime_gate = self.runtime_writes.lock().await;
        let _schedule_gate = self.schedule_writes.lock().await;
        *self.lock_history() = HistoryMaps::default();
        self.backend.clear_history().await?;
        info!(backend = self.backend.name(), "Runtime and schedule caches cleared");
        Ok(())
    }
}
