use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::{RankingSnapshot, RuntimeIndex, RuntimeRecord, ScheduleEntry, ScheduleIndex};

/// Durable storage behind the [`CacheStore`](super::CacheStore).
///
/// The store keeps everything in memory and calls the backend after each
/// mutation with both the full structure and the changed entry, so
/// whole-document backends and keyed backends can each write what they need.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` when nothing has been persisted yet.
    async fn load_snapshot(&self) -> Result<Option<RankingSnapshot>>;

    async fn save_snapshot(&self, snapshot: &RankingSnapshot) -> Result<()>;

    async fn load_runtimes(&self) -> Result<RuntimeIndex>;

    async fn save_runtime(&self, all: &RuntimeIndex, key: &str, record: RuntimeRecord) -> Result<()>;

    async fn load_schedules(&self) -> Result<ScheduleIndex>;

    async fn save_schedule(&self, all: &ScheduleIndex, date: &str, games: &[ScheduleEntry]) -> Result<()>;

    async fn clear_history(&self) -> Result<()>;

    /// The persisted snapshot document as stored, if any.
    async fn raw_snapshot(&self) -> Result<Option<String>>;
}

/// Locations of the three cache documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePaths {
    pub snapshot: PathBuf,
    pub runtimes: PathBuf,
    pub schedules: PathBuf,
}

impl CachePaths {
    /// The default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            snapshot: dir.join("cache.json"),
            runtimes: dir.join("runtime_cache.json"),
            schedules: dir.join("schedule_index.json"),
        }
    }
}

/// Pretty-printed JSON documents, replaced atomically on every write.
pub struct JsonFileBackend {
    paths: CachePaths,
}

impl JsonFileBackend {
    pub fn new(paths: CachePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &CachePaths {
        &self.paths
    }

    async fn read_optional(path: &Path) -> Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        match Self::read_optional(path).await? {
            Some(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            None => Ok(None),
        }
    }

    /// Write to `<path>.tmp`, then rename over `path`.
    async fn save<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(value)?;
        let tmp = tmp_path(path);
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, path).await?;
        set_readable(path).await;
        debug!(path = %path.display(), "Cache file written");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(unix)]
async fn set_readable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644)).await {
        debug!(path = %path.display(), error = %e, "Could not set cache file permissions");
    }
}

#[cfg(not(unix))]
async fn set_readable(_path: &Path) {}

#[async_trait]
impl CacheBackend for JsonFileBackend {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn load_snapshot(&self) -> Result<Option<RankingSnapshot>> {
        Self::load(&self.paths.snapshot).await
    }

    async fn save_snapshot(&self, snapshot: &RankingSnapshot) -> Result<()> {
        Self::save(&self.paths.snapshot, snapshot).await
    }

    async fn load_runtimes(&self) -> Result<RuntimeIndex> {
        Ok(Self::load(&self.paths.runtimes).await?.unwrap_or_default())
    }

    async fn save_runtime(&self, all: &RuntimeIndex, _key: &str, _record: RuntimeRecord) -> Result<()> {
        Self::save(&self.paths.runtimes, all).await
    }

    async fn load_schedules(&self) -> Result<ScheduleIndex> {
        Ok(Self::load(&self.paths.schedules).await?.unwrap_or_default())
    }

    async fn save_schedule(&self, all: &ScheduleIndex, _date: &str, _games: &[ScheduleEntry]) -> Result<()> {
        Self::save(&self.paths.schedules, all).await
    }

    async fn clear_history(&self) -> Result<()> {
        Self::save(&self.paths.runtimes, &RuntimeIndex::new()).await?;
        Self::save(&self.paths.schedules, &ScheduleIndex::new()).await
    }

    async fn raw_snapshot(&self) -> Result<Option<String>> {
        Self::read_optional(&self.paths.snapshot).await
    }
}

#[cfg(test)]
pub mod testing {
    //! Backend keeping documents in memory, for tests that must not touch
    //! the filesystem.

    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryBackend {
        snapshot: Mutex<Option<RankingSnapshot>>,
        runtimes: Mutex<RuntimeIndex>,
        schedules: Mutex<ScheduleIndex>,
    }

    #[async_trait]
    impl CacheBackend for MemoryBackend {
        fn name(&self) -> &'static str {
            "memory"
        }

        async fn load_snapshot(&self) -> Result<Option<RankingSnapshot>> {
            Ok(self.snapshot.lock().unwrap().clone())
        }

        async fn save_snapshot(&self, snapshot: &RankingSnapshot) -> Result<()> {
            *self.snapshot.lock().unwrap() = Some(snapshot.clone());
            Ok(())
        }

        async fn load_runtimes(&self) -> Result<RuntimeIndex> {
            Ok(self.runtimes.lock().unwrap().clone())
        }

        async fn save_runtime(&self, all: &RuntimeIndex, _key: &str, _record: RuntimeRecord) -> Result<()> {
            *self.runtimes.lock().unwrap() = all.clone();
            Ok(())
        }

        async fn load_schedules(&self) -> Result<ScheduleIndex> {
            Ok(self.schedules.lock().unwrap().clone())
        }

        async fn save_schedule(&self, all: &ScheduleIndex, _date: &str, _games: &[ScheduleEntry]) -> Result<()> {
            *self.schedules.lock().unwrap() = all.clone();
            Ok(())
        }

        async fn clear_history(&self) -> Result<()> {
            self.runtimes.lock().unwrap().clear();
            self.schedules.lock().unwrap().clear();
            Ok(())
        }

        async fn raw_snapshot(&self) -> Result<Option<String>> {
            let snapshot = self.snapshot.lock().unwrap().clone();
            Ok(snapshot.map(|s| serde_json::to_string_pretty(&s)).transpose()?)
        }
    }
}
