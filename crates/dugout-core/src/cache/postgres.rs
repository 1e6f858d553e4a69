//! Postgres persistence, keyed the same way as the JSON layout.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::Row;
use tracing::info;

use super::backend::CacheBackend;
use crate::error::Result;
use crate::models::{RankingRow, RankingSnapshot, RuntimeIndex, RuntimeRecord, ScheduleEntry, ScheduleIndex};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS ranking_snapshot (
        id SMALLINT PRIMARY KEY CHECK (id = 1),
        updated_at TIMESTAMPTZ,
        rankings JSONB NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS runtime_cache (
        key TEXT PRIMARY KEY,
        runtime_min INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS schedule_index (
        game_date TEXT PRIMARY KEY,
        games JSONB NOT NULL
    )
    "#,
];

pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    /// Connect and create the cache tables if they do not exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(5).connect(database_url).await?;
        let backend = Self::new(pool);
        backend.migrate().await?;
        Ok(backend)
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Cache tables ready");
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for PostgresBackend {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn load_snapshot(&self) -> Result<Option<RankingSnapshot>> {
        let row = sqlx::query("SELECT updated_at, rankings FROM ranking_snapshot WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| {
            let Json(rankings): Json<Vec<RankingRow>> = row.get("rankings");
            RankingSnapshot {
                updated_at: row.get("updated_at"),
                rankings,
            }
        }))
    }

    async fn save_snapshot(&self, snapshot: &RankingSnapshot) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ranking_snapshot (id, updated_at, rankings)
            VALUES (1, $1, $2)
            ON CONFLICT (id) DO UPDATE
            SET updated_at = EXCLUDED.updated_at, rankings = EXCLUDED.rankings
            "#,
        )
        .bind(snapshot.updated_at)
        .bind(Json(&snapshot.rankings))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn load_runtimes(&self) -> Result<RuntimeIndex> {
        let rows = sqlx::query("SELECT key, runtime_min FROM runtime_cache")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let minutes: i32 = row.get("runtime_min");
                let record = RuntimeRecord {
                    runtime_minutes: u32::try_from(minutes).ok()?,
                };
                let key: String = row.get("key");
                Some((key, record))
            })
            .collect())
    }

    async fn save_runtime(&self, _all: &RuntimeIndex, key: &str, record: RuntimeRecord) -> Result<()> {
        // Write-once: an existing key keeps its first value
        sqlx::query("INSERT INTO runtime_cache (key, runtime_min) VALUES ($1, $2) ON CONFLICT (key) DO NOTHING")
            .bind(key)
            .bind(i32::try_from(record.runtime_minutes).unwrap_or(i32::MAX))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn load_schedules(&self) -> Result<ScheduleIndex> {
        let rows = sqlx::query("SELECT game_date, games FROM schedule_index")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let date: String = row.get("game_date");
                let Json(games): Json<Vec<ScheduleEntry>> = row.get("games");
                (date, games)
            })
            .collect())
    }

    async fn save_schedule(&self, _all: &ScheduleIndex, date: &str, games: &[ScheduleEntry]) -> Result<()> {
        sqlx::query("INSERT INTO schedule_index (game_date, games) VALUES ($1, $2) ON CONFLICT (game_date) DO NOTHING")
            .bind(date)
            .bind(Json(games))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_history(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM runtime_cache").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM schedule_index").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn raw_snapshot(&self) -> Result<Option<String>> {
        match self.load_snapshot().await? {
            Some(snapshot) => Ok(Some(serde_json::to_string_pretty(&snapshot)?)),
            None => Ok(None),
        }
    }
}
