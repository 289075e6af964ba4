use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::feed::RawFeed;

/// A cached feed plus the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheRecord {
    pub feed: RawFeed,
    pub fetched_at: i64,
}

/// Disk-backed feed cache keyed by URL.
///
/// Parsed feeds are stored as JSON payloads in a single SQLite table, so a
/// record survives process restarts and concurrent fetches share it through
/// the connection pool.
#[derive(Clone)]
pub struct CacheStore {
    pub(crate) pool: SqlitePool,
}

impl CacheStore {
    /// Opens the store at `path` (":memory:" works for tests) and creates
    /// the schema if missing.
    pub async fn open(path: &str) -> Result<Self> {
        let url = format!("sqlite:{}?mode=rwc", path);

        // busy_timeout=5000: SQLite waits up to 5 seconds for locks to
        // release instead of failing with SQLITE_BUSY when several
        // processes share the cache file.
        let options = SqliteConnectOptions::from_str(&url)?.pragma("busy_timeout", "5000");

        // SQLite is single-writer; a handful of connections covers the
        // concurrent readers one fetch round produces.
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS feed_cache (
                url TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                fetched_at INTEGER NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Stores (or replaces) the cached copy of `url`.
    pub async fn put(&self, url: &str, feed: &RawFeed, fetched_at: i64) -> Result<()> {
        let payload = serde_json::to_string(feed)?;

        sqlx::query("INSERT OR REPLACE INTO feed_cache (url, payload, fetched_at) VALUES (?, ?, ?)")
            .bind(url)
            .bind(&payload)
            .bind(fetched_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Loads the cached copy of `url`, if any.
    pub async fn get(&self, url: &str) -> Result<Option<CacheRecord>> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT payload, fetched_at FROM feed_cache WHERE url = ?")
                .bind(url)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((payload, fetched_at)) => {
                let feed: RawFeed = serde_json::from_str(&payload)?;
                Ok(Some(CacheRecord { feed, fetched_at }))
            }
            None => Ok(None),
        }
    }

    /// Number of cached feeds, for diagnostics.
    pub async fn entry_count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM feed_cache")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
