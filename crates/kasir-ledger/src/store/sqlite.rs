//! # SQLite Store
//!
//! Durable [`KeyValueStore`] on a single SQLite table.
//!
//! ## Schema
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  kv_entries                                                         │
//! │  ───────────────────────────────────────────────────────────────    │
//! │  key         TEXT PRIMARY KEY     "pos.transactions", ...           │
//! │  value       TEXT NOT NULL        JSON document                     │
//! │  updated_at  TEXT NOT NULL        RFC 3339 timestamp                │
//! │                                                                     │
//! │  One row per storage key; set_raw is an UPSERT, so every write is   │
//! │  a single atomic statement from SQLite's point of view.             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! Write-Ahead Logging is enabled so a reporting read (statistics screen)
//! never blocks a checkout write and vice versa.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info, warn};

use super::{KeyValueStore, StoreResult};

// =============================================================================
// Configuration
// =============================================================================

/// SQLite store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/var/lib/kasir/pos.db").max_connections(2);
/// let store = SqliteStore::open(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum pool connections. Default: 2; one writer, one reader is
    /// plenty for a single terminal.
    pub max_connections: u32,

    /// Minimum connections kept alive. Default: 1.
    pub min_connections: u32,

    /// Connection acquire timeout. Default: 30 seconds.
    pub connect_timeout: Duration,
}

impl StoreConfig {
    /// Creates a configuration for the given database path. The file is
    /// created on first open if it does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 2,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the maximum number of pool connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of pool connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// In-memory database configuration (for tests).
    ///
    /// A single connection is required: each SQLite `:memory:` connection
    /// is its own database.
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

// =============================================================================
// SQLite Store
// =============================================================================

/// Durable key/value store backed by SQLite.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database and ensures the schema.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Enables WAL journaling and NORMAL synchronous mode
    /// 3. Creates the connection pool
    /// 4. Creates the `kv_entries` table if absent
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening key/value store"
        );

        let connect_options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            // WAL: readers don't block writers and vice versa
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL: safe from corruption, may lose the last write on
            // power failure. Acceptable for a single retail terminal
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await?;

        let store = SqliteStore { pool };
        store.ensure_schema().await?;

        info!(
            max_connections = config.max_connections,
            "Key/value store ready"
        );
        Ok(store)
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Checks if the store can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the connection pool. Operations fail afterwards.
    pub async fn close(&self) {
        info!("Closing key/value store");
        self.pool.close().await;
    }

    /// The underlying pool, for maintenance queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl KeyValueStore for SqliteStore {
    async fn get_raw(&self, key: &str) -> StoreResult<Option<Value>> {
        let row = sqlx::query("SELECT value FROM kv_entries WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let text: String = row.try_get("value")?;
                match serde_json::from_str(&text) {
                    Ok(value) => Ok(Some(value)),
                    // Contract: unreadable stored JSON reads as absent
                    Err(err) => {
                        warn!(key, %err, "Stored row is not valid JSON; treating as absent");
                        Ok(None)
                    }
                }
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: Value) -> StoreResult<()> {
        debug!(key, "Writing store value");
        let text = serde_json::to_string(&value)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(text)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM kv_entries WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
