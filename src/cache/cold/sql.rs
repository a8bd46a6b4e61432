//! SQL-backed Cold tier (SQLite through `sqlx`).
//!
//! Timestamps are stored as Unix milliseconds so expiry filtering is a plain integer comparison.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use super::{ColdConfig, ColdTier};
use crate::cache::error::{TierError, TierResult};
use crate::cache::types::Tier;
use crate::config::is_valid_identifier;

struct Queries {
    create_table: String,
    create_index: String,
    select: String,
    upsert: String,
    delete: String,
    purge: String,
}

impl Queries {
    fn for_table(table: &str) -> Self {
        Self {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL,
                    expires_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                )"
            ),
            create_index: format!(
                "CREATE INDEX IF NOT EXISTS {table}_expires_at_idx ON {table} (expires_at)"
            ),
            select: format!("SELECT value FROM {table} WHERE key = ?1 AND expires_at > ?2"),
            upsert: format!(
                "INSERT INTO {table} (key, value, expires_at, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    expires_at = excluded.expires_at,
                    updated_at = excluded.updated_at"
            ),
            delete: format!("DELETE FROM {table} WHERE key = ?1"),
            purge: format!("DELETE FROM {table} WHERE expires_at <= ?1"),
        }
    }
}

/// Cold tier over a single generic key-value table.
pub struct SqlColdTier {
    pool: SqlitePool,
    table: String,
    queries: Queries,
}

impl SqlColdTier {
    /// Opens a pool for `config.url`, creating the database file if needed.
    pub async fn connect(config: &ColdConfig) -> TierResult<Self> {
        ensure_identifier(&config.table_name)?;

        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        info!(table = %config.table_name, "Opened persistent store pool");
        Ok(Self::with_table(pool, &config.table_name))
    }

    /// Wraps an existing pool. The caller keeps ownership of the pool's lifecycle.
    pub fn from_pool(pool: SqlitePool, table: &str) -> TierResult<Self> {
        ensure_identifier(table)?;
        Ok(Self::with_table(pool, table))
    }

    fn with_table(pool: SqlitePool, table: &str) -> Self {
        Self {
            pool,
            table: table.to_string(),
            queries: Queries::for_table(table),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl ColdTier for SqlColdTier {
    async fn get(&self, key: &str, now: DateTime<Utc>) -> TierResult<Option<String>> {
        let result = sqlx::query(&self.queries.select)
            .bind(key)
            .bind(now.timestamp_millis())
            .fetch_optional(&self.pool)
            .await;

        match result {
            Ok(Some(row)) => Ok(Some(row.try_get::<String, _>("value")?)),
            Ok(None) => Ok(None),
            Err(e) if is_missing_table(&e) => {
                debug!(key = %key, table = %self.table, "Persistent table missing, treating read as miss");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn upsert(&self, key: &str, raw: &str, expires_at: DateTime<Utc>) -> TierResult<()> {
        let result = sqlx::query(&self.queries.upsert)
            .bind(key)
            .bind(raw)
            .bind(expires_at.timestamp_millis())
            .bind(Utc::now().timestamp_millis())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_missing_table(&e) => {
                debug!(key = %key, table = %self.table, "Persistent table missing, skipping write");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> TierResult<()> {
        let result = sqlx::query(&self.queries.delete)
            .bind(key)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_missing_table(&e) => {
                debug!(key = %key, table = %self.table, "Persistent table missing, skipping delete");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn ping(&self) -> TierResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> TierResult<()> {
        sqlx::query(&self.queries.create_table)
            .execute(&self.pool)
            .await?;
        sqlx::query(&self.queries.create_index)
            .execute(&self.pool)
            .await?;
        debug!(table = %self.table, "Persistent schema ready");
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> TierResult<u64> {
        let result = sqlx::query(&self.queries.purge)
            .bind(now.timestamp_millis())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.rows_affected()),
            Err(e) if is_missing_table(&e) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    async fn close(&self) {
        self.pool.close().await;
        debug!(table = %self.table, "Closed persistent store pool");
    }
}

impl std::fmt::Debug for SqlColdTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlColdTier")
            .field("table", &self.table)
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

/// `true` for SQLite's "no such table" error.
pub(crate) fn is_missing_table(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.message().contains("no such table"),
        _ => false,
    }
}

fn ensure_identifier(table: &str) -> TierResult<()> {
    if is_valid_identifier(table) {
        Ok(())
    } else {
        Err(TierError::Backend {
            tier: Tier::Cold,
            reason: format!("invalid table name '{table}'"),
        })
    }
}
