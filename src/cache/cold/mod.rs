//! Cold tier: persistent key-value table adapter.
//!
//! Rows carry an explicit `expires_at`, so even the durable tier forgets entries once their TTL
//! lapses. Reads filter on it; [`ColdTier::purge_expired`] reclaims the rows.

#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod sql;


use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::TierResult;
use crate::config::StoreConfig;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockColdTier;
pub use sql::SqlColdTier;

/// Operations required from a persistent key-value table.
#[async_trait]
pub trait ColdTier: Send + Sync {
    /// Fetches the serialized value for `key` if its row has not expired at `now`.
    async fn get(&self, key: &str, now: DateTime<Utc>) -> TierResult<Option<String>>;
    /// Inserts or refreshes the row for `key`.
    async fn upsert(&self, key: &str, raw: &str, expires_at: DateTime<Utc>) -> TierResult<()>;
    /// Removes the row for `key`.
    async fn delete(&self, key: &str) -> TierResult<()>;
    /// Liveness probe.
    async fn ping(&self) -> TierResult<()>;
    /// Creates the backing table when missing.
    async fn ensure_schema(&self) -> TierResult<()>;
    /// Deletes rows expired at `now`. Returns the number removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> TierResult<u64>;
    /// Releases the connection pool. Called only by the owner of the tier.
    async fn close(&self) {}
}

/// Settings for a Cold tier the store opens (and therefore owns) itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColdConfig {
    pub url: String,
    pub max_connections: u32,
    pub table_name: String,
    pub acquire_timeout: Duration,
}

impl ColdConfig {
    /// Settings for `url` with the store defaults for pool size, table name and acquire timeout.
    pub fn new(url: impl Into<String>) -> Self {
        let defaults = StoreConfig::default();
        Self {
            url: url.into(),
            max_connections: defaults.db_max_connections,
            table_name: defaults.table_name,
            acquire_timeout: defaults.tier_timeout,
        }
    }

    /// Builds the Cold settings from a store config, if a database URL is configured.
    pub fn from_store_config(config: &StoreConfig) -> Option<Self> {
        config.database_url.as_ref().map(|url| Self {
            url: url.clone(),
            max_connections: config.db_max_connections,
            table_name: config.table_name.clone(),
            acquire_timeout: config.tier_timeout,
        })
    }
}
