//! Warm tier: distributed cache adapter.
//!
//! The store reaches the Warm tier only through [`WarmTier`], so a Redis deployment, a test mock
//! or any other TTL-capable key-value service can sit behind it.

#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod redis_backend;


use async_trait::async_trait;

use super::error::TierResult;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockWarmTier;
pub use redis_backend::RedisWarmTier;

/// Raw byte operations required from a distributed cache.
#[async_trait]
pub trait WarmTier: Send + Sync {
    /// Fetches the raw payload for `key`.
    async fn get(&self, key: &str) -> TierResult<Option<Vec<u8>>>;
    /// Stores `raw` under `key` for `ttl_secs` seconds.
    async fn set_with_ttl(&self, key: &str, raw: &[u8], ttl_secs: u64) -> TierResult<()>;
    /// Removes `key`.
    async fn delete(&self, key: &str) -> TierResult<()>;
    /// Presence probe.
    async fn ping(&self) -> TierResult<()>;
    /// Releases the connection. Called only by the owner of the tier.
    async fn close(&self) {}
}
