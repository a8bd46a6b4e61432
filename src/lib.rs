//! Strata library crate (used by the CLI and integration tests).
//!
//! A key-value store that routes every call through three tiers:
//!
//! - **Hot**: in-process map with per-entry expiry ([`HotTier`]), always present.
//! - **Warm**: distributed cache behind [`WarmTier`] ([`RedisWarmTier`]), optional.
//! - **Cold**: persistent table behind [`ColdTier`] ([`SqlColdTier`]), optional.
//!
//! Reads cascade Hot → Warm → Cold and promote hits upward. Writes and deletes fan out to every
//! available tier and report the tiers that failed.
//!
//! ```no_run
//! # async fn demo() -> Result<(), strata::StoreError> {
//! use strata::{StoreConfig, TieredStore};
//!
//! let store: TieredStore<serde_json::Value> = TieredStore::new(StoreConfig::from_env()?)?;
//! store.connect().await?;
//! store.set("session:42", serde_json::json!({"step": "summary"}), Some(300)).await?;
//! assert!(store.exists("session:42").await);
//! store.disconnect().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Test/Mock Support
//! [`MockWarmTier`], [`MockColdTier`] and [`TieredStore::new_mock`] are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;

pub use cache::{
    ColdConfig, ColdTier, HotEntry, HotTier, MemoryEntry, MemoryStats, RedisWarmTier,
    SqlColdTier, StoreError, StoreHandle, StoreResult, StoreStats, StoreValue, Sweeper, Tier,
    TierError, TierFailure, TierResult, TieredLookupResult, TieredStore, TieredStoreBuilder,
    TypeStats, WarmTier,
};
#[cfg(any(test, feature = "mock"))]
pub use cache::{MockColdTier, MockWarmTier};

pub use config::{ConfigError, StoreConfig};
