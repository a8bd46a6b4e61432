//! Hot, Warm and Cold tiers and the store that orchestrates them.

pub mod cold;
pub mod error;
pub mod hot;
pub mod sweeper;
pub mod tiered;
pub mod types;
pub mod warm;

#[cfg(test)]
mod hot_tests;

pub use cold::{ColdConfig, ColdTier, SqlColdTier};
#[cfg(any(test, feature = "mock"))]
pub use cold::MockColdTier;
pub use error::{StoreError, StoreResult, TierError, TierFailure, TierResult};
pub use hot::{HotEntry, HotTier};
pub use sweeper::Sweeper;
pub use tiered::{StoreHandle, StoreValue, TieredStore, TieredStoreBuilder};
pub use types::{MemoryEntry, MemoryStats, StoreStats, Tier, TieredLookupResult, TypeStats};
#[cfg(any(test, feature = "mock"))]
pub use warm::MockWarmTier;
pub use warm::{RedisWarmTier, WarmTier};
