//! Tiered store: Hot (in-process) + Warm (distributed) + Cold (persistent).
//!
//! Reads cascade Hot → Warm → Cold and promote hits into the faster tiers. Writes and deletes fan
//! out to every available tier. The two paths handle tier failures differently:
//! reads log and fall through to the next tier, never failing; writes and deletes attempt every
//! tier, log each failure, and then report all of them to the caller.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::sqlite::SqlitePool;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::cold::{ColdConfig, ColdTier, SqlColdTier};
use super::error::{StoreError, StoreResult, TierError, TierFailure, TierResult};
use super::hot::HotTier;
use super::sweeper::Sweeper;
use super::types::{MemoryEntry, MemoryStats, StoreStats, Tier, TieredLookupResult};
use super::warm::{RedisWarmTier, WarmTier};
use crate::config::StoreConfig;

#[cfg(any(test, feature = "mock"))]
use super::cold::MockColdTier;
#[cfg(any(test, feature = "mock"))]
use super::warm::MockWarmTier;

/// Values the store can hold: native in the Hot tier, JSON in the Warm and Cold tiers.
pub trait StoreValue: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> StoreValue for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

enum WarmSource {
    Url(String),
    Handle(Arc<dyn WarmTier>),
}

enum ColdSource {
    Config(ColdConfig),
    Handle(Arc<dyn ColdTier>),
}

/// A connected tier and whether the store is responsible for closing it.
struct Attached<T: ?Sized> {
    tier: Arc<T>,
    owned: bool,
}

#[derive(Default)]
struct Counters {
    hot_hits: AtomicU64,
    warm_hits: AtomicU64,
    cold_hits: AtomicU64,
    misses: AtomicU64,
    tier_errors: AtomicU64,
}

impl Counters {
    #[inline]
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Builder for [`TieredStore`]. Handles given here are used as-is and never closed by the store.
pub struct TieredStoreBuilder<V> {
    config: StoreConfig,
    warm: Option<Arc<dyn WarmTier>>,
    cold: Option<Arc<dyn ColdTier>>,
    cold_pool: Option<SqlitePool>,
    _value: std::marker::PhantomData<fn() -> V>,
}

impl<V: StoreValue> TieredStoreBuilder<V> {
    /// Uses an existing Warm tier instead of connecting to `config.redis_url`.
    pub fn warm_tier(mut self, tier: Arc<dyn WarmTier>) -> Self {
        self.warm = Some(tier);
        self
    }

    /// Uses an existing Cold tier instead of opening `config.database_url`.
    pub fn cold_tier(mut self, tier: Arc<dyn ColdTier>) -> Self {
        self.cold = Some(tier);
        self.cold_pool = None;
        self
    }

    /// Uses an existing SQLite pool (with `config.table_name`) as the Cold tier.
    pub fn cold_pool(mut self, pool: SqlitePool) -> Self {
        self.cold_pool = Some(pool);
        self.cold = None;
        self
    }

    /// Validates the config and assembles the store. Nothing is connected yet.
    pub fn build(self) -> StoreResult<TieredStore<V>> {
        self.config.validate()?;

        let warm_source = match (self.warm, &self.config.redis_url) {
            (Some(tier), _) => Some(WarmSource::Handle(tier)),
            (None, Some(url)) => Some(WarmSource::Url(url.clone())),
            (None, None) => None,
        };

        let cold_source = match (self.cold, self.cold_pool) {
            (Some(tier), _) => Some(ColdSource::Handle(tier)),
            (None, Some(pool)) => {
                let tier: Arc<dyn ColdTier> = Arc::new(
                    SqlColdTier::from_pool(pool, &self.config.table_name)
                        .map_err(|source| StoreError::ColdConnect { source })?,
                );
                Some(ColdSource::Handle(tier))
            }
            (None, None) => ColdConfig::from_store_config(&self.config).map(ColdSource::Config),
        };

        Ok(TieredStore {
            hot: Arc::new(HotTier::with_ttl(self.config.hot_ttl)),
            sweeper: Sweeper::new(self.config.sweep_interval),
            config: self.config,
            warm_source,
            cold_source,
            warm: RwLock::new(None),
            cold: RwLock::new(None),
            connected: AtomicBool::new(false),
            lifecycle: tokio::sync::Mutex::new(()),
            counters: Counters::default(),
            longest_ttl_secs: AtomicU64::new(0),
        })
    }
}

/// Key-value store that routes every call through the Hot, Warm and Cold tiers.
///
/// Operations work before [`connect`](Self::connect) (and after
/// [`disconnect`](Self::disconnect)) using the Hot tier alone.
pub struct TieredStore<V> {
    config: StoreConfig,
    hot: Arc<HotTier<V>>,
    warm_source: Option<WarmSource>,
    cold_source: Option<ColdSource>,
    warm: RwLock<Option<Attached<dyn WarmTier>>>,
    cold: RwLock<Option<Attached<dyn ColdTier>>>,
    sweeper: Sweeper,
    connected: AtomicBool,
    lifecycle: tokio::sync::Mutex<()>,
    counters: Counters,
    /// Largest TTL passed to the outer tiers, in seconds.
    longest_ttl_secs: AtomicU64,
}

impl<V: StoreValue> TieredStore<V> {
    /// Starts a builder; outer tiers default to the URLs in `config`.
    pub fn builder(config: StoreConfig) -> TieredStoreBuilder<V> {
        TieredStoreBuilder {
            config,
            warm: None,
            cold: None,
            cold_pool: None,
            _value: std::marker::PhantomData,
        }
    }

    /// Builds a store whose outer tiers come from `config` URLs.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        Self::builder(config).build()
    }

    /// Validated configuration the store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Direct access to the Hot tier, bypassing the cascade.
    pub fn hot(&self) -> &HotTier<V> {
        &self.hot
    }

    /// `true` between a successful [`connect`](Self::connect) and the next
    /// [`disconnect`](Self::disconnect).
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// `true` if a Warm tier is attached for this session.
    pub fn warm_available(&self) -> bool {
        self.warm.read().is_some()
    }

    /// `true` if a Cold tier is attached for this session.
    pub fn cold_available(&self) -> bool {
        self.cold.read().is_some()
    }

    /// `true` while the background sweep task is active.
    pub fn is_sweeper_running(&self) -> bool {
        self.sweeper.is_running()
    }

    /// Attaches the outer tiers and starts the sweeper.
    ///
    /// A Warm tier that cannot be reached is logged and skipped for this session. A configured
    /// Cold tier that cannot be opened or fails its probe aborts the connect. Calling `connect`
    /// on a connected store is a no-op.
    #[instrument(skip(self))]
    pub async fn connect(&self) -> StoreResult<()> {
        let _lifecycle = self.lifecycle.lock().await;
        if self.is_connected() {
            debug!("Tiered store already connected");
            return Ok(());
        }

        let warm = self.attach_warm().await;

        let cold = match self.attach_cold().await {
            Ok(cold) => cold,
            Err(e) => {
                if let Some(warm) = warm.filter(|w| w.owned) {
                    warm.tier.close().await;
                }
                return Err(e);
            }
        };

        let warm_available = warm.is_some();
        let cold_available = cold.is_some();
        *self.warm.write() = warm;
        *self.cold.write() = cold;

        self.sweeper.start(Arc::clone(&self.hot));
        self.connected.store(true, Ordering::Release);

        info!(
            warm = warm_available,
            cold = cold_available,
            sweep_interval = ?self.sweeper.interval(),
            "Tiered store connected"
        );
        Ok(())
    }

    async fn attach_warm(&self) -> Option<Attached<dyn WarmTier>> {
        match self.warm_source.as_ref()? {
            WarmSource::Url(url) => match RedisWarmTier::connect(url, self.config.tier_timeout).await
            {
                Ok(tier) => {
                    let tier: Arc<dyn WarmTier> = Arc::new(tier);
                    Some(Attached { tier, owned: true })
                }
                Err(e) => {
                    warn!(error = %e, "Distributed cache unavailable, continuing without it");
                    None
                }
            },
            WarmSource::Handle(tier) => match self.bounded(Tier::Warm, tier.ping()).await {
                Ok(()) => Some(Attached {
                    tier: Arc::clone(tier),
                    owned: false,
                }),
                Err(e) => {
                    warn!(error = %e, "Distributed cache probe failed, continuing without it");
                    None
                }
            },
        }
    }

    async fn attach_cold(&self) -> StoreResult<Option<Attached<dyn ColdTier>>> {
        let Some(source) = self.cold_source.as_ref() else {
            debug!("No persistent store configured");
            return Ok(None);
        };

        let attached: Attached<dyn ColdTier> = match source {
            ColdSource::Config(config) => {
                let tier: Arc<dyn ColdTier> = Arc::new(
                    SqlColdTier::connect(config)
                        .await
                        .map_err(|source| StoreError::ColdConnect { source })?,
                );
                Attached { tier, owned: true }
            }
            ColdSource::Handle(tier) => Attached {
                tier: Arc::clone(tier),
                owned: false,
            },
        };

        if let Err(source) = self.prepare_cold(attached.tier.as_ref()).await {
            if attached.owned {
                attached.tier.close().await;
            }
            return Err(StoreError::ColdConnect { source });
        }

        Ok(Some(attached))
    }

    async fn prepare_cold(&self, tier: &dyn ColdTier) -> TierResult<()> {
        self.bounded(Tier::Cold, tier.ping()).await?;
        if self.config.auto_migrate {
            self.bounded(Tier::Cold, tier.ensure_schema()).await?;
        }
        Ok(())
    }

    /// Stops the sweeper and releases the outer tiers the store opened itself. Idempotent.
    #[instrument(skip(self))]
    pub async fn disconnect(&self) {
        let _lifecycle = self.lifecycle.lock().await;

        self.sweeper.stop();
        let warm = self.warm.write().take();
        let cold = self.cold.write().take();

        if let Some(warm) = warm.filter(|w| w.owned) {
            warm.tier.close().await;
        }
        if let Some(cold) = cold.filter(|c| c.owned) {
            cold.tier.close().await;
        }

        if self.connected.swap(false, Ordering::AcqRel) {
            info!("Tiered store disconnected");
        }
    }

    fn warm_tier(&self) -> Option<Arc<dyn WarmTier>> {
        self.warm.read().as_ref().map(|a| Arc::clone(&a.tier))
    }

    fn cold_tier(&self) -> Option<Arc<dyn ColdTier>> {
        self.cold.read().as_ref().map(|a| Arc::clone(&a.tier))
    }

    async fn bounded<T>(
        &self,
        tier: Tier,
        call: impl Future<Output = TierResult<T>>,
    ) -> TierResult<T> {
        let after = self.config.tier_timeout;
        match tokio::time::timeout(after, call).await {
            Ok(result) => result,
            Err(_) => Err(TierError::Timeout { tier, after }),
        }
    }

    /// Returns the value for `key` from the fastest tier holding it. Never fails.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.lookup(key).await.into_value()
    }

    /// Like [`get`](Self::get), but a Cold hit is promoted to the Warm tier for `ttl_secs`
    /// instead of the Warm default.
    pub async fn get_with_promotion_ttl(&self, key: &str, ttl_secs: u64) -> Option<V> {
        self.cascade(key, Some(ttl_secs)).await.into_value()
    }

    /// Cascading read that reports which tier answered.
    pub async fn lookup(&self, key: &str) -> TieredLookupResult<V> {
        self.cascade(key, None).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn cascade(&self, key: &str, promotion_ttl_secs: Option<u64>) -> TieredLookupResult<V> {
        if let Some(value) = self.hot.get(key) {
            Counters::bump(&self.counters.hot_hits);
            debug!("Hot tier hit");
            return TieredLookupResult::HitHot(value);
        }

        if self.hot.is_tombstoned(key) {
            Counters::bump(&self.counters.misses);
            debug!("Key deleted with stale outer copies, skipping cascade");
            return TieredLookupResult::Miss;
        }

        let generation = self.hot.generation();

        if let Some(warm) = self.warm_tier() {
            match self.bounded(Tier::Warm, warm.get(key)).await {
                Ok(Some(raw)) => match serde_json::from_slice::<V>(&raw) {
                    Ok(value) => {
                        if self.hot.set_if_unchanged(key, value.clone(), generation) {
                            debug!("Warm tier hit, promoted to hot");
                        } else {
                            debug!("Warm tier hit, key changed during read, not promoted");
                        }
                        Counters::bump(&self.counters.warm_hits);
                        return TieredLookupResult::HitWarm(value);
                    }
                    Err(e) => {
                        Counters::bump(&self.counters.tier_errors);
                        warn!(tier = %Tier::Warm, error = %e, "Undecodable payload, treating as miss");
                    }
                },
                Ok(None) => debug!("Warm tier miss"),
                Err(e) => {
                    Counters::bump(&self.counters.tier_errors);
                    warn!(tier = %Tier::Warm, error = %e, "Read failed, treating as miss");
                }
            }
        }

        if let Some(cold) = self.cold_tier() {
            match self.bounded(Tier::Cold, cold.get(key, Utc::now())).await {
                Ok(Some(raw)) => match serde_json::from_str::<V>(&raw) {
                    Ok(value) => {
                        self.promote_from_cold(key, &raw, &value, generation, promotion_ttl_secs)
                            .await;
                        Counters::bump(&self.counters.cold_hits);
                        return TieredLookupResult::HitCold(value);
                    }
                    Err(e) => {
                        Counters::bump(&self.counters.tier_errors);
                        warn!(tier = %Tier::Cold, error = %e, "Undecodable payload, treating as miss");
                    }
                },
                Ok(None) => debug!("Cold tier miss"),
                Err(e) => {
                    Counters::bump(&self.counters.tier_errors);
                    warn!(tier = %Tier::Cold, error = %e, "Read failed, treating as miss");
                }
            }
        }

        Counters::bump(&self.counters.misses);
        TieredLookupResult::Miss
    }

    /// Copies a Cold hit into Warm and Hot, unless `key` is written or deleted meanwhile.
    ///
    /// A Warm copy that lands after a concurrent write or delete is removed again; the concurrent
    /// operation's own Warm call started after the generation moved, so it wins either way.
    async fn promote_from_cold(
        &self,
        key: &str,
        raw: &str,
        value: &V,
        generation: u64,
        ttl_secs: Option<u64>,
    ) {
        if !self.hot.is_unchanged(key, generation) {
            debug!("Cold tier hit, key changed during read, not promoted");
            return;
        }

        let warm = self.warm_tier();
        let mut promoted_warm = false;
        if let Some(warm) = &warm {
            let ttl = ttl_secs
                .filter(|t| *t > 0)
                .unwrap_or_else(|| self.config.warm_ttl_secs());
            match self
                .bounded(Tier::Warm, warm.set_with_ttl(key, raw.as_bytes(), ttl))
                .await
            {
                Ok(()) => promoted_warm = true,
                Err(e) => {
                    Counters::bump(&self.counters.tier_errors);
                    warn!(key = %key, tier = %Tier::Warm, error = %e, "Promotion failed");
                }
            }
        }

        if self.hot.set_if_unchanged(key, value.clone(), generation) {
            debug!("Cold tier hit, promoted to warm and hot");
            return;
        }

        debug!("Key changed during promotion, withdrawing warm copy");
        if let Some(warm) = warm.filter(|_| promoted_warm) {
            if let Err(e) = self.bounded(Tier::Warm, warm.delete(key)).await {
                Counters::bump(&self.counters.tier_errors);
                warn!(key = %key, tier = %Tier::Warm, error = %e, "Promotion rollback failed");
            }
        }
    }

    /// Writes `value` to every available tier.
    ///
    /// The Hot entry lives for the Hot default, shortened to `ttl_secs` when that is smaller.
    /// The Warm entry and the Cold row live for `ttl_secs`, or the Warm default when `None`.
    /// Every tier is attempted; any failure is returned after the others have been written.
    #[instrument(skip(self, value))]
    pub async fn set(&self, key: &str, value: V, ttl_secs: Option<u64>) -> StoreResult<()> {
        if ttl_secs == Some(0) {
            return Err(StoreError::InvalidTtl {
                key: key.to_string(),
            });
        }

        let warm = self.warm_tier();
        let cold = self.cold_tier();
        let raw = if warm.is_some() || cold.is_some() {
            Some(
                serde_json::to_string(&value).map_err(|source| StoreError::Serialization {
                    key: key.to_string(),
                    source,
                })?,
            )
        } else {
            None
        };

        let hot_ttl = match ttl_secs {
            Some(secs) => Duration::from_secs(secs).min(self.hot.default_ttl()),
            None => self.hot.default_ttl(),
        };
        self.hot.set_with_ttl(key, value, hot_ttl);

        let Some(raw) = raw else {
            debug!("Stored in hot tier only");
            return Ok(());
        };

        let ttl = ttl_secs.unwrap_or_else(|| self.config.warm_ttl_secs());
        self.longest_ttl_secs.fetch_max(ttl, Ordering::Relaxed);
        let warm_write = async {
            match &warm {
                Some(tier) => Some(
                    self.bounded(Tier::Warm, tier.set_with_ttl(key, raw.as_bytes(), ttl))
                        .await,
                ),
                None => None,
            }
        };
        let cold_write = async {
            match &cold {
                Some(tier) => Some(
                    self.bounded(Tier::Cold, tier.upsert(key, &raw, expiry_after(ttl)))
                        .await,
                ),
                None => None,
            }
        };
        let (warm_result, cold_result) = tokio::join!(warm_write, cold_write);

        let failures = self.collect_failures(key, "Write", warm_result, cold_result);
        if failures.is_empty() {
            debug!(ttl, "Stored in all available tiers");
            Ok(())
        } else {
            Err(StoreError::WriteFailed {
                key: key.to_string(),
                failures,
            })
        }
    }

    /// Removes `key` from every tier, attempting each one regardless of earlier failures.
    ///
    /// If an outer tier could not be cleared, the key is tombstoned in the Hot tier so reads do
    /// not resurrect the stale copy. The tombstone outlives every TTL this store has written and
    /// is lifted by the next `set` or fully successful `delete` of the key.
    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> StoreResult<()> {
        self.hot.delete(key);

        let warm = self.warm_tier();
        let cold = self.cold_tier();
        let warm_delete = async {
            match &warm {
                Some(tier) => Some(self.bounded(Tier::Warm, tier.delete(key)).await),
                None => None,
            }
        };
        let cold_delete = async {
            match &cold {
                Some(tier) => Some(self.bounded(Tier::Cold, tier.delete(key)).await),
                None => None,
            }
        };
        let (warm_result, cold_result) = tokio::join!(warm_delete, cold_delete);

        let failures = self.collect_failures(key, "Delete", warm_result, cold_result);
        if failures.is_empty() {
            self.hot.clear_tombstone(key);
            debug!("Deleted from all available tiers");
            Ok(())
        } else {
            self.hot.tombstone(key, self.tombstone_ttl());
            Err(StoreError::DeleteFailed {
                key: key.to_string(),
                failures,
            })
        }
    }

    /// Long enough to cover any outer copy written by this store.
    fn tombstone_ttl(&self) -> Duration {
        let longest = Duration::from_secs(self.longest_ttl_secs.load(Ordering::Relaxed));
        self.config.warm_ttl.max(longest)
    }

    fn collect_failures(
        &self,
        key: &str,
        op: &'static str,
        warm: Option<TierResult<()>>,
        cold: Option<TierResult<()>>,
    ) -> Vec<TierFailure> {
        [(Tier::Warm, warm), (Tier::Cold, cold)]
            .into_iter()
            .filter_map(|(tier, result)| match result {
                Some(Err(error)) => {
                    Counters::bump(&self.counters.tier_errors);
                    warn!(key = %key, tier = %tier, error = %error, "{op} failed");
                    Some(TierFailure { tier, error })
                }
                _ => None,
            })
            .collect()
    }

    /// `true` if [`get`](Self::get) would return a value.
    ///
    /// This runs the full cascade, including promotion, rather than a cheaper presence probe.
    pub async fn exists(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }

    /// Tier availability plus hit, miss and error counters since the store was built.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            connected: self.is_connected(),
            warm_available: self.warm_available(),
            cold_available: self.cold_available(),
            hot_keys: self.hot.len(),
            hot_hits: self.counters.hot_hits.load(Ordering::Relaxed),
            warm_hits: self.counters.warm_hits.load(Ordering::Relaxed),
            cold_hits: self.counters.cold_hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            tier_errors: self.counters.tier_errors.load(Ordering::Relaxed),
        }
    }

    /// Dumps every live Hot tier entry, sorted by key.
    pub fn memory_contents(&self) -> Vec<MemoryEntry<V>> {
        let now = Instant::now();
        let mut entries: Vec<MemoryEntry<V>> = self
            .hot
            .snapshot()
            .into_iter()
            .map(|entry| MemoryEntry {
                size_bytes: encoded_len(&entry.value),
                expires_in: entry.expires_at.saturating_duration_since(now),
                key: entry.key,
                value: entry.value,
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    /// Aggregate Hot tier footprint grouped by key prefix.
    pub fn memory_stats(&self) -> MemoryStats {
        self.hot
            .snapshot()
            .iter()
            .fold(MemoryStats::default(), |mut stats, entry| {
                stats.record(&entry.key, encoded_len(&entry.value));
                stats
            })
    }

    /// Runs a Hot tier sweep now. Returns the number of entries evicted.
    pub fn cleanup_expired_memory(&self) -> usize {
        let evicted = self.hot.sweep();
        info!(evicted, "Manual hot tier cleanup");
        evicted
    }

    /// Deletes expired rows from the Cold tier. Returns `0` when no Cold tier is attached.
    pub async fn purge_expired_persistent(&self) -> StoreResult<u64> {
        let Some(cold) = self.cold_tier() else {
            return Ok(0);
        };
        let purged = self
            .bounded(Tier::Cold, cold.purge_expired(Utc::now()))
            .await
            .map_err(|source| StoreError::PurgeFailed { source })?;
        info!(purged, "Purged expired persistent rows");
        Ok(purged)
    }
}

#[cfg(any(test, feature = "mock"))]
impl<V: StoreValue> TieredStore<V> {
    /// Builds a store over fresh mock Warm and Cold tiers and returns handles to both.
    pub fn new_mock(config: StoreConfig) -> StoreResult<(Self, MockWarmTier, MockColdTier)> {
        let warm = MockWarmTier::new();
        let cold = MockColdTier::new();
        let store = Self::builder(config)
            .warm_tier(Arc::new(warm.clone()))
            .cold_tier(Arc::new(cold.clone()))
            .build()?;
        Ok((store, warm, cold))
    }
}

impl<V> std::fmt::Debug for TieredStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredStore")
            .field("hot", &self.hot)
            .field("warm", &self.warm.read().is_some())
            .field("cold", &self.cold.read().is_some())
            .field("connected", &self.connected.load(Ordering::Relaxed))
            .finish()
    }
}

fn expiry_after(ttl_secs: u64) -> DateTime<Utc> {
    let now = Utc::now();
    TimeDelta::try_seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX))
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn encoded_len<V: Serialize>(value: &V) -> usize {
    serde_json::to_vec(value).map(|bytes| bytes.len()).unwrap_or(0)
}

/// Shared handle to a [`TieredStore`], constructed once and passed to every caller.
pub struct StoreHandle<V> {
    inner: Arc<TieredStore<V>>,
}

impl<V> Clone for StoreHandle<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: StoreValue> StoreHandle<V> {
    pub fn new(store: TieredStore<V>) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    pub fn store(&self) -> &TieredStore<V> {
        &self.inner
    }

    pub async fn connect(&self) -> StoreResult<()> {
        self.inner.connect().await
    }

    pub async fn disconnect(&self) {
        self.inner.disconnect().await
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        self.inner.get(key).await
    }

    pub async fn set(&self, key: &str, value: V, ttl_secs: Option<u64>) -> StoreResult<()> {
        self.inner.set(key, value, ttl_secs).await
    }

    pub async fn delete(&self, key: &str) -> StoreResult<()> {
        self.inner.delete(key).await
    }

    pub async fn exists(&self, key: &str) -> bool {
        self.inner.exists(key).await
    }

    pub fn stats(&self) -> StoreStats {
        self.inner.stats()
    }

    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<V: StoreValue> From<TieredStore<V>> for StoreHandle<V> {
    fn from(store: TieredStore<V>) -> Self {
        Self::new(store)
    }
}

impl<V> std::fmt::Debug for StoreHandle<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("strong_count", &Arc::strong_count(&self.inner))
            .finish()
    }
}
