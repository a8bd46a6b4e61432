use std::collections::BTreeMap;
use std::time::Duration;

/// One of the three storage layers, ordered by increasing latency and durability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// In-process cache.
    Hot,
    /// Distributed cache (Redis).
    Warm,
    /// Persistent store (SQL).
    Cold,
}

impl Tier {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Hot => "hot",
            Tier::Warm => "warm",
            Tier::Cold => "cold",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a cascading read, recording which tier answered.
#[derive(Debug, Clone, PartialEq)]
pub enum TieredLookupResult<V> {
    HitHot(V),
    HitWarm(V),
    HitCold(V),
    Miss,
}

impl<V> TieredLookupResult<V> {
    pub fn tier(&self) -> Option<Tier> {
        match self {
            TieredLookupResult::HitHot(_) => Some(Tier::Hot),
            TieredLookupResult::HitWarm(_) => Some(Tier::Warm),
            TieredLookupResult::HitCold(_) => Some(Tier::Cold),
            TieredLookupResult::Miss => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        !matches!(self, TieredLookupResult::Miss)
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            TieredLookupResult::HitHot(v)
            | TieredLookupResult::HitWarm(v)
            | TieredLookupResult::HitCold(v) => Some(v),
            TieredLookupResult::Miss => None,
        }
    }

    pub fn into_value(self) -> Option<V> {
        match self {
            TieredLookupResult::HitHot(v)
            | TieredLookupResult::HitWarm(v)
            | TieredLookupResult::HitCold(v) => Some(v),
            TieredLookupResult::Miss => None,
        }
    }
}

/// Availability and counters reported by [`TieredStore::stats`](super::TieredStore::stats).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub connected: bool,
    pub warm_available: bool,
    pub cold_available: bool,
    /// Live Hot tier keys (expired entries not yet swept are counted).
    pub hot_keys: usize,
    pub hot_hits: u64,
    pub warm_hits: u64,
    pub cold_hits: u64,
    pub misses: u64,
    /// Tier calls that failed or timed out, across read and write paths.
    pub tier_errors: u64,
}

/// A single Hot tier entry as exposed for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntry<V> {
    pub key: String,
    pub value: V,
    /// Remaining lifetime at the moment of the dump.
    pub expires_in: Duration,
    /// Length of the value's JSON encoding.
    pub size_bytes: usize,
}

/// Per-prefix aggregate inside [`MemoryStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeStats {
    pub count: usize,
    pub size_bytes: usize,
}

/// Aggregate Hot tier footprint, grouped by key prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStats {
    pub total_keys: usize,
    pub total_size_bytes: usize,
    pub by_type: BTreeMap<String, TypeStats>,
}

impl MemoryStats {
    /// Returns the prefix of `key` used for grouping: text before the first delimiter, or the
    /// whole key when there is none.
    pub fn key_type(key: &str) -> &str {
        key.split(crate::constants::KEY_TYPE_DELIMITER)
            .next()
            .unwrap_or(key)
    }

    pub(crate) fn record(&mut self, key: &str, size_bytes: usize) {
        self.total_keys += 1;
        self.total_size_bytes += size_bytes;
        let entry = self.by_type.entry(Self::key_type(key).to_string()).or_default();
        entry.count += 1;
        entry.size_bytes += size_bytes;
    }
}
