//! Hot tier: in-process cache with per-entry expiry.
//!
//! Values live in one map and their expiration instants in a parallel map. Both maps (and the
//! delete tombstones) sit behind a single [`parking_lot::Mutex`], so a sweep can never observe or
//! produce a value without an expiry, or an expiry without a value.
//!
//! Every `set` and `delete` stamps the key with a new generation. A reader that fetched a value
//! from a slower tier writes it back only if the key's generation has not moved since the read
//! began, so a concurrent `delete` can never be undone by a late promotion.
//!
//! Time comes from [`tokio::time::Instant`], which follows a paused test clock.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::constants::{DEFAULT_HOT_TTL_SECS, MAX_TTL_SECS};

/// A live Hot tier entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HotEntry<V> {
    pub key: String,
    pub value: V,
    pub expires_at: Instant,
}

#[derive(Debug)]
struct HotState<V> {
    values: HashMap<String, V>,
    expiries: HashMap<String, Instant>,
    /// Keys whose slower-tier copies may be stale after a partially failed delete.
    tombstones: HashMap<String, Instant>,
    /// Generation of the last `set`/`delete` per key.
    generations: HashMap<String, u64>,
    /// Last generation handed out.
    epoch: u64,
    /// Highest generation dropped from `generations`; absent keys are treated as this recent.
    pruned_through: u64,
}

impl<V> Default for HotState<V> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            expiries: HashMap::new(),
            tombstones: HashMap::new(),
            generations: HashMap::new(),
            epoch: 0,
            pruned_through: 0,
        }
    }
}

impl<V> HotState<V> {
    fn stamp(&mut self, key: &str) {
        self.epoch += 1;
        self.generations.insert(key.to_string(), self.epoch);
    }

    fn unchanged_since(&self, key: &str, generation: u64) -> bool {
        let last = self
            .generations
            .get(key)
            .copied()
            .unwrap_or(self.pruned_through);
        last <= generation
    }

    fn prune_generations(&mut self) {
        let Self {
            values,
            tombstones,
            generations,
            pruned_through,
            ..
        } = self;
        generations.retain(|key, generation| {
            let keep = values.contains_key(key) || tombstones.contains_key(key);
            if !keep {
                *pruned_through = (*pruned_through).max(*generation);
            }
            keep
        });
    }

    fn evict(&mut self, key: &str) -> bool {
        let had_value = self.values.remove(key).is_some();
        let had_expiry = self.expiries.remove(key).is_some();
        had_value || had_expiry
    }

    fn is_expired(&self, key: &str, now: Instant) -> bool {
        self.expiries.get(key).is_none_or(|at| *at <= now)
    }
}

/// In-process key/value cache with a fixed default lifetime.
pub struct HotTier<V> {
    state: Mutex<HotState<V>>,
    default_ttl: Duration,
}

impl<V: Clone> HotTier<V> {
    /// Creates a tier with the default 24 hour lifetime.
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_HOT_TTL_SECS))
    }

    /// Creates a tier whose entries live for `default_ttl`.
    pub fn with_ttl(default_ttl: Duration) -> Self {
        Self {
            state: Mutex::new(HotState::default()),
            default_ttl,
        }
    }

    #[inline]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the value for `key`, evicting it first if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut state = self.state.lock();
        if state.is_expired(key, now) {
            state.evict(key);
            return None;
        }
        state.values.get(key).cloned()
    }

    /// Stores `value` for the default lifetime, replacing any previous entry.
    pub fn set(&self, key: &str, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Stores `value` for `ttl`, replacing any previous entry and clearing a tombstone.
    pub fn set_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        let expires_at = deadline(ttl);
        let mut state = self.state.lock();
        state.values.insert(key.to_string(), value);
        state.expiries.insert(key.to_string(), expires_at);
        state.tombstones.remove(key);
        state.stamp(key);
    }

    /// Removes `key`. Returns `true` if an entry (live or expired) was present.
    pub fn delete(&self, key: &str) -> bool {
        let mut state = self.state.lock();
        state.stamp(key);
        state.evict(key)
    }

    /// Current generation. Pass it to [`set_if_unchanged`](Self::set_if_unchanged) after a
    /// slower-tier read.
    pub fn generation(&self) -> u64 {
        self.state.lock().epoch
    }

    /// `true` if `key` has not been written or deleted since `generation` was taken.
    pub fn is_unchanged(&self, key: &str, generation: u64) -> bool {
        self.state.lock().unchanged_since(key, generation)
    }

    /// Stores `value` for the default lifetime unless `key` was written or deleted after
    /// `generation` was taken. Returns `true` if the value was stored.
    pub fn set_if_unchanged(&self, key: &str, value: V, generation: u64) -> bool {
        let expires_at = deadline(self.default_ttl);
        let mut state = self.state.lock();
        if !state.unchanged_since(key, generation) || state.tombstones.contains_key(key) {
            return false;
        }
        state.values.insert(key.to_string(), value);
        state.expiries.insert(key.to_string(), expires_at);
        true
    }

    /// Returns `true` if `key` holds a live entry, evicting it if it has expired.
    pub fn exists(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut state = self.state.lock();
        if state.is_expired(key, now) {
            state.evict(key);
            return false;
        }
        true
    }

    /// Evicts every expired entry and expired tombstone. Returns the number of entries evicted.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut state = self.state.lock();

        let expired: Vec<String> = state
            .expiries
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            state.evict(key);
        }
        state.tombstones.retain(|_, until| *until > now);
        state.prune_generations();

        expired.len()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.state.lock().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every live entry. Expired entries are skipped but left for the sweeper.
    pub fn snapshot(&self) -> Vec<HotEntry<V>> {
        let now = Instant::now();
        let state = self.state.lock();
        state
            .values
            .iter()
            .filter_map(|(key, value)| {
                let expires_at = *state.expiries.get(key)?;
                (expires_at > now).then(|| HotEntry {
                    key: key.clone(),
                    value: value.clone(),
                    expires_at,
                })
            })
            .collect()
    }

    /// Drops all entries and tombstones.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.values.clear();
        state.expiries.clear();
        state.tombstones.clear();
        state.generations.clear();
        state.pruned_through = state.epoch;
    }

    /// Marks `key` as deleted for `ttl`, hiding any stale copy held by slower tiers.
    pub fn tombstone(&self, key: &str, ttl: Duration) {
        let until = deadline(ttl);
        self.state.lock().tombstones.insert(key.to_string(), until);
    }

    /// Lifts the tombstone on `key`. Returns `true` if one was present.
    pub fn clear_tombstone(&self, key: &str) -> bool {
        self.state.lock().tombstones.remove(key).is_some()
    }

    /// Returns `true` while a tombstone for `key` is in force.
    pub fn is_tombstoned(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut state = self.state.lock();
        match state.tombstones.get(key) {
            Some(until) if *until > now => true,
            Some(_) => {
                state.tombstones.remove(key);
                false
            }
            None => false,
        }
    }

    /// Checks that the value and expiry maps hold exactly the same keys.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let state = self.state.lock();
        state.values.len() == state.expiries.len()
            && state.values.keys().all(|k| state.expiries.contains_key(k))
    }
}

impl<V: Clone> Default for HotTier<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for HotTier<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HotTier")
            .field("entries", &state.values.len())
            .field("tombstones", &state.tombstones.len())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

/// `now + ttl`, capped at [`MAX_TTL_SECS`] so oversized lifetimes cannot overflow the clock.
fn deadline(ttl: Duration) -> Instant {
    let now = Instant::now();
    let ttl = ttl.min(Duration::from_secs(MAX_TTL_SECS));
    now.checked_add(ttl).unwrap_or(now)
}
