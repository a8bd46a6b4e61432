//! In-memory Warm tier with TTLs, call counters and failure injection.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::WarmTier;
use crate::cache::error::{TierError, TierResult};
use crate::cache::types::Tier;
use crate::constants::MAX_TTL_SECS;

#[derive(Debug, Clone)]
struct MockWarmEntry {
    raw: Vec<u8>,
    ttl_secs: u64,
    expires_at: Instant,
}

#[derive(Default)]
struct MockWarmState {
    entries: std::sync::RwLock<HashMap<String, MockWarmEntry>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
    fail_ping: AtomicBool,
    latency: parking_lot::Mutex<Option<Duration>>,
    get_calls: AtomicUsize,
    set_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    closed: AtomicBool,
}

/// Cloneable mock; clones share state so a test can keep a handle after passing one to a store.
#[derive(Default, Clone)]
pub struct MockWarmTier {
    state: Arc<MockWarmState>,
}

impl MockWarmTier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `key` directly, bypassing the store.
    pub fn insert_raw(&self, key: &str, raw: &[u8], ttl_secs: u64) {
        self.state.entries.write().expect("lock poisoned").insert(
            key.to_string(),
            MockWarmEntry {
                raw: raw.to_vec(),
                ttl_secs,
                expires_at: Instant::now() + Duration::from_secs(ttl_secs.min(MAX_TTL_SECS)),
            },
        );
    }

    /// Returns the live raw payload for `key`.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        let now = Instant::now();
        self.state
            .entries
            .read()
            .expect("lock poisoned")
            .get(key)
            .filter(|e| e.expires_at > now)
            .map(|e| e.raw.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// TTL (seconds) given on the most recent write of `key`.
    pub fn ttl_secs(&self, key: &str) -> Option<u64> {
        self.state
            .entries
            .read()
            .expect("lock poisoned")
            .get(key)
            .map(|e| e.ttl_secs)
    }

    pub fn len(&self) -> usize {
        self.state.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.state.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.state.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.state.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_ping(&self, fail: bool) {
        self.state.fail_ping.store(fail, Ordering::SeqCst);
    }

    /// Delays every call by `latency` (used to exercise tier timeouts).
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.state.latency.lock() = latency;
    }

    pub fn get_calls(&self) -> usize {
        self.state.get_calls.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.state.set_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.state.delete_calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        let latency = *self.state.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn injected(&self, flag: &AtomicBool, op: &str) -> TierResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(TierError::Backend {
                tier: Tier::Warm,
                reason: format!("injected {op} failure"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WarmTier for MockWarmTier {
    async fn get(&self, key: &str) -> TierResult<Option<Vec<u8>>> {
        self.state.get_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.injected(&self.state.fail_reads, "get")?;
        Ok(self.raw(key))
    }

    async fn set_with_ttl(&self, key: &str, raw: &[u8], ttl_secs: u64) -> TierResult<()> {
        self.state.set_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.injected(&self.state.fail_writes, "set")?;
        self.insert_raw(key, raw, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> TierResult<()> {
        self.state.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.injected(&self.state.fail_deletes, "delete")?;
        self.state
            .entries
            .write()
            .expect("lock poisoned")
            .remove(key);
        Ok(())
    }

    async fn ping(&self) -> TierResult<()> {
        self.simulate_latency().await;
        self.injected(&self.state.fail_ping, "ping")
    }

    async fn close(&self) {
        self.state.closed.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for MockWarmTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockWarmTier")
            .field("entries", &self.len())
            .finish()
    }
}
