//! In-memory Cold tier with expiring rows, call counters and failure injection.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};

use super::ColdTier;
use crate::cache::error::{TierError, TierResult};
use crate::cache::types::Tier;

#[derive(Debug, Clone)]
struct MockRow {
    raw: String,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct MockColdState {
    rows: std::sync::RwLock<HashMap<String, MockRow>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
    fail_ping: AtomicBool,
    get_calls: AtomicUsize,
    upsert_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    schema_created: AtomicBool,
    closed: AtomicBool,
}

/// Cloneable mock; clones share rows and flags.
#[derive(Default, Clone)]
pub struct MockColdTier {
    state: Arc<MockColdState>,
}

impl MockColdTier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a row that expires `ttl_secs` from now, bypassing the store.
    pub fn insert_raw(&self, key: &str, raw: &str, ttl_secs: i64) {
        self.insert_row(key, raw, Utc::now() + ChronoDuration::seconds(ttl_secs));
    }

    fn insert_row(&self, key: &str, raw: &str, expires_at: DateTime<Utc>) {
        self.state.rows.write().expect("lock poisoned").insert(
            key.to_string(),
            MockRow {
                raw: raw.to_string(),
                expires_at,
            },
        );
    }

    /// Returns the stored payload for `key`, expired or not.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.state
            .rows
            .read()
            .expect("lock poisoned")
            .get(key)
            .map(|row| row.raw.clone())
    }

    pub fn expires_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.state
            .rows
            .read()
            .expect("lock poisoned")
            .get(key)
            .map(|row| row.expires_at)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.state.rows.read().expect("lock poisoned").len()
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

    pub fn get_calls(&self) -> usize {
        self.state.get_calls.load(Ordering::SeqCst)
    }

    pub fn upsert_calls(&self) -> usize {
        self.state.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.state.delete_calls.load(Ordering::SeqCst)
    }

    pub fn schema_created(&self) -> bool {
        self.state.schema_created.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }

    fn injected(&self, flag: &AtomicBool, op: &str) -> TierResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(TierError::Backend {
                tier: Tier::Cold,
                reason: format!("injected {op} failure"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ColdTier for MockColdTier {
    async fn get(&self, key: &str, now: DateTime<Utc>) -> TierResult<Option<String>> {
        self.state.get_calls.fetch_add(1, Ordering::SeqCst);
        self.injected(&self.state.fail_reads, "get")?;
        Ok(self
            .state
            .rows
            .read()
            .expect("lock poisoned")
            .get(key)
            .filter(|row| row.expires_at > now)
            .map(|row| row.raw.clone()))
    }

    async fn upsert(&self, key: &str, raw: &str, expires_at: DateTime<Utc>) -> TierResult<()> {
        self.state.upsert_calls.fetch_add(1, Ordering::SeqCst);
        self.injected(&self.state.fail_writes, "upsert")?;
        self.insert_row(key, raw, expires_at);
        Ok(())
    }

    async fn delete(&self, key: &str) -> TierResult<()> {
        self.state.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.injected(&self.state.fail_deletes, "delete")?;
        self.state.rows.write().expect("lock poisoned").remove(key);
        Ok(())
    }

    async fn ping(&self) -> TierResult<()> {
        self.injected(&self.state.fail_ping, "ping")
    }

    async fn ensure_schema(&self) -> TierResult<()> {
        self.state.schema_created.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> TierResult<u64> {
        let mut rows = self.state.rows.write().expect("lock poisoned");
        let before = rows.len();
        rows.retain(|_, row| row.expires_at > now);
        Ok((before - rows.len()) as u64)
    }

    async fn close(&self) {
        self.state.closed.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for MockColdTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockColdTier")
            .field("rows", &self.len())
            .finish()
    }
}
