//! Cross-cutting, shared constants.
//!
//! Durations are kept as whole seconds (or milliseconds for the tier timeout) so the same values
//! can feed both the environment parser and `Duration` construction without drift.

/// Default lifetime of a Hot tier entry (24 hours).
pub const DEFAULT_HOT_TTL_SECS: u64 = 24 * 60 * 60;

/// Default lifetime of a Warm tier entry and of Cold rows written without an explicit TTL (3 days).
pub const DEFAULT_WARM_TTL_SECS: u64 = 3 * 24 * 60 * 60;

/// Default interval between Hot tier sweeps.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Default upper bound on a single Warm or Cold tier call.
pub const DEFAULT_TIER_TIMEOUT_MS: u64 = 2_000;

/// Default Cold tier table name.
pub const DEFAULT_TABLE_NAME: &str = "kv_store";

/// Default Cold tier pool size when the store builds its own pool.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Delimiter separating a key's type prefix from its identifier (`session:42`).
pub const KEY_TYPE_DELIMITER: char = ':';

/// Longest lifetime accepted for any tier (10 years). Larger configured TTLs are rejected and
/// larger caller TTLs are capped in the Hot tier.
pub const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;
