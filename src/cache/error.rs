use std::time::Duration;

use thiserror::Error;

use super::types::Tier;

#[derive(Debug, Error)]
/// Errors raised by a single Warm or Cold tier call.
pub enum TierError {
    /// Redis command or connection failure.
    #[error("distributed cache error: {0}")]
    Redis(#[from] redis::RedisError),

    /// SQL query or pool failure.
    #[error("persistent store error: {0}")]
    Sql(#[from] sqlx::Error),

    /// The call did not complete within the configured tier timeout.
    #[error("{tier} tier call timed out after {after:?}")]
    Timeout {
        /// Tier that timed out.
        tier: Tier,
        /// Configured bound.
        after: Duration,
    },

    /// Backend-specific failure without a richer error type.
    #[error("{tier} tier failure: {reason}")]
    Backend {
        /// Tier that failed.
        tier: Tier,
        /// Error message.
        reason: String,
    },
}

/// Convenience result type for tier adapter calls.
pub type TierResult<T> = Result<T, TierError>;

/// A tier that failed during a fan-out write or delete.
#[derive(Debug)]
pub struct TierFailure {
    pub tier: Tier,
    pub error: TierError,
}

impl std::fmt::Display for TierFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.tier, self.error)
    }
}

fn join_failures(failures: &[TierFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
/// Errors returned by the tiered store.
pub enum StoreError {
    /// A configured Cold tier could not be opened or failed its liveness probe.
    #[error("persistent store unavailable: {source}")]
    ColdConnect {
        #[source]
        source: TierError,
    },

    /// The store configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The value could not be encoded for the Warm/Cold tiers.
    #[error("failed to serialize value for '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A TTL of zero seconds was requested.
    #[error("ttl for '{key}' must be at least one second")]
    InvalidTtl { key: String },

    /// One or more tiers rejected a `set`. Tiers not listed were written.
    #[error("write of '{key}' failed on {}", join_failures(.failures))]
    WriteFailed {
        key: String,
        failures: Vec<TierFailure>,
    },

    /// One or more tiers rejected a `delete`. Tiers not listed were cleared.
    #[error("delete of '{key}' failed on {}", join_failures(.failures))]
    DeleteFailed {
        key: String,
        failures: Vec<TierFailure>,
    },

    /// Expired-row cleanup in the Cold tier failed.
    #[error("persistent purge failed: {source}")]
    PurgeFailed {
        #[source]
        source: TierError,
    },
}

impl StoreError {
    /// Tiers that failed, for `WriteFailed` / `DeleteFailed`.
    pub fn failed_tiers(&self) -> Vec<Tier> {
        match self {
            StoreError::WriteFailed { failures, .. } | StoreError::DeleteFailed { failures, .. } => {
                failures.iter().map(|f| f.tier).collect()
            }
            StoreError::ColdConnect { .. } | StoreError::PurgeFailed { .. } => vec![Tier::Cold],
            _ => Vec::new(),
        }
    }
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
