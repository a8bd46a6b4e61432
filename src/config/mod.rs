//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `STRATA_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_HOT_TTL_SECS, DEFAULT_SWEEP_INTERVAL_SECS,
    DEFAULT_TABLE_NAME, DEFAULT_TIER_TIMEOUT_MS, DEFAULT_WARM_TTL_SECS, MAX_TTL_SECS,
};

/// Store configuration loaded from environment variables.
///
/// Use [`StoreConfig::from_env`] to read `STRATA_*` overrides on top of defaults. Leaving
/// `redis_url` or `database_url` unset disables the corresponding tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Redis URL for the Warm tier. Default: none (tier disabled).
    pub redis_url: Option<String>,

    /// SQLx database URL for the Cold tier. Default: none (tier disabled).
    pub database_url: Option<String>,

    /// Pool size used when the store opens its own Cold tier pool. Default: `5`.
    pub db_max_connections: u32,

    /// Cold tier table name. Default: `kv_store`.
    pub table_name: String,

    /// Create the Cold tier table on connect when missing. Default: `true`.
    pub auto_migrate: bool,

    /// Hot tier entry lifetime. Default: 24 hours.
    pub hot_ttl: Duration,

    /// Warm tier entry lifetime and fallback Cold expiry. Default: 3 days.
    pub warm_ttl: Duration,

    /// Interval between Hot tier sweeps. Default: 60 seconds.
    pub sweep_interval: Duration,

    /// Upper bound on any single Warm or Cold tier call. Default: 2 seconds.
    pub tier_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            table_name: DEFAULT_TABLE_NAME.to_string(),
            auto_migrate: true,
            hot_ttl: Duration::from_secs(DEFAULT_HOT_TTL_SECS),
            warm_ttl: Duration::from_secs(DEFAULT_WARM_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            tier_timeout: Duration::from_millis(DEFAULT_TIER_TIMEOUT_MS),
        }
    }
}

impl StoreConfig {
    const ENV_REDIS_URL: &'static str = "STRATA_REDIS_URL";
    const ENV_DATABASE_URL: &'static str = "STRATA_DATABASE_URL";
    const ENV_DB_MAX_CONNECTIONS: &'static str = "STRATA_DB_MAX_CONNECTIONS";
    const ENV_TABLE: &'static str = "STRATA_TABLE";
    const ENV_AUTO_MIGRATE: &'static str = "STRATA_AUTO_MIGRATE";
    const ENV_HOT_TTL_SECS: &'static str = "STRATA_HOT_TTL_SECS";
    const ENV_WARM_TTL_SECS: &'static str = "STRATA_WARM_TTL_SECS";
    const ENV_SWEEP_INTERVAL_SECS: &'static str = "STRATA_SWEEP_INTERVAL_SECS";
    const ENV_TIER_TIMEOUT_MS: &'static str = "STRATA_TIER_TIMEOUT_MS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let redis_url = Self::parse_optional_string_from_env(Self::ENV_REDIS_URL);
        let database_url = Self::parse_optional_string_from_env(Self::ENV_DATABASE_URL);
        let db_max_connections = Self::parse_u64_from_env(
            Self::ENV_DB_MAX_CONNECTIONS,
            u64::from(defaults.db_max_connections),
        )?
        .min(u64::from(u32::MAX)) as u32;
        let table_name = Self::parse_optional_string_from_env(Self::ENV_TABLE)
            .unwrap_or(defaults.table_name);
        let auto_migrate = Self::parse_bool_from_env(Self::ENV_AUTO_MIGRATE, defaults.auto_migrate)?;
        let hot_ttl = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_HOT_TTL_SECS,
            defaults.hot_ttl.as_secs(),
        )?);
        let warm_ttl = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_WARM_TTL_SECS,
            defaults.warm_ttl.as_secs(),
        )?);
        let sweep_interval = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_SWEEP_INTERVAL_SECS,
            defaults.sweep_interval.as_secs(),
        )?);
        let tier_timeout = Duration::from_millis(Self::parse_u64_from_env(
            Self::ENV_TIER_TIMEOUT_MS,
            defaults.tier_timeout.as_millis() as u64,
        )?);

        Ok(Self {
            redis_url,
            database_url,
            db_max_connections,
            table_name,
            auto_migrate,
            hot_ttl,
            warm_ttl,
            sweep_interval,
            tier_timeout,
        })
    }

    /// Validates durations (non-zero, at most [`MAX_TTL_SECS`]), pool size and the table
    /// identifier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("hot_ttl", self.hot_ttl),
            ("warm_ttl", self.warm_ttl),
            ("sweep_interval", self.sweep_interval),
            ("tier_timeout", self.tier_timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigError::ZeroDuration { name });
            }
            if value > Duration::from_secs(MAX_TTL_SECS) {
                return Err(ConfigError::DurationTooLarge {
                    name,
                    max_secs: MAX_TTL_SECS,
                });
            }
        }

        if self.db_max_connections == 0 {
            return Err(ConfigError::ZeroConnections);
        }

        if !is_valid_identifier(&self.table_name) {
            return Err(ConfigError::InvalidTableName {
                value: self.table_name.clone(),
            });
        }

        if matches!(self.redis_url.as_deref(), Some(url) if url.trim().is_empty()) {
            return Err(ConfigError::EmptyUrl { name: "redis_url" });
        }
        if matches!(self.database_url.as_deref(), Some(url) if url.trim().is_empty()) {
            return Err(ConfigError::EmptyUrl {
                name: "database_url",
            });
        }

        Ok(())
    }

    /// Returns a config with only the Hot tier enabled and a custom sweep interval.
    pub fn hot_only(sweep_interval: Duration) -> Self {
        Self {
            sweep_interval,
            ..Default::default()
        }
    }

    /// Warm tier TTL in whole seconds (the unit Redis expects).
    pub fn warm_ttl_secs(&self) -> u64 {
        self.warm_ttl.as_secs().max(1)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidBool {
                    name: var_name,
                    value,
                }),
            },
            Err(_) => Ok(default),
        }
    }
}

pub(crate) fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
