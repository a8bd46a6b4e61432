//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric environment variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A boolean environment variable held something other than a recognized flag.
    #[error("invalid boolean for {name}: '{value}' (expected true/false/1/0)")]
    InvalidBool { name: &'static str, value: String },

    /// A duration that must be positive was zero.
    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },

    /// A duration exceeded the supported ceiling.
    #[error("{name} must be at most {max_secs} seconds")]
    DurationTooLarge { name: &'static str, max_secs: u64 },

    /// The Cold tier pool size was zero.
    #[error("db_max_connections must be greater than zero")]
    ZeroConnections,

    /// The Cold tier table name is not a plain SQL identifier.
    #[error("invalid table name '{value}': use ASCII letters, digits and underscores")]
    InvalidTableName { value: String },

    /// A configured URL was present but blank.
    #[error("{name} is set but empty")]
    EmptyUrl { name: &'static str },
}
