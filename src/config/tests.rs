use super::*;
use serial_test::serial;
use std::env;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_strata_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("STRATA_REDIS_URL");
        env::remove_var("STRATA_DATABASE_URL");
        env::remove_var("STRATA_DB_MAX_CONNECTIONS");
        env::remove_var("STRATA_TABLE");
        env::remove_var("STRATA_AUTO_MIGRATE");
        env::remove_var("STRATA_HOT_TTL_SECS");
        env::remove_var("STRATA_WARM_TTL_SECS");
        env::remove_var("STRATA_SWEEP_INTERVAL_SECS");
        env::remove_var("STRATA_TIER_TIMEOUT_MS");
    }
}

#[test]
fn test_default_config() {
    let config = StoreConfig::default();

    assert!(config.redis_url.is_none());
    assert!(config.database_url.is_none());
    assert_eq!(config.db_max_connections, 5);
    assert_eq!(config.table_name, "kv_store");
    assert!(config.auto_migrate);
    assert_eq!(config.hot_ttl, Duration::from_secs(86_400));
    assert_eq!(config.warm_ttl, Duration::from_secs(259_200));
    assert_eq!(config.sweep_interval, Duration::from_secs(60));
    assert_eq!(config.tier_timeout, Duration::from_millis(2_000));
    assert!(config.validate().is_ok());
}

#[test]
fn test_hot_only_keeps_defaults() {
    let config = StoreConfig::hot_only(Duration::from_millis(10));
    assert_eq!(config.sweep_interval, Duration::from_millis(10));
    assert!(config.redis_url.is_none());
    assert_eq!(config.hot_ttl, StoreConfig::default().hot_ttl);
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_strata_env();

    let config = StoreConfig::from_env().expect("should parse with defaults");
    assert_eq!(config, StoreConfig::default());
}

#[test]
#[serial]
fn test_from_env_tier_urls() {
    clear_strata_env();

    with_env_vars(
        &[
            ("STRATA_REDIS_URL", "redis://cache:6379/0"),
            ("STRATA_DATABASE_URL", " sqlite://data/strata.db "),
        ],
        || {
            let config = StoreConfig::from_env().expect("should parse");
            assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379/0"));
            assert_eq!(
                config.database_url.as_deref(),
                Some("sqlite://data/strata.db")
            );
        },
    );
}

#[test]
#[serial]
fn test_from_env_blank_url_disables_tier() {
    clear_strata_env();

    with_env_vars(&[("STRATA_REDIS_URL", "   ")], || {
        let config = StoreConfig::from_env().expect("should parse");
        assert!(config.redis_url.is_none());
    });
}

#[test]
#[serial]
fn test_from_env_durations() {
    clear_strata_env();

    with_env_vars(
        &[
            ("STRATA_HOT_TTL_SECS", "600"),
            ("STRATA_WARM_TTL_SECS", "7200"),
            ("STRATA_SWEEP_INTERVAL_SECS", "5"),
            ("STRATA_TIER_TIMEOUT_MS", "250"),
        ],
        || {
            let config = StoreConfig::from_env().expect("should parse");
            assert_eq!(config.hot_ttl, Duration::from_secs(600));
            assert_eq!(config.warm_ttl, Duration::from_secs(7200));
            assert_eq!(config.sweep_interval, Duration::from_secs(5));
            assert_eq!(config.tier_timeout, Duration::from_millis(250));
        },
    );
}

#[test]
#[serial]
fn test_from_env_invalid_number() {
    clear_strata_env();

    with_env_vars(&[("STRATA_HOT_TTL_SECS", "a day")], || {
        let result = StoreConfig::from_env();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidNumber {
                name: "STRATA_HOT_TTL_SECS",
                ..
            })
        ));
    });
}

#[test]
#[serial]
fn test_from_env_auto_migrate_flag() {
    clear_strata_env();

    with_env_vars(&[("STRATA_AUTO_MIGRATE", "0")], || {
        let config = StoreConfig::from_env().expect("should parse");
        assert!(!config.auto_migrate);
    });

    with_env_vars(&[("STRATA_AUTO_MIGRATE", "maybe")], || {
        assert!(matches!(
            StoreConfig::from_env(),
            Err(ConfigError::InvalidBool { .. })
        ));
    });
}

#[test]
fn test_validate_rejects_zero_durations() {
    let config = StoreConfig {
        sweep_interval: Duration::ZERO,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroDuration {
            name: "sweep_interval"
        })
    ));
}

#[test]
fn test_validate_rejects_oversized_durations() {
    let config = StoreConfig {
        hot_ttl: Duration::from_secs(u64::MAX),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::DurationTooLarge { name: "hot_ttl", .. })
    ));

    let config = StoreConfig {
        warm_ttl: Duration::from_secs(crate::constants::MAX_TTL_SECS + 1),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::DurationTooLarge { name: "warm_ttl", .. })
    ));

    let config = StoreConfig {
        warm_ttl: Duration::from_secs(crate::constants::MAX_TTL_SECS),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_oversized_ttl_fails_validation() {
    clear_strata_env();
    with_env_vars(&[("STRATA_HOT_TTL_SECS", "18446744073709551615")], || {
        let config = StoreConfig::from_env().expect("parses as u64");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DurationTooLarge { .. })
        ));
    });
}

#[test]
fn test_validate_rejects_bad_table_names() {
    for name in ["", "1table", "kv-store", "kv_store; DROP TABLE users"] {
        let config = StoreConfig {
            table_name: name.to_string(),
            ..Default::default()
        };
        assert!(
            matches!(config.validate(), Err(ConfigError::InvalidTableName { .. })),
            "{name:?} should be rejected"
        );
    }

    let config = StoreConfig {
        table_name: "_bot_state2".to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_zero_connections_and_empty_urls() {
    let config = StoreConfig {
        db_max_connections: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroConnections)
    ));

    let config = StoreConfig {
        redis_url: Some(String::new()),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::EmptyUrl { name: "redis_url" })
    ));
}

#[test]
fn test_warm_ttl_secs_never_zero() {
    let config = StoreConfig {
        warm_ttl: Duration::from_millis(300),
        ..Default::default()
    };
    assert_eq!(config.warm_ttl_secs(), 1);
}
