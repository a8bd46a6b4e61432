//! Store tests against a real SQLite Cold tier.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

use strata::{MockWarmTier, StoreConfig, StoreHandle, Tier, TieredStore};

use common::{SqliteFixture, row_count};

#[tokio::test]
async fn test_values_survive_restart() {
    let db = SqliteFixture::new();

    let store: TieredStore<Value> = TieredStore::new(db.config()).expect("config");
    store.connect().await.expect("connect");
    store
        .set("user_state:7", json!({"step": "awaiting_email"}), None)
        .await
        .expect("set");
    store.disconnect().await;

    let restarted: TieredStore<Value> = TieredStore::new(db.config()).expect("config");
    restarted.connect().await.expect("connect");

    let result = restarted.lookup("user_state:7").await;
    assert_eq!(result.tier(), Some(Tier::Cold));
    assert_eq!(
        result.into_value(),
        Some(json!({"step": "awaiting_email"}))
    );
    assert_eq!(
        restarted.lookup("user_state:7").await.tier(),
        Some(Tier::Hot)
    );
    restarted.disconnect().await;
}

#[tokio::test]
async fn test_connect_creates_table() {
    let db = SqliteFixture::new();
    let config = StoreConfig {
        table_name: "bot_state".to_string(),
        ..db.config()
    };
    let store: TieredStore<Value> = TieredStore::new(config).expect("config");
    store.connect().await.expect("connect");
    store.set("k", json!(1), None).await.expect("set");
    store.disconnect().await;

    let pool = db.pool().await;
    assert_eq!(row_count(&pool, "bot_state").await, 1);
}

#[tokio::test]
async fn test_missing_table_without_auto_migrate_is_absent() {
    let db = SqliteFixture::new();
    let config = StoreConfig {
        auto_migrate: false,
        ..db.config()
    };
    let store: TieredStore<Value> = TieredStore::new(config).expect("config");
    store.connect().await.expect("ping does not need the table");

    store.set("k", json!(1), None).await.expect("write skipped");
    store.hot().clear();
    assert!(store.get("k").await.is_none());
    store.delete("k").await.expect("delete skipped");
    assert_eq!(store.stats().tier_errors, 0);

    store.disconnect().await;
}

#[tokio::test]
async fn test_delete_removes_persistent_row() {
    let db = SqliteFixture::new();
    let store: TieredStore<Value> = TieredStore::new(db.config()).expect("config");
    store.connect().await.expect("connect");

    store.set("k", json!("v"), None).await.expect("set");
    store.delete("k").await.expect("delete");
    store.hot().clear();

    assert!(store.get("k").await.is_none());
    store.disconnect().await;

    let pool = db.pool().await;
    assert_eq!(row_count(&pool, "kv_store").await, 0);
}

#[tokio::test]
async fn test_purge_expired_rows() {
    let db = SqliteFixture::new();
    let store: TieredStore<Value> = TieredStore::new(db.config()).expect("config");
    store.connect().await.expect("connect");

    store.set("short", json!(1), Some(1)).await.expect("set");
    store.set("long", json!(2), Some(3_600)).await.expect("set");

    tokio::time::sleep(Duration::from_millis(1_200)).await;

    assert!(store.get("short").await.is_none());
    assert_eq!(store.purge_expired_persistent().await.expect("purge"), 1);
    assert_eq!(store.get("long").await, Some(json!(2)));
    store.disconnect().await;
}

#[tokio::test]
async fn test_handed_in_pool_stays_open() {
    let db = SqliteFixture::new();
    let pool = db.pool().await;

    let store: TieredStore<Value> = TieredStore::builder(StoreConfig::default())
        .cold_pool(pool.clone())
        .build()
        .expect("build");
    store.connect().await.expect("connect");
    store.set("k", json!("v"), None).await.expect("set");
    store.disconnect().await;

    assert!(!pool.is_closed());
    assert_eq!(row_count(&pool, "kv_store").await, 1);
}

#[tokio::test]
async fn test_warm_and_cold_together() {
    let db = SqliteFixture::new();
    let warm = MockWarmTier::new();
    let store: TieredStore<Value> = TieredStore::builder(db.config())
        .warm_tier(Arc::new(warm.clone()))
        .build()
        .expect("build");
    store.connect().await.expect("connect");

    store.set("k", json!({"n": 1}), Some(600)).await.expect("set");
    assert_eq!(warm.ttl_secs("k"), Some(600));

    warm.set_fail_deletes(true);
    let err = store.delete("k").await.expect_err("warm delete fails");
    assert_eq!(err.failed_tiers(), vec![Tier::Warm]);
    assert!(warm.contains("k"));
    assert!(store.get("k").await.is_none());

    store.disconnect().await;
    assert!(!warm.is_closed());
}

#[tokio::test]
async fn test_handle_shared_across_tasks() {
    let db = SqliteFixture::new();
    let store: TieredStore<u64> = TieredStore::new(db.config()).expect("config");
    let handle = StoreHandle::from(store);
    handle.connect().await.expect("connect");

    let tasks: Vec<_> = (0..8u64)
        .map(|i| {
            let handle = handle.clone();
            tokio::spawn(async move {
                handle
                    .set(&format!("counter:{i}"), i, None)
                    .await
                    .expect("set");
            })
        })
        .collect();
    for result in futures::future::join_all(tasks).await {
        result.expect("task completed");
    }

    for i in 0..8u64 {
        assert_eq!(handle.get(&format!("counter:{i}")).await, Some(i));
    }
    assert_eq!(handle.store().memory_stats().by_type["counter"].count, 8);

    handle.disconnect().await;
    let pool = db.pool().await;
    assert_eq!(row_count(&pool, "kv_store").await, 8);
}
