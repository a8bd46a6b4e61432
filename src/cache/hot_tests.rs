use std::time::Duration;

use super::hot::HotTier;

#[test]
fn test_hot_tier_new_is_empty() {
    let tier: HotTier<String> = HotTier::new();
    assert!(tier.is_empty());
    assert_eq!(tier.len(), 0);
    assert_eq!(tier.default_ttl(), Duration::from_secs(86_400));
}

#[test]
fn test_hot_tier_set_and_get() {
    let tier = HotTier::new();
    tier.set("session:1", "welcome".to_string());

    assert_eq!(tier.get("session:1").as_deref(), Some("welcome"));
    assert!(tier.exists("session:1"));
    assert_eq!(tier.len(), 1);
}

#[test]
fn test_hot_tier_get_missing() {
    let tier: HotTier<u32> = HotTier::new();
    assert!(tier.get("nope").is_none());
    assert!(!tier.exists("nope"));
}

#[test]
fn test_hot_tier_set_overwrites() {
    let tier = HotTier::new();
    tier.set("k", 1u32);
    tier.set("k", 2u32);

    assert_eq!(tier.get("k"), Some(2));
    assert_eq!(tier.len(), 1);
}

#[test]
fn test_hot_tier_delete() {
    let tier = HotTier::new();
    tier.set("k", 1u32);

    assert!(tier.delete("k"));
    assert!(!tier.delete("k"));
    assert!(tier.get("k").is_none());
    assert!(tier.is_consistent());
}

#[tokio::test(start_paused = true)]
async fn test_hot_tier_get_evicts_expired_entry() {
    let tier = HotTier::with_ttl(Duration::from_secs(10));
    tier.set("k", "v".to_string());

    tokio::time::advance(Duration::from_secs(9)).await;
    assert!(tier.get("k").is_some());

    tokio::time::advance(Duration::from_secs(2)).await;
    assert!(tier.get("k").is_none());
    assert_eq!(tier.len(), 0, "lazy eviction removes the entry");
    assert!(tier.is_consistent());
}

#[tokio::test(start_paused = true)]
async fn test_hot_tier_exists_evicts_expired_entry() {
    let tier = HotTier::with_ttl(Duration::from_secs(1));
    tier.set("k", 7u8);

    tokio::time::advance(Duration::from_secs(2)).await;
    assert!(!tier.exists("k"));
    assert!(tier.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_hot_tier_set_with_ttl() {
    let tier = HotTier::new();
    tier.set_with_ttl("short", 1u8, Duration::from_secs(5));
    tier.set("long", 2u8);

    tokio::time::advance(Duration::from_secs(6)).await;
    assert!(tier.get("short").is_none());
    assert_eq!(tier.get("long"), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_hot_tier_sweep_counts_only_expired() {
    let tier = HotTier::new();
    for i in 0..5 {
        tier.set_with_ttl(&format!("temp:{i}"), i, Duration::from_secs(1));
    }
    tier.set("config:main", 99);

    assert_eq!(tier.sweep(), 0);

    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(tier.sweep(), 5);
    assert_eq!(tier.len(), 1);
    assert_eq!(tier.get("config:main"), Some(99));
    assert_eq!(tier.sweep(), 0);
    assert!(tier.is_consistent());
}

#[tokio::test(start_paused = true)]
async fn test_hot_tier_snapshot_skips_expired() {
    let tier = HotTier::new();
    tier.set_with_ttl("a", 1, Duration::from_secs(1));
    tier.set_with_ttl("b", 2, Duration::from_secs(100));

    tokio::time::advance(Duration::from_secs(2)).await;
    let snapshot = tier.snapshot();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].key, "b");
    assert_eq!(snapshot[0].value, 2);
    assert_eq!(tier.len(), 2, "snapshot does not evict");
}

#[tokio::test(start_paused = true)]
async fn test_hot_tier_tombstone_lifecycle() {
    let tier: HotTier<u8> = HotTier::new();
    tier.tombstone("k", Duration::from_secs(30));
    assert!(tier.is_tombstoned("k"));

    tokio::time::advance(Duration::from_secs(31)).await;
    assert!(!tier.is_tombstoned("k"));
}

#[test]
fn test_hot_tier_set_clears_tombstone() {
    let tier = HotTier::new();
    tier.tombstone("k", Duration::from_secs(30));
    tier.set("k", 1u8);

    assert!(!tier.is_tombstoned("k"));
    assert_eq!(tier.get("k"), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_hot_tier_sweep_drops_expired_tombstones() {
    let tier: HotTier<u8> = HotTier::new();
    tier.tombstone("gone", Duration::from_secs(1));
    tier.tombstone("kept", Duration::from_secs(60));

    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(tier.sweep(), 0, "tombstones are not counted as evictions");
    assert!(tier.is_tombstoned("kept"));
    assert!(!tier.is_tombstoned("gone"));
}

#[test]
fn test_hot_tier_clear() {
    let tier = HotTier::new();
    tier.set("a", 1);
    tier.set("b", 2);
    tier.tombstone("c", Duration::from_secs(5));

    tier.clear();
    assert!(tier.is_empty());
    assert!(!tier.is_tombstoned("c"));
}

#[test]
fn test_hot_tier_debug_reports_counts() {
    let tier = HotTier::new();
    tier.set("a", 1);
    let debug = format!("{tier:?}");
    assert!(debug.contains("HotTier"));
    assert!(debug.contains("entries: 1"));
}

#[test]
fn test_hot_tier_set_if_unchanged_stores_when_untouched() {
    let tier = HotTier::new();
    let generation = tier.generation();

    assert!(tier.set_if_unchanged("k", 7u8, generation));
    assert_eq!(tier.get("k"), Some(7));
}

#[test]
fn test_hot_tier_set_if_unchanged_rejects_after_delete() {
    let tier: HotTier<u8> = HotTier::new();
    let generation = tier.generation();

    tier.delete("k");

    assert!(!tier.is_unchanged("k", generation));
    assert!(!tier.set_if_unchanged("k", 1, generation));
    assert!(tier.get("k").is_none());
}

#[test]
fn test_hot_tier_set_if_unchanged_keeps_newer_write() {
    let tier = HotTier::new();
    let generation = tier.generation();

    tier.set("k", 2u8);

    assert!(!tier.set_if_unchanged("k", 1, generation));
    assert_eq!(tier.get("k"), Some(2));
}

#[test]
fn test_hot_tier_other_keys_do_not_block_promotion() {
    let tier = HotTier::new();
    let generation = tier.generation();

    tier.set("other", 9u8);
    tier.delete("another");

    assert!(tier.set_if_unchanged("k", 1, generation));
}

#[test]
fn test_hot_tier_set_if_unchanged_respects_tombstone() {
    let tier: HotTier<u8> = HotTier::new();
    tier.tombstone("k", Duration::from_secs(60));
    let generation = tier.generation();

    assert!(!tier.set_if_unchanged("k", 1, generation));
    assert!(tier.clear_tombstone("k"));
    assert!(tier.set_if_unchanged("k", 1, generation));
}

#[tokio::test(start_paused = true)]
async fn test_hot_tier_pruned_generations_stay_conservative() {
    let tier: HotTier<u8> = HotTier::new();
    let generation = tier.generation();

    tier.set_with_ttl("k", 1, Duration::from_secs(1));
    tier.delete("k");
    tokio::time::advance(Duration::from_secs(2)).await;
    tier.sweep();

    assert!(!tier.set_if_unchanged("k", 1, generation));
    assert!(tier.set_if_unchanged("k", 1, tier.generation()));
}

#[test]
fn test_hot_tier_oversized_ttl_does_not_overflow() {
    let tier = HotTier::new();
    tier.set_with_ttl("k", 1u8, Duration::from_secs(u64::MAX));
    tier.tombstone("gone", Duration::MAX);

    assert_eq!(tier.get("k"), Some(1));
    assert!(tier.is_tombstoned("gone"));
    assert_eq!(tier.sweep(), 0);
}
