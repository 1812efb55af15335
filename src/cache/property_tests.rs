//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check capacity, round-trip, overwrite, eviction order and
//! TTL behavior of the cache store.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::cache::{CacheStore, MemoryStorage};
use crate::clock::ManualClock;

// == Test Configuration ==
const TEST_QUOTA: usize = 4_800_000;
const TEST_TTL: u64 = 300;

fn new_store(max_items: usize) -> (CacheStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let store = CacheStore::new(
        Box::new(MemoryStorage::new(TEST_QUOTA)),
        clock.clone(),
        max_items,
        TEST_QUOTA,
    );
    (store, clock)
}

// == Strategies ==
/// Generates cache keys shaped like request URLs or synthetic names
fn valid_key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_]{1,24}",
        "[0-9]{1,5}".prop_map(|id| format!("https://site.api/teams/{}/roster", id)),
    ]
}

/// Generates small JSON payloads
fn valid_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 ]{1,64}".prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        prop::collection::vec(any::<u16>(), 0..8).prop_map(Value::from),
    ]
}

fn unique(keys: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing then reading before expiry returns the stored value.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let (mut store, _) = new_store(50);

        prop_assert!(store.set(&key, &value, TEST_TTL));
        let retrieved: Option<Value> = store.get(&key);
        prop_assert_eq!(retrieved, Some(value));
    }

    // A second write under the same key replaces the first.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let (mut store, _) = new_store(50);

        store.set(&key, &value1, TEST_TTL);
        store.set(&key, &value2, TEST_TTL);

        prop_assert_eq!(store.get::<Value>(&key), Some(value2));
        prop_assert_eq!(store.len(), 1);
    }

    // The store never holds more than max_items entries.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((valid_key_strategy(), valid_value_strategy()), 1..120)
    ) {
        let max_items = 20;
        let (mut store, clock) = new_store(max_items);

        for (key, value) in entries {
            store.set(&key, &value, TEST_TTL);
            clock.advance(Duration::from_millis(1));
            prop_assert!(
                store.len() <= max_items,
                "Cache size {} exceeds max {}",
                store.len(),
                max_items
            );
        }
    }

    // Inserting max_items + 1 distinct keys keeps exactly the newest max_items.
    #[test]
    fn prop_eviction_keeps_most_recently_stored(
        keys in prop::collection::vec(valid_key_strategy(), 3..30)
    ) {
        let keys = unique(keys);
        prop_assume!(keys.len() >= 3);

        let max_items = keys.len() - 1;
        let (mut store, clock) = new_store(max_items);

        for key in &keys {
            store.set(key, key.as_str(), TEST_TTL);
            clock.advance(Duration::from_millis(1));
        }

        prop_assert_eq!(store.len(), max_items);
        prop_assert!(!store.contains(&keys[0]), "Oldest key should be evicted");
        for key in keys.iter().skip(1) {
            prop_assert!(store.contains(key), "Key '{}' should be retained", key);
        }
    }

    // Before storedAt + ttl the value is returned; from then on it is gone.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl in 1u64..3_600
    ) {
        let (mut store, clock) = new_store(50);
        store.set(&key, &value, ttl);

        clock.advance(Duration::from_millis(ttl * 1000 - 1));
        prop_assert_eq!(store.get::<Value>(&key), Some(value));

        clock.advance(Duration::from_millis(1));
        prop_assert!(store.get::<Value>(&key).is_none());
        prop_assert!(!store.contains(&key));
    }
}
