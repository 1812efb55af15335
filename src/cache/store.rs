//! Cache Store Module
//!
//! TTL cache persisting `{value, storedAt, expiresAt}` envelopes into a
//! durable [`Storage`] backend, evicting least-recently-stored entries.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use crate::cache::{CacheEntry, CacheStats, Storage, ITEM_SIZE_FRACTION};
use crate::clock::Clock;

// == Cache Store ==
/// Durable TTL cache with an entry-count cap and per-item size cap.
///
/// Every failure inside the store (quota, serialization, I/O) is logged
/// and degrades to a no-op; nothing here returns an error to the caller.
pub struct CacheStore {
    /// Durable backend
    storage: Box<dyn Storage>,
    /// Time source for storedAt / expiry checks
    clock: Arc<dyn Clock>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries kept after cleanup
    max_items: usize,
    /// Largest serialized envelope accepted
    max_item_bytes: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `storage` - Durable backend
    /// * `clock` - Time source
    /// * `max_items` - Entries kept by cleanup
    /// * `max_total_bytes` - Total quota; a single item may use a tenth of it
    pub fn new(
        storage: Box<dyn Storage>,
        clock: Arc<dyn Clock>,
        max_items: usize,
        max_total_bytes: usize,
    ) -> Self {
        Self {
            storage,
            clock,
            stats: CacheStats::new(),
            max_items: max_items.max(1),
            max_item_bytes: (max_total_bytes as f64 * ITEM_SIZE_FRACTION) as usize,
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl_seconds`.
    ///
    /// Returns false when the write was skipped. A zero TTL is rejected since
    /// it would produce an entry that is already expired.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T, ttl_seconds: u64) -> bool {
        if ttl_seconds == 0 {
            warn!("Refusing to cache {} with zero TTL", key);
            self.stats.record_rejected_write();
            return false;
        }
        self.put(key, value, Some(ttl_seconds))
    }

    // == Put ==
    /// Stores `value` under `key`; `None` TTL never expires.
    ///
    /// Overwrites any existing entry for `key`. Cleanup runs before writing
    /// so a new key never pushes the store past `max_items`.
    pub fn put<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> bool {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                error!("Error serializing cache value for {}: {}", key, e);
                self.stats.record_rejected_write();
                return false;
            }
        };

        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl_seconds);
        let serialized = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                error!("Error serializing cache entry for {}: {}", key, e);
                self.stats.record_rejected_write();
                return false;
            }
        };

        if serialized.len() > self.max_item_bytes {
            warn!(
                "Item too large to cache: {} ({} bytes, limit {})",
                key,
                serialized.len(),
                self.max_item_bytes
            );
            self.stats.record_rejected_write();
            return false;
        }

        let is_overwrite = self.storage.get_item(key).is_some();
        let keep = if is_overwrite {
            self.max_items
        } else {
            self.max_items - 1
        };
        self.evict_beyond(keep);

        match self.storage.set_item(key, serialized) {
            Ok(()) => {
                match ttl_seconds {
                    Some(ttl) => debug!("Cached item {}, expires in {}s", key, ttl),
                    None => debug!("Cached item {} without expiry", key),
                }
                true
            }
            Err(e) => {
                error!("Error caching item {}: {}", key, e);
                self.stats.record_rejected_write();
                false
            }
        }
    }

    // == Get ==
    /// Retrieves the value stored under `key`.
    ///
    /// Returns None when absent, expired (the entry is deleted), or when the
    /// stored value no longer deserializes into `T`.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let Some(raw) = self.storage.get_item(key) else {
            debug!("Cache miss for {}", key);
            self.stats.record_miss();
            return None;
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                error!("Error reading cache entry {}: {}", key, e);
                self.remove(key);
                self.stats.record_miss();
                return None;
            }
        };

        if entry.is_expired(self.clock.now_ms()) {
            debug!("Cache expired for {}", key);
            self.remove(key);
            self.stats.record_expiration();
            return None;
        }

        match serde_json::from_value(entry.value) {
            Ok(value) => {
                debug!("Cache hit for {}", key);
                self.stats.record_hit();
                Some(value)
            }
            Err(e) => {
                warn!("Cached value for {} has unexpected shape: {}", key, e);
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Removes `key` if present.
    pub fn remove(&mut self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            error!("Error removing cache entry {}: {}", key, e);
        }
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        if let Err(e) = self.storage.clear() {
            error!("Error clearing cache: {}", e);
        }
    }

    // == Cleanup ==
    /// Keeps only the newest `max_items` entries by storedAt.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        self.evict_beyond(self.max_items)
    }

    /// Deletes every expired or unreadable entry.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let stale: Vec<String> = self
            .storage
            .keys()
            .into_iter()
            .filter(|key| {
                self.storage
                    .get_item(key)
                    .and_then(|raw| serde_json::from_str::<CacheEntry>(&raw).ok())
                    .map(|entry| entry.is_expired(now))
                    .unwrap_or(true)
            })
            .collect();

        for key in &stale {
            self.remove(key);
            self.stats.record_expiration();
        }
        stale.len()
    }

    fn evict_beyond(&mut self, keep: usize) -> usize {
        let keys = self.storage.keys();
        if keys.len() <= keep {
            return 0;
        }

        let mut aged: Vec<(String, u64)> = keys
            .into_iter()
            .map(|key| {
                // unreadable envelopes sort as oldest
                let stored_at = self
                    .storage
                    .get_item(&key)
                    .and_then(|raw| serde_json::from_str::<CacheEntry>(&raw).ok())
                    .map(|entry| entry.stored_at)
                    .unwrap_or(0);
                (key, stored_at)
            })
            .collect();
        aged.sort_by(|a, b| b.1.cmp(&a.1));

        let mut removed = 0;
        for (key, _) in aged.into_iter().skip(keep) {
            match self.storage.remove_item(&key) {
                Ok(()) => removed += 1,
                Err(e) => warn!("Storage cleanup failed for {}: {}", key, e),
            }
        }

        if removed > 0 {
            debug!("Cache cleanup evicted {} entries", removed);
            self.stats.record_evictions(removed);
        }
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.storage.keys().len();
        stats.used_bytes = self.storage.used_bytes();
        stats
    }

    // == Length ==
    /// Returns the current number of stored entries (expired ones included).
    pub fn len(&self) -> usize {
        self.storage.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.storage.get_item(key).is_some()
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.len())
            .field("max_items", &self.max_items)
            .field("max_item_bytes", &self.max_item_bytes)
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStorage;
    use crate::clock::ManualClock;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn store_with(max_items: usize, quota: usize) -> (CacheStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let store = CacheStore::new(
            Box::new(MemoryStorage::new(quota)),
            clock.clone(),
            max_items,
            quota,
        );
        (store, clock)
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with(10, 100_000);

        assert!(store.set("key1", "x", 5));
        let value: Option<String> = store.get("key1");

        assert_eq!(value.as_deref(), Some("x"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = store_with(10, 100_000);

        assert!(store.get::<Value>("nonexistent").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_ttl_expiration_removes_entry() {
        let (mut store, clock) = store_with(10, 100_000);

        store.set("key1", "x", 5);
        assert_eq!(store.get::<String>("key1").as_deref(), Some("x"));

        clock.advance(Duration::from_secs(6));

        assert!(store.get::<String>("key1").is_none());
        assert!(!store.contains("key1"), "Expired entry should be deleted");
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_overwrite() {
        let (mut store, _) = store_with(10, 100_000);

        store.set("key1", &json!({"v": 1}), 60);
        store.set("key1", &json!({"v": 2}), 60);

        assert_eq!(store.get::<Value>("key1"), Some(json!({"v": 2})));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_evicts_oldest_stored() {
        let (mut store, clock) = store_with(3, 100_000);

        for key in ["key1", "key2", "key3", "key4"] {
            store.set(key, key, 300);
            clock.advance(Duration::from_millis(1));
        }

        assert_eq!(store.len(), 3);
        assert!(!store.contains("key1"));
        assert!(store.contains("key2"));
        assert!(store.contains("key4"));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_overwrite_at_capacity_evicts_nothing() {
        let (mut store, clock) = store_with(2, 100_000);

        store.set("a", "1", 300);
        clock.advance(Duration::from_millis(1));
        store.set("b", "2", 300);
        clock.advance(Duration::from_millis(1));
        store.set("a", "3", 300);

        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_rejects_oversized_item() {
        let (mut store, _) = store_with(10, 1_000);

        let big = "x".repeat(200);
        assert!(!store.set("big", &big, 60));
        assert!(store.is_empty());
        assert_eq!(store.stats().rejected_writes, 1);
    }

    #[test]
    fn test_store_absorbs_quota_failure() {
        // per-item cap is 100 bytes, the quota fills up long before max_items
        let (mut store, _) = store_with(20, 1_000);
        let mut stored = 0;
        for i in 0..30 {
            if store.set(&format!("k{}", i), &"y".repeat(40), 60) {
                stored += 1;
            }
        }

        assert!(stored < 30);
        assert!(store.stats().rejected_writes > 0);
        assert!(store.stats().used_bytes <= 1_000);
    }

    #[test]
    fn test_store_rejects_zero_ttl() {
        let (mut store, _) = store_with(10, 100_000);
        assert!(!store.set("k", "v", 0));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_put_without_ttl_never_expires() {
        let (mut store, clock) = store_with(10, 100_000);

        store.put("prefs", &json!({"units": "american"}), None);
        clock.advance(Duration::from_secs(10 * 365 * 86_400));

        assert!(store.get::<Value>("prefs").is_some());
    }

    #[test]
    fn test_cleanup_keeps_newest() {
        let clock = Arc::new(ManualClock::new(0));
        let mut storage = MemoryStorage::new(100_000);
        for (i, key) in ["old", "mid", "new"].iter().enumerate() {
            let entry = CacheEntry::new(json!(i), i as u64 * 10, Some(60));
            storage
                .set_item(key, serde_json::to_string(&entry).unwrap())
                .unwrap();
        }
        let mut store = CacheStore::new(Box::new(storage), clock, 2, 100_000);

        assert_eq!(store.cleanup(), 1);
        assert!(!store.contains("old"));
        assert!(store.contains("mid"));
        assert!(store.contains("new"));
    }

    #[test]
    fn test_get_drops_corrupt_envelope() {
        let clock = Arc::new(ManualClock::new(0));
        let mut storage = MemoryStorage::new(100_000);
        storage.set_item("bad", "{oops".to_string()).unwrap();
        let mut store = CacheStore::new(Box::new(storage), clock, 10, 100_000);

        assert!(store.get::<Value>("bad").is_none());
        assert!(!store.contains("bad"));
    }

    #[test]
    fn test_purge_expired_keeps_live_entries() {
        let (mut store, clock) = store_with(10, 100_000);
        store.set("short", "a", 5);
        store.set("long", "b", 3_600);
        store.put("forever", "c", None);

        clock.advance(Duration::from_secs(10));

        assert_eq!(store.purge_expired(), 1);
        assert!(!store.contains("short"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().expirations, 1);
    }
}
