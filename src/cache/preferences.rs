//! Preference Store Module
//!
//! Long-lived user state (saved lineup, betting preferences) kept in the
//! same envelope format as the response cache, without expiry by default.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::cache::{CacheStats, CacheStore};

const SAVED_LINEUP_KEY: &str = "saved_lineup";
const BETTING_PREFS_KEY: &str = "betting_prefs";

/// Cache variant whose TTL may be omitted.
#[derive(Debug)]
pub struct PreferenceStore {
    store: CacheStore,
}

impl PreferenceStore {
    pub fn new(store: CacheStore) -> Self {
        Self { store }
    }

    /// Stores `value`; `ttl_seconds = None` means never expires.
    pub fn set<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> bool {
        self.store.put(key, value, ttl_seconds)
    }

    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        self.store.get(key)
    }

    pub fn remove(&mut self, key: &str) {
        self.store.remove(key);
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn save_lineup<T: Serialize + ?Sized>(&mut self, lineup: &T) -> bool {
        self.set(SAVED_LINEUP_KEY, lineup, None)
    }

    pub fn lineup<T: DeserializeOwned>(&mut self) -> Option<T> {
        self.get(SAVED_LINEUP_KEY)
    }

    pub fn save_betting_prefs(&mut self, prefs: &Value) -> bool {
        self.set(BETTING_PREFS_KEY, prefs, None)
    }

    /// Saved betting preferences, or an empty object.
    pub fn betting_prefs(&mut self) -> Value {
        self.get(BETTING_PREFS_KEY)
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStorage;
    use crate::clock::ManualClock;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn prefs() -> (PreferenceStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let store = CacheStore::new(
            Box::new(MemoryStorage::new(100_000)),
            clock.clone(),
            10,
            100_000,
        );
        (PreferenceStore::new(store), clock)
    }

    #[test]
    fn test_betting_prefs_default_to_empty_object() {
        let (mut prefs, _) = prefs();
        assert_eq!(prefs.betting_prefs(), json!({}));

        prefs.save_betting_prefs(&json!({"book": "consensus"}));
        assert_eq!(prefs.betting_prefs(), json!({"book": "consensus"}));
    }

    #[test]
    fn test_lineup_survives_long_time() {
        let (mut prefs, clock) = prefs();
        prefs.save_lineup(&json!({"QB": "3139477"}));

        clock.advance(Duration::from_secs(400 * 86_400));

        let lineup: Option<Value> = prefs.lineup();
        assert_eq!(lineup, Some(json!({"QB": "3139477"})));
    }

    #[test]
    fn test_optional_ttl_still_expires() {
        let (mut prefs, clock) = prefs();
        prefs.set("flash", "x", Some(1));

        clock.advance(Duration::from_secs(2));
        assert!(prefs.get::<String>("flash").is_none());
    }

    #[test]
    fn test_remove_and_clear() {
        let (mut prefs, _) = prefs();
        prefs.set("a", &1, None);
        prefs.set("b", &2, None);

        prefs.remove("a");
        assert!(prefs.get::<i32>("a").is_none());

        prefs.clear();
        assert!(prefs.get::<i32>("b").is_none());
    }
}
