//! Cache Sweep Task
//!
//! Background task that periodically deletes expired cache entries so the
//! durable store does not fill up with stale responses between reads.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
pub fn spawn_cleanup_task(cache: Arc<Mutex<CacheStore>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.lock().purge_expired();

            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStorage;
    use crate::clock::ManualClock;

    fn shared_cache() -> (Arc<Mutex<CacheStore>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let store = CacheStore::new(
            Box::new(MemoryStorage::new(100_000)),
            clock.clone(),
            50,
            100_000,
        );
        (Arc::new(Mutex::new(store)), clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_removes_expired_entries() {
        let (cache, clock) = shared_cache();
        cache.lock().set("expire_soon", "value", 1);
        cache.lock().set("long_lived", "value", 3_600);
        clock.advance(Duration::from_secs(2));

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(1_500)).await;

        assert!(!cache.lock().contains("expire_soon"));
        assert!(cache.lock().contains("long_lived"));

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_can_be_aborted() {
        let (cache, _) = shared_cache();
        let handle = spawn_cleanup_task(cache, Duration::from_secs(1));

        handle.abort();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
