//! Data Service
//!
//! [`NflDataService`] is the per-session context object: it owns the fetch
//! pipeline (cache + rate limiter), the preference store and the live
//! tracker, and exposes the typed queries the page managers build on.

mod games;
mod players;
mod teams;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{CacheStats, CacheStore, FileStorage, MemoryStorage, PreferenceStore, Storage};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::{
    batch_fetch, BatchResult, Endpoints, FetchPipeline, HttpTransport, RateLimitState,
    RateLimiter, RetryPolicy, TtlPolicy,
};
use crate::models::LiveEvent;
use crate::tasks::{spawn_cleanup_task, EventBus, LiveTracker, Subscription};

/// Synthetic cache key of the processed team list.
pub const ALL_TEAMS_KEY: &str = "all_teams";
/// Lifetime of synthetic roster and team-list entries.
pub const ROSTER_CACHE_SECS: u64 = 86_400;

// == NFL Data Service ==
#[derive(Clone)]
pub struct NflDataService {
    pipeline: FetchPipeline,
    endpoints: Endpoints,
    preferences: Arc<Mutex<PreferenceStore>>,
    tracker: LiveTracker,
    roster_batch_size: usize,
    roster_batch_delay: Duration,
    cleanup_interval: Duration,
}

impl NflDataService {
    // == Constructor ==
    /// Wires a service from configuration and its external collaborators.
    ///
    /// # Arguments
    /// * `config` - Limits, TTLs, base URLs and intervals
    /// * `transport` - HTTP GET implementation
    /// * `clock` - Time source for cache expiry, pacing and backoff
    /// * `cache_storage` - Durable backend of the response cache
    /// * `preference_storage` - Durable backend of user preferences
    pub fn new(
        config: &Config,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
        cache_storage: Box<dyn Storage>,
        preference_storage: Box<dyn Storage>,
    ) -> Self {
        let cache = CacheStore::new(
            cache_storage,
            clock.clone(),
            config.max_cache_items,
            config.max_cache_bytes,
        );
        let limiter = RateLimiter::new(
            clock.clone(),
            config.max_requests,
            config.reset_interval_ms,
            config.queue_delay_ms,
        );
        let pipeline = FetchPipeline::new(
            transport,
            Arc::new(Mutex::new(cache)),
            limiter,
            clock.clone(),
            RetryPolicy::default().with_max_attempts(config.max_retries),
            TtlPolicy::new(config.ttl),
        );

        // preferences are few and long-lived; they share only the byte quota
        let preferences = PreferenceStore::new(CacheStore::new(
            preference_storage,
            clock,
            usize::MAX,
            config.max_cache_bytes,
        ));

        let endpoints = Endpoints::from_config(config);
        let tracker = LiveTracker::new(
            pipeline.clone(),
            endpoints.clone(),
            EventBus::new(),
            config.live_poll_interval(),
        );

        Self {
            pipeline,
            endpoints,
            preferences: Arc::new(Mutex::new(preferences)),
            tracker,
            roster_batch_size: config.roster_batch_size,
            roster_batch_delay: config.roster_batch_delay(),
            cleanup_interval: config.cleanup_interval(),
        }
    }

    /// Real-clock service whose stores live under `config.cache_dir`, or in
    /// memory when it is unset.
    pub fn from_config(config: &Config, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self::new(
            config,
            transport,
            Arc::new(SystemClock),
            open_storage(config, "response_cache")?,
            open_storage(config, "preferences")?,
        ))
    }

    // == Accessors ==
    pub fn pipeline(&self) -> &FetchPipeline {
        &self.pipeline
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn preferences(&self) -> &Arc<Mutex<PreferenceStore>> {
        &self.preferences
    }

    pub fn tracker(&self) -> &LiveTracker {
        &self.tracker
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.pipeline.cache().lock().stats()
    }

    pub fn rate_limit_state(&self) -> RateLimitState {
        self.pipeline.limiter().state()
    }

    // == Batch ==
    /// All-settled concurrent fetch of `urls`.
    pub async fn batch_fetch<S: AsRef<str>>(&self, urls: &[S]) -> Vec<BatchResult> {
        batch_fetch(&self.pipeline, urls).await
    }

    // == Live Updates ==
    pub fn start_live_tracking(&self, game_id: &str) -> bool {
        self.tracker.start_tracking(game_id)
    }

    pub fn stop_live_tracking(&self, game_id: &str) -> bool {
        self.tracker.stop_tracking(game_id)
    }

    /// Registers `callback` for `event_type` ("gameUpdate" or
    /// "predictionUpdate").
    pub fn subscribe<F>(&self, event_type: &str, callback: F) -> Subscription
    where
        F: Fn(&LiveEvent) + Send + Sync + 'static,
    {
        self.tracker.bus().subscribe(event_type, callback)
    }

    /// Starts the periodic expired-entry sweep of the response cache.
    pub fn spawn_maintenance(&self) -> JoinHandle<()> {
        spawn_cleanup_task(self.pipeline.cache().clone(), self.cleanup_interval)
    }

    /// Stops every live tracking task.
    pub fn shutdown(&self) -> usize {
        self.tracker.stop_all()
    }

    async fn fetch(&self, url: &str) -> Result<Value> {
        Ok(self.pipeline.fetch(url).await?)
    }
}

fn open_storage(config: &Config, name: &str) -> Result<Box<dyn Storage>> {
    match &config.cache_dir {
        Some(dir) => {
            let storage = FileStorage::open(dir, name, config.max_cache_bytes)
                .map_err(|e| Error::Storage(format!("{}: {}", name, e)))?;
            info!("Using file store {}", storage.path().display());
            Ok(Box::new(storage))
        }
        None => Ok(Box::new(MemoryStorage::new(config.max_cache_bytes))),
    }
}

impl std::fmt::Debug for NflDataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NflDataService")
            .field("endpoints", &self.endpoints)
            .field("pipeline", &self.pipeline)
            .field("tracker", &self.tracker)
            .finish()
    }
}
