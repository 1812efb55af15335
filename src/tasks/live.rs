//! Live Game Tracker
//!
//! One polling task per tracked game. Each tick fetches the game summary
//! through the pipeline, stores the snapshot, publishes `gameUpdate`, then
//! recomputes the in-game prediction and publishes `predictionUpdate`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use super::EventBus;
use crate::extract::parse_live_snapshot;
use crate::fetch::{Endpoints, FetchError, FetchPipeline};
use crate::models::{LiveEvent, LivePrediction, LiveSnapshot};
use crate::prediction::live_prediction;

/// Cache lifetime of a live summary response.
pub const LIVE_SUMMARY_TTL_SECS: u64 = 30;

#[derive(Debug, Clone)]
struct LiveState {
    snapshot: LiveSnapshot,
    prediction: LivePrediction,
}

// == Live Tracker ==
/// Starts and stops per-game polling tasks.
#[derive(Clone)]
pub struct LiveTracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    pipeline: FetchPipeline,
    endpoints: Endpoints,
    bus: EventBus,
    interval: Duration,
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
    latest: Mutex<HashMap<String, LiveState>>,
}

impl LiveTracker {
    pub fn new(pipeline: FetchPipeline, endpoints: Endpoints, bus: EventBus, interval: Duration) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                pipeline,
                endpoints,
                bus,
                interval,
                tasks: Mutex::new(HashMap::new()),
                latest: Mutex::new(HashMap::new()),
            }),
        }
    }

    // == Start ==
    /// Begins polling `game_id`. Returns false if it is already tracked.
    ///
    /// The first tick fires one interval after the call.
    pub fn start_tracking(&self, game_id: &str) -> bool {
        let mut tasks = self.inner.tasks.lock();
        if tasks.contains_key(game_id) {
            debug!("Game {} is already tracked", game_id);
            return false;
        }

        let inner = self.inner.clone();
        let id = game_id.to_string();
        let handle = tokio::spawn(async move {
            let period = inner.interval;
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(e) = inner.poll_once(&id).await {
                    error!("Error tracking game {}: {}", id, e);
                }
            }
        });

        tasks.insert(game_id.to_string(), handle);
        info!(
            "Started live tracking for game {} every {}ms",
            game_id,
            self.inner.interval.as_millis()
        );
        true
    }

    // == Stop ==
    /// Cancels polling for `game_id` and drops its state. Returns false when
    /// it was not tracked, so a repeated stop is a no-op.
    pub fn stop_tracking(&self, game_id: &str) -> bool {
        let handle = self.inner.tasks.lock().remove(game_id);
        if let Some(handle) = &handle {
            handle.abort();
        }
        self.inner.latest.lock().remove(game_id);

        match handle {
            Some(_) => {
                info!("Stopped live tracking for game {}", game_id);
                true
            }
            None => false,
        }
    }

    /// Stops every tracked game. Returns how many were stopped.
    pub fn stop_all(&self) -> usize {
        let handles: Vec<(String, JoinHandle<()>)> = self.inner.tasks.lock().drain().collect();
        for (game_id, handle) in &handles {
            handle.abort();
            debug!("Aborted live tracking for game {}", game_id);
        }
        self.inner.latest.lock().clear();
        handles.len()
    }

    /// Runs one tick immediately, outside the schedule.
    ///
    /// Only a tracked game keeps the result and notifies subscribers; an
    /// untracked game just gets the polled values back.
    pub async fn poll_once(&self, game_id: &str) -> Result<(LiveSnapshot, LivePrediction), FetchError> {
        self.inner.poll_once(game_id).await
    }

    pub fn is_tracking(&self, game_id: &str) -> bool {
        self.inner.tasks.lock().contains_key(game_id)
    }

    pub fn tracked_games(&self) -> Vec<String> {
        let mut games: Vec<String> = self.inner.tasks.lock().keys().cloned().collect();
        games.sort();
        games
    }

    pub fn latest(&self, game_id: &str) -> Option<LiveSnapshot> {
        self.inner.latest.lock().get(game_id).map(|s| s.snapshot.clone())
    }

    pub fn latest_prediction(&self, game_id: &str) -> Option<LivePrediction> {
        self.inner.latest.lock().get(game_id).map(|s| s.prediction.clone())
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }
}

impl TrackerInner {
    async fn poll_once(&self, game_id: &str) -> Result<(LiveSnapshot, LivePrediction), FetchError> {
        let url = self.endpoints.game_summary(game_id);
        let summary = self
            .pipeline
            .fetch_with(&url, Some(LIVE_SUMMARY_TTL_SECS), None)
            .await?;

        let snapshot = parse_live_snapshot(game_id, &summary);
        let prediction = live_prediction(&snapshot);

        // the tasks lock orders this insert against stop_tracking
        let tracked = {
            let tasks = self.tasks.lock();
            let tracked = tasks.contains_key(game_id);
            if tracked {
                self.latest.lock().insert(
                    game_id.to_string(),
                    LiveState {
                        snapshot: snapshot.clone(),
                        prediction: prediction.clone(),
                    },
                );
            }
            tracked
        };

        if tracked {
            self.bus.emit(&LiveEvent::GameUpdate {
                game_id: game_id.to_string(),
                data: snapshot.clone(),
            });
            self.bus.emit(&LiveEvent::PredictionUpdate {
                game_id: game_id.to_string(),
                predictions: prediction.clone(),
            });
        } else {
            debug!("Polled untracked game {}", game_id);
        }

        Ok((snapshot, prediction))
    }
}

impl std::fmt::Debug for LiveTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveTracker")
            .field("interval", &self.inner.interval)
            .field("tracked", &self.tracked_games())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, MemoryStorage};
    use crate::clock::ManualClock;
    use crate::fetch::{RateLimiter, RetryPolicy, ScriptedTransport, TtlPolicy};
    use serde_json::json;

    const INTERVAL: Duration = Duration::from_secs(30);

    fn summary(home: &str, away: &str) -> serde_json::Value {
        json!({"header": {"competitions": [{
            "status": {"displayClock": "0:00", "period": 2, "type": {"state": "in"}},
            "competitors": [
                {"id": "12", "homeAway": "home", "score": home},
                {"id": "2", "homeAway": "away", "score": away}
            ]
        }]}})
    }

    fn tracker(transport: Arc<ScriptedTransport>) -> (LiveTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let cache = CacheStore::new(
            Box::new(MemoryStorage::new(1_000_000)),
            clock.clone(),
            50,
            1_000_000,
        );
        let pipeline = FetchPipeline::new(
            transport,
            Arc::new(Mutex::new(cache)),
            RateLimiter::new(clock.clone(), 100, 30_000, 0),
            clock.clone(),
            RetryPolicy::default(),
            TtlPolicy::default(),
        );
        let tracker = LiveTracker::new(pipeline, Endpoints::new("http://core", "http://site", 2024, 2), EventBus::new(), INTERVAL);
        (tracker, clock)
    }

    fn recorder(bus: &EventBus) -> Arc<Mutex<Vec<LiveEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        for event_type in [LiveEvent::GAME_UPDATE, LiveEvent::PREDICTION_UPDATE] {
            let events = events.clone();
            bus.subscribe(event_type, move |e| events.lock().push(e.clone()));
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_publishes_game_then_prediction() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_json("http://site/summary?event=401", summary("17", "10"));
        let (tracker, _) = tracker(transport);
        let events = recorder(tracker.bus());

        assert!(tracker.start_tracking("401"));
        tokio::time::sleep(INTERVAL + Duration::from_secs(1)).await;

        let events = events.lock().clone();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type(), LiveEvent::GAME_UPDATE);
        assert_eq!(events[1].event_type(), LiveEvent::PREDICTION_UPDATE);
        match &events[1] {
            LiveEvent::PredictionUpdate { predictions, .. } => {
                assert_eq!(predictions.margin, 7);
                assert_eq!(predictions.projected_total, Some(54.0));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(tracker.latest("401").unwrap().home_score, 17);

        tracker.stop_all();
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_is_noop() {
        let (tracker, _) = tracker(Arc::new(ScriptedTransport::new()));

        assert!(tracker.start_tracking("401"));
        assert!(!tracker.start_tracking("401"));
        assert_eq!(tracker.tracked_games(), vec!["401".to_string()]);

        tracker.stop_all();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let (tracker, _) = tracker(Arc::new(ScriptedTransport::new()));
        tracker.start_tracking("401");

        assert!(tracker.stop_tracking("401"));
        assert!(!tracker.stop_tracking("401"));
        assert!(!tracker.is_tracking("401"));
        assert!(!tracker.stop_tracking("never-tracked"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_does_not_stop_tracking() {
        let url = "http://site/summary?event=401";
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(url, 503, "");
        let (tracker, _) = tracker(transport.clone());
        let events = recorder(tracker.bus());

        tracker.start_tracking("401");
        tokio::time::sleep(INTERVAL * 2 + Duration::from_secs(1)).await;

        // two ticks, three attempts each
        assert_eq!(transport.call_count(url), 6);
        assert!(events.lock().is_empty());
        assert!(tracker.is_tracking("401"));

        transport.respond_json(url, summary("3", "0"));
        tokio::time::sleep(INTERVAL).await;

        assert_eq!(events.lock().len(), 2);
        assert_eq!(tracker.latest("401").unwrap().home_score, 3);

        tracker.stop_all();
    }

    #[tokio::test]
    async fn test_poll_untracked_game_keeps_nothing() {
        let transport = Arc::new(ScriptedTransport::new());
        for id in 0..20 {
            transport.respond_json(&format!("http://site/summary?event={}", id), summary("0", "7"));
        }
        let (tracker, _) = tracker(transport);
        let events = recorder(tracker.bus());

        for id in 0..20 {
            let (snapshot, prediction) = tracker.poll_once(&id.to_string()).await.unwrap();
            assert_eq!(snapshot.away_score, 7);
            assert_eq!(prediction.margin, -7);
        }

        assert!(tracker.tracked_games().is_empty());
        assert!(tracker.inner.latest.lock().is_empty());
        assert!(events.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_tracked_game_stores_and_publishes() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_json("http://site/summary?event=9", summary("0", "7"));
        let (tracker, _) = tracker(transport);
        let events = recorder(tracker.bus());
        tracker.start_tracking("9");

        tracker.poll_once("9").await.unwrap();

        assert_eq!(tracker.latest_prediction("9").unwrap().margin, -7);
        assert_eq!(events.lock().len(), 2);

        tracker.stop_tracking("9");
        assert!(tracker.latest("9").is_none());

        // a tick finishing after the stop does not bring the game back
        tracker.poll_once("9").await.unwrap();
        assert!(tracker.latest("9").is_none());
        assert_eq!(events.lock().len(), 2);
    }
}
