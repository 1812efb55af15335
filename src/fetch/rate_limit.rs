//! Rate Limiter Module
//!
//! Fixed-window request counter with a pacing delay before every pass.
//!
//! When the window quota is exhausted the caller waits out the rest of the
//! current window, a fresh window starts, and the call is counted as the
//! first pass of that new window. No window ever sees more than
//! `max_requests` passes.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::Clock;

// == Rate Limit State ==
/// Counter for the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitState {
    pub request_count: u32,
    pub window_start: u64,
    pub max_requests: u32,
    pub window_duration_ms: u64,
    pub min_delay_ms: u64,
}

impl RateLimitState {
    fn window_elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.window_start)
    }

    fn reset(&mut self, now_ms: u64) {
        self.request_count = 0;
        self.window_start = now_ms;
    }
}

// == Rate Limiter ==
/// Serializes outbound calls through a window quota and pacing delay.
///
/// The pass gate is held across the waits, so concurrent callers pass one
/// at a time and consecutive passes are at least `min_delay_ms` apart. The
/// counters sit behind their own short-lived lock and can be read while a
/// caller is waiting.
pub struct RateLimiter {
    gate: tokio::sync::Mutex<()>,
    state: Mutex<RateLimitState>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Creates a limiter whose first window starts now.
    pub fn new(
        clock: Arc<dyn Clock>,
        max_requests: u32,
        window_duration_ms: u64,
        min_delay_ms: u64,
    ) -> Self {
        let state = RateLimitState {
            request_count: 0,
            window_start: clock.now_ms(),
            max_requests: max_requests.max(1),
            window_duration_ms,
            min_delay_ms,
        };
        Self {
            gate: tokio::sync::Mutex::new(()),
            state: Mutex::new(state),
            clock,
        }
    }

    // == Throttle ==
    /// Waits until the caller may issue one request.
    pub async fn throttle(&self) {
        let _pass = self.gate.lock().await;

        let quota_wait = {
            let mut state = self.state.lock();
            let now = self.clock.now_ms();
            if state.window_elapsed(now) > state.window_duration_ms {
                debug!("Rate limit window reset");
                state.reset(now);
            }

            if state.request_count >= state.max_requests {
                let remaining = state
                    .window_duration_ms
                    .saturating_sub(state.window_elapsed(now));
                info!(
                    "Rate limit reached ({} requests), waiting {}ms",
                    state.max_requests, remaining
                );
                Some(remaining)
            } else {
                None
            }
        };

        if let Some(remaining) = quota_wait {
            if remaining > 0 {
                self.clock.sleep(Duration::from_millis(remaining)).await;
            }
            self.state.lock().reset(self.clock.now_ms());
        }

        let min_delay_ms = self.state.lock().min_delay_ms;
        if min_delay_ms > 0 {
            self.clock.sleep(Duration::from_millis(min_delay_ms)).await;
        }
        self.state.lock().request_count += 1;
    }

    /// Snapshot of the current window.
    pub fn state(&self) -> RateLimitState {
        *self.state.lock()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, SystemClock};

    #[tokio::test]
    async fn test_paces_every_request() {
        let clock = Arc::new(ManualClock::new(0));
        let limiter = RateLimiter::new(clock.clone(), 20, 30_000, 500);

        limiter.throttle().await;
        limiter.throttle().await;

        assert_eq!(clock.sleeps(), vec![Duration::from_millis(500); 2]);
        assert_eq!(limiter.state().request_count, 2);
    }

    #[tokio::test]
    async fn test_quota_exhaustion_waits_for_window_reset() {
        let clock = Arc::new(ManualClock::new(0));
        let limiter = RateLimiter::new(clock.clone(), 3, 1_000, 10);

        let mut passes = Vec::new();
        for _ in 0..4 {
            limiter.throttle().await;
            passes.push(clock.now_ms());
        }

        assert_eq!(&passes[..3], &[10, 20, 30]);
        // fourth call waits out the window (970ms) and then paces again
        assert_eq!(passes[3], 1_010);
        let state = limiter.state();
        assert_eq!(state.window_start, 1_000);
        assert_eq!(state.request_count, 1);
    }

    #[tokio::test]
    async fn test_no_window_exceeds_quota() {
        let clock = Arc::new(ManualClock::new(0));
        let limiter = RateLimiter::new(clock.clone(), 5, 1_000, 7);

        let mut passes = Vec::new();
        for _ in 0..40 {
            limiter.throttle().await;
            passes.push(clock.now_ms());
        }

        for (i, start) in passes.iter().enumerate() {
            let in_window = passes[i..]
                .iter()
                .take_while(|t| **t < start + 1_000)
                .count();
            assert!(in_window <= 5, "window starting at {} saw {}", start, in_window);
        }
    }

    #[tokio::test]
    async fn test_idle_window_resets_counter() {
        let clock = Arc::new(ManualClock::new(0));
        let limiter = RateLimiter::new(clock.clone(), 2, 1_000, 0);

        limiter.throttle().await;
        limiter.throttle().await;
        clock.advance(Duration::from_millis(1_001));
        limiter.throttle().await;

        assert!(clock.sleeps().is_empty(), "no wait expected after idle reset");
        assert_eq!(limiter.state().request_count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_are_serialized() {
        let clock = Arc::new(ManualClock::new(0));
        let limiter = Arc::new(RateLimiter::new(clock.clone(), 100, 60_000, 50));

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.throttle().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(clock.now_ms(), 250);
        assert_eq!(limiter.state().request_count, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_readable_while_caller_waits_for_window() {
        let limiter = Arc::new(RateLimiter::new(Arc::new(SystemClock), 1, 30_000, 0));
        limiter.throttle().await;

        let waiting = {
            let limiter = limiter.clone();
            tokio::spawn(async move { limiter.throttle().await })
        };
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        assert!(!waiting.is_finished());
        let state = limiter.state();
        assert_eq!(state.request_count, 1);
        assert_eq!(state.max_requests, 1);

        waiting.await.unwrap();
        assert_eq!(limiter.state().request_count, 1);
    }
}
