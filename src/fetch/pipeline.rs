//! Resilient Fetch Pipeline
//!
//! Cache lookup, then rate-limited GET with exponential-backoff retries,
//! then cache store. Concurrent callers for the same uncached URL share a
//! single in-flight request.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::{FetchError, HttpResponse, HttpTransport, RateLimiter, RetryPolicy, TtlPolicy};
use crate::cache::CacheStore;
use crate::clock::Clock;

type SharedFetch = Shared<BoxFuture<'static, Result<Value, FetchError>>>;

// == Fetch Pipeline ==
/// Cheaply cloneable handle to one session's request pipeline.
#[derive(Clone)]
pub struct FetchPipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<Mutex<CacheStore>>,
    limiter: RateLimiter,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    ttl: TtlPolicy,
    in_flight: Mutex<HashMap<String, SharedFetch>>,
}

impl FetchPipeline {
    // == Constructor ==
    /// Creates a pipeline over the given collaborators.
    ///
    /// # Arguments
    /// * `transport` - Performs the HTTP GET
    /// * `cache` - Response cache keyed by URL (shared with synthetic-key users)
    /// * `limiter` - Gate every outbound attempt passes through
    /// * `clock` - Used for backoff waits
    /// * `retry` - Default attempt budget and backoff
    /// * `ttl` - Lifetime table for calls that do not pass a TTL
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        cache: Arc<Mutex<CacheStore>>,
        limiter: RateLimiter,
        clock: Arc<dyn Clock>,
        retry: RetryPolicy,
        ttl: TtlPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(PipelineInner {
                transport,
                cache,
                limiter,
                clock,
                retry,
                ttl,
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    // == Fetch ==
    /// Cache-or-fetch `url` with the URL-derived TTL and default retries.
    pub async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        self.fetch_with(url, None, None).await
    }

    /// Cache-or-fetch `url`.
    ///
    /// # Arguments
    /// * `ttl_seconds` - Cache lifetime; derived from the URL when None
    /// * `max_retries` - Attempt budget; the pipeline default when None
    ///
    /// A caller that joins an already in-flight request for the same URL
    /// receives that request's outcome, whatever TTL and budget it used.
    pub async fn fetch_with(
        &self,
        url: &str,
        ttl_seconds: Option<u64>,
        max_retries: Option<u32>,
    ) -> Result<Value, FetchError> {
        let ttl = ttl_seconds.unwrap_or_else(|| self.inner.ttl.ttl_for(url));
        let retry = match max_retries {
            Some(n) => self.inner.retry.with_max_attempts(n),
            None => self.inner.retry,
        };

        if let Some(hit) = self.inner.cache.lock().get::<Value>(url) {
            debug!("Cache hit for {}", url);
            return Ok(hit);
        }

        let pending = {
            let mut in_flight = self.inner.in_flight.lock();
            match in_flight.get(url) {
                Some(pending) => {
                    debug!("Joining in-flight request for {}", url);
                    pending.clone()
                }
                None => {
                    info!("Cache miss for {}", url);
                    let inner = self.inner.clone();
                    let key = url.to_string();
                    let pending = async move {
                        let result = inner.fetch_uncached(&key, ttl, retry).await;
                        inner.in_flight.lock().remove(&key);
                        result
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(url.to_string(), pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Fetches `url` and deserializes it into `T`.
    pub async fn fetch_as<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let value = self.fetch(url).await?;
        serde_json::from_value(value).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    // == Synthetic Keys ==
    /// Reads a cached value stored under a non-URL key.
    pub fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.inner.cache.lock().get(key)
    }

    /// Stores a derived value under a non-URL key.
    pub fn store<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_seconds: u64) -> bool {
        self.inner.cache.lock().set(key, value, ttl_seconds)
    }

    /// Drops a cached response or derived value so the next read refetches.
    pub fn invalidate(&self, key: &str) {
        self.inner.cache.lock().remove(key);
    }

    pub fn cache(&self) -> &Arc<Mutex<CacheStore>> {
        &self.inner.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.inner.limiter
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.inner.clock
    }

    /// Number of distinct URLs currently being fetched.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.lock().len()
    }
}

impl PipelineInner {
    async fn fetch_uncached(
        &self,
        url: &str,
        ttl: u64,
        retry: RetryPolicy,
    ) -> Result<Value, FetchError> {
        let mut attempt = 0;
        loop {
            self.limiter.throttle().await;

            let outcome = match self.transport.get(url).await {
                Ok(response) => decode_response(url, response),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(data) => {
                    self.cache.lock().set(url, &data, ttl);
                    debug!("Cached data for {} (expires in {}s)", url, ttl);
                    return Ok(data);
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} failed for {}: {}",
                        attempt + 1,
                        retry.max_attempts,
                        url,
                        e
                    );
                    if retry.is_last(attempt) {
                        error!("Giving up on {} after {} attempts", url, retry.max_attempts);
                        return Err(e);
                    }
                    let wait = retry.backoff(attempt);
                    info!("Waiting {}ms before retry", wait.as_millis());
                    self.clock.sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Classifies one upstream response as data or a retryable failure.
fn decode_response(url: &str, response: HttpResponse) -> Result<Value, FetchError> {
    if !response.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status,
        });
    }
    if response.body.trim().is_empty() {
        return Err(FetchError::EmptyBody {
            url: url.to_string(),
        });
    }

    let data: Value = serde_json::from_str(&response.body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if data.is_null() {
        return Err(FetchError::EmptyBody {
            url: url.to_string(),
        });
    }

    if let Some(err) = data.get("error").filter(|e| !e.is_null()) {
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(FetchError::Application {
            url: url.to_string(),
            message,
        });
    }

    Ok(data)
}

impl std::fmt::Debug for FetchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchPipeline")
            .field("retry", &self.inner.retry)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}
