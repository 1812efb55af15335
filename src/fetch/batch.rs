//! Batch Fetch Orchestrator
//!
//! All-settled fan-out over the pipeline, plus a chunked variant that paces
//! large per-team workloads.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::{FetchError, FetchPipeline};
use crate::clock::Clock;

// == Batch Result ==
/// Outcome of one URL in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub url: String,
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl BatchResult {
    fn settled(url: &str, result: Result<Value, FetchError>) -> Self {
        match result {
            Ok(data) => Self {
                url: url.to_string(),
                success: true,
                data: Some(data),
                error: None,
            },
            Err(e) => Self {
                url: url.to_string(),
                success: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }
}

// == Batch Fetch ==
/// Fetches every URL concurrently. One record per input URL, in input order;
/// no failure affects another URL's record.
pub async fn batch_fetch<S: AsRef<str>>(pipeline: &FetchPipeline, urls: &[S]) -> Vec<BatchResult> {
    let calls = urls.iter().map(|url| async move {
        let url = url.as_ref();
        BatchResult::settled(url, pipeline.fetch(url).await)
    });
    let results = join_all(calls).await;

    let failed = results.iter().filter(|r| !r.success).count();
    if failed > 0 {
        warn!("Batch fetch: {} of {} requests failed", failed, results.len());
    }
    results
}

// == Chunked Fetch ==
/// Runs `fetch_one` over `items` in chunks of `chunk_size`, concurrently
/// within a chunk, waiting `delay` between chunks.
///
/// Failed items are logged and skipped; successful outputs are flattened in
/// item order.
pub async fn fetch_in_chunks<I, T, F, Fut>(
    items: &[I],
    chunk_size: usize,
    delay: Duration,
    clock: &dyn Clock,
    fetch_one: F,
) -> Vec<T>
where
    F: Fn(&I) -> Fut,
    Fut: Future<Output = Result<Vec<T>, FetchError>>,
{
    let chunk_size = chunk_size.max(1);
    let chunk_count = items.len().div_ceil(chunk_size);
    let mut collected = Vec::new();

    for (index, chunk) in items.chunks(chunk_size).enumerate() {
        let results = join_all(chunk.iter().map(&fetch_one)).await;
        for result in results {
            match result {
                Ok(batch) => collected.extend(batch),
                Err(e) => warn!("Skipping failed item in chunk {}: {}", index + 1, e),
            }
        }

        if index + 1 < chunk_count {
            info!(
                "Processed chunk {}/{}, waiting {}ms",
                index + 1,
                chunk_count,
                delay.as_millis()
            );
            clock.sleep(delay).await;
        }
    }

    collected
}
