//! Fetch Module
//!
//! Rate-limited, retrying, cache-backed access to the upstream JSON API.

mod batch;
mod endpoints;
mod error;
mod pipeline;
mod rate_limit;
mod retry;
mod scripted;
mod transport;
mod ttl;

pub use batch::{batch_fetch, fetch_in_chunks, BatchResult};
pub use endpoints::Endpoints;
pub use error::FetchError;
pub use pipeline::FetchPipeline;
pub use rate_limit::{RateLimitState, RateLimiter};
pub use retry::RetryPolicy;
pub use scripted::ScriptedTransport;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use ttl::TtlPolicy;
