//! Gridiron Feed - NFL data-access layer
//!
//! Fetches NFL statistics, rosters, schedules, scores and odds from public
//! sports endpoints with TTL caching, rate limiting, retries and request
//! coalescing; extracts typed domain records; tracks live games; and serves
//! page-ready collections over a local JSON API.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod managers;
pub mod models;
pub mod prediction;
pub mod scoring;
pub mod service;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{Error, Result};
pub use service::NflDataService;
pub use tasks::spawn_cleanup_task;
