//! Configuration Module
//!
//! Handles loading rate-limit, cache, TTL and polling settings from
//! environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default base URL for season-scoped statistical resources.
pub const DEFAULT_CORE_API_BASE: &str =
    "https://sports.core.api.espn.com/v2/sports/football/leagues/nfl";

/// Default base URL for site-level summary resources.
pub const DEFAULT_SITE_API_BASE: &str =
    "https://site.api.espn.com/apis/site/v2/sports/football/nfl";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Requests allowed per rate-limit window
    pub max_requests: u32,
    /// Rate-limit window length in milliseconds
    pub reset_interval_ms: u64,
    /// Pacing delay before every request in milliseconds
    pub queue_delay_ms: u64,
    /// Maximum number of cached entries
    pub max_cache_items: usize,
    /// Total byte quota of the durable store
    pub max_cache_bytes: usize,
    /// Attempts per URL before a failure becomes terminal
    pub max_retries: u32,
    /// Per-resource-type TTLs
    pub ttl: TtlTable,
    /// Live game poll interval in milliseconds
    pub live_poll_interval_ms: u64,
    /// Teams per roster chunk
    pub roster_batch_size: usize,
    /// Pause between roster chunks in milliseconds
    pub roster_batch_delay_ms: u64,
    /// Interval between expired-entry sweeps in seconds
    pub cleanup_interval_secs: u64,
    /// Season year used in core statistics URLs
    pub season_year: u16,
    /// Season type (1 = preseason, 2 = regular, 3 = postseason)
    pub season_type: u8,
    /// Directory for the file-backed store, None = in-memory
    pub cache_dir: Option<PathBuf>,
    /// Base URL of the core statistics API
    pub core_api_base: String,
    /// Base URL of the site summary API
    pub site_api_base: String,
    /// HTTP server port
    pub server_port: u16,
}

/// TTL in seconds per resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlTable {
    pub roster_secs: u64,
    pub stats_secs: u64,
    pub live_secs: u64,
    pub default_secs: u64,
}

impl Default for TtlTable {
    fn default() -> Self {
        Self {
            roster_secs: 86_400,
            stats_secs: 3_600,
            live_secs: 300,
            default_secs: 3_600,
        }
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_REQUESTS` - Requests per window (default: 20)
    /// - `RESET_INTERVAL_MS` - Window length (default: 30000)
    /// - `QUEUE_DELAY_MS` - Pacing delay (default: 500)
    /// - `MAX_CACHE_ITEMS` - Cached entry limit (default: 50)
    /// - `MAX_CACHE_BYTES` - Store quota (default: 4800000)
    /// - `MAX_RETRIES` - Attempts per URL (default: 3)
    /// - `TTL_ROSTER_SECS`, `TTL_STATS_SECS`, `TTL_LIVE_SECS`, `TTL_DEFAULT_SECS`
    /// - `LIVE_POLL_INTERVAL_MS` - Live tracking interval (default: 30000)
    /// - `ROSTER_BATCH_SIZE` / `ROSTER_BATCH_DELAY_MS` (default: 8 / 5000)
    /// - `CLEANUP_INTERVAL` - Expired-entry sweep interval in seconds (default: 60)
    /// - `SEASON_YEAR` / `SEASON_TYPE` (default: 2024 / 2)
    /// - `CACHE_DIR` - File store directory (default: unset, in-memory)
    /// - `CORE_API_BASE` / `SITE_API_BASE` - Upstream base URLs
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: parse_var("MAX_REQUESTS", defaults.max_requests),
            reset_interval_ms: parse_var("RESET_INTERVAL_MS", defaults.reset_interval_ms),
            queue_delay_ms: parse_var("QUEUE_DELAY_MS", defaults.queue_delay_ms),
            max_cache_items: parse_var("MAX_CACHE_ITEMS", defaults.max_cache_items),
            max_cache_bytes: parse_var("MAX_CACHE_BYTES", defaults.max_cache_bytes),
            max_retries: parse_var("MAX_RETRIES", defaults.max_retries),
            ttl: TtlTable {
                roster_secs: parse_var("TTL_ROSTER_SECS", defaults.ttl.roster_secs),
                stats_secs: parse_var("TTL_STATS_SECS", defaults.ttl.stats_secs),
                live_secs: parse_var("TTL_LIVE_SECS", defaults.ttl.live_secs),
                default_secs: parse_var("TTL_DEFAULT_SECS", defaults.ttl.default_secs),
            },
            live_poll_interval_ms: parse_var(
                "LIVE_POLL_INTERVAL_MS",
                defaults.live_poll_interval_ms,
            ),
            roster_batch_size: parse_var("ROSTER_BATCH_SIZE", defaults.roster_batch_size),
            roster_batch_delay_ms: parse_var(
                "ROSTER_BATCH_DELAY_MS",
                defaults.roster_batch_delay_ms,
            ),
            cleanup_interval_secs: parse_var("CLEANUP_INTERVAL", defaults.cleanup_interval_secs),
            season_year: parse_var("SEASON_YEAR", defaults.season_year),
            season_type: parse_var("SEASON_TYPE", defaults.season_type),
            cache_dir: env::var("CACHE_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            core_api_base: env::var("CORE_API_BASE").unwrap_or(defaults.core_api_base),
            site_api_base: env::var("SITE_API_BASE").unwrap_or(defaults.site_api_base),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
        }
    }

    /// Live game poll interval.
    pub fn live_poll_interval(&self) -> Duration {
        Duration::from_millis(self.live_poll_interval_ms)
    }

    /// Pause inserted between roster chunks.
    pub fn roster_batch_delay(&self) -> Duration {
        Duration::from_millis(self.roster_batch_delay_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_requests: 20,
            reset_interval_ms: 30_000,
            queue_delay_ms: 500,
            max_cache_items: 50,
            max_cache_bytes: 4_800_000,
            max_retries: 3,
            ttl: TtlTable::default(),
            live_poll_interval_ms: 30_000,
            roster_batch_size: 8,
            roster_batch_delay_ms: 5_000,
            cleanup_interval_secs: 60,
            season_year: 2024,
            season_type: 2,
            cache_dir: None,
            core_api_base: DEFAULT_CORE_API_BASE.to_string(),
            site_api_base: DEFAULT_SITE_API_BASE.to_string(),
            server_port: 3000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
