//! Cache Entry Module
//!
//! Defines the persisted envelope `{value, storedAt, expiresAt}` for cached values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// Represents a single persisted cache entry with value and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// The stored JSON value
    pub value: Value,
    /// Write timestamp (Unix milliseconds)
    #[serde(alias = "timestamp")]
    pub stored_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    #[serde(alias = "expires", default)]
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stored at `now_ms` with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now_ms` - Current time in Unix milliseconds
    /// * `ttl_seconds` - Optional TTL in seconds
    pub fn new(value: Value, now_ms: u64, ttl_seconds: Option<u64>) -> Self {
        Self {
            value,
            stored_at: now_ms,
            expires_at: ttl_seconds.map(|ttl| now_ms + ttl * 1000),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired once the current time reaches the expiration time.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(now_ms))
    }
}
