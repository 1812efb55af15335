//! Response DTOs for the local JSON API
//!
//! Defines the structure of outgoing HTTP response bodies that are not
//! domain records themselves.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::fetch::RateLimitState;
use crate::managers::{Lineup, LineupManager};
use crate::models::{LivePrediction, LiveSnapshot};

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub cache: CacheStats,
    /// Hit rate (hits / lookups)
    pub hit_rate: f64,
    pub preferences: CacheStats,
    pub rate_limit: RateLimitState,
    /// Requests currently being fetched
    pub in_flight: usize,
    pub tracked_games: Vec<String>,
}

/// Current lineup with its derived totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupResponse {
    pub lineup: Lineup,
    pub total_projected_points: f64,
    pub valid: bool,
    /// Players available to the lineup builder
    pub available: usize,
}

impl From<&LineupManager> for LineupResponse {
    fn from(manager: &LineupManager) -> Self {
        Self {
            lineup: manager.lineup().clone(),
            total_projected_points: manager.total_projected_points(),
            valid: manager.validate(),
            available: manager.available().len(),
        }
    }
}

/// Tracking state of one game.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStatusResponse {
    pub game_id: String,
    pub tracking: bool,
    /// True when this request started or stopped tracking
    pub changed: bool,
    pub snapshot: Option<LiveSnapshot>,
    pub prediction: Option<LivePrediction>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_live_status_serializes_camel_case() {
        let resp = LiveStatusResponse {
            game_id: "401".to_string(),
            tracking: true,
            changed: false,
            snapshot: None,
            prediction: None,
        };
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["gameId"], "401");
        assert!(json["snapshot"].is_null());
    }
}
