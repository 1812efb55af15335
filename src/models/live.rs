//! Live game snapshots and the events published about them.

use serde::{Deserialize, Serialize};

/// Latest polled state of a tracked game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub game_id: String,
    pub home_score: u32,
    pub away_score: u32,
    pub period: u32,
    pub display_clock: String,
    pub clock_seconds: f64,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub possession: Option<String>,
    #[serde(default)]
    pub last_play: Option<String>,
}

/// In-game projection derived from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivePrediction {
    pub game_id: String,
    /// Home minus away
    pub margin: i64,
    pub total: u64,
    /// Share of regulation played, 0.0 to 1.0
    pub elapsed_fraction: f64,
    pub projected_margin: Option<f64>,
    pub projected_total: Option<f64>,
}

/// Payload delivered to live-update subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum LiveEvent {
    GameUpdate {
        #[serde(rename = "gameId")]
        game_id: String,
        data: LiveSnapshot,
    },
    PredictionUpdate {
        #[serde(rename = "gameId")]
        game_id: String,
        predictions: LivePrediction,
    },
}

impl LiveEvent {
    pub const GAME_UPDATE: &'static str = "gameUpdate";
    pub const PREDICTION_UPDATE: &'static str = "predictionUpdate";

    /// Event-type key subscribers register under.
    pub fn event_type(&self) -> &'static str {
        match self {
            LiveEvent::GameUpdate { .. } => Self::GAME_UPDATE,
            LiveEvent::PredictionUpdate { .. } => Self::PREDICTION_UPDATE,
        }
    }

    pub fn game_id(&self) -> &str {
        match self {
            LiveEvent::GameUpdate { game_id, .. } | LiveEvent::PredictionUpdate { game_id, .. } => {
                game_id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_matches_serde_tag() {
        let event = LiveEvent::GameUpdate {
            game_id: "401".into(),
            data: LiveSnapshot::default(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], event.event_type());
        assert_eq!(event.game_id(), "401");
    }
}
