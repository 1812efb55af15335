//! Betting records.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadLine {
    pub favorite: Option<String>,
    pub line: Option<f64>,
    pub odds: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Moneyline {
    pub home: Option<f64>,
    pub away: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalLine {
    pub total: Option<f64>,
    pub over_odds: Option<f64>,
    pub under_odds: Option<f64>,
}

/// One recorded line move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMovement {
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub from: Option<f64>,
    pub to: Option<f64>,
}

/// Current odds for a game. Every field is empty when the provider has none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingData {
    pub spread: Option<SpreadLine>,
    pub moneyline: Option<Moneyline>,
    pub over_under: Option<TotalLine>,
    pub movements: Vec<LineMovement>,
}

impl BettingData {
    pub fn is_empty(&self) -> bool {
        self.spread.is_none()
            && self.moneyline.is_none()
            && self.over_under.is_none()
            && self.movements.is_empty()
    }
}

/// Pregame model output for a matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionInsights {
    pub home_team_id: String,
    pub away_team_id: String,
    /// Home-perspective margin, one decimal
    pub spread: Option<f64>,
    pub total_score: Option<f64>,
}
