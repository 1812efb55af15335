//! Statistic records extracted from the core statistics endpoints.

use serde::{Deserialize, Serialize};

// == Stat Value ==
/// One named statistic as the provider reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatValue {
    pub value: Option<f64>,
    pub display_value: String,
    pub rank: Option<u32>,
}

impl StatValue {
    /// Placeholder for payloads that carry no statistics at all.
    pub fn unavailable() -> Self {
        Self {
            value: None,
            display_value: "N/A".to_string(),
            rank: None,
        }
    }
}

/// Numeric value of an optional stat, 0 when absent.
pub fn stat_number(stat: &Option<StatValue>) -> f64 {
    stat.as_ref().and_then(|s| s.value).unwrap_or(0.0)
}

/// Missing category or stat name → `None`.
pub type Stat = Option<StatValue>;

// == Player Lines ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassingLine {
    pub attempts: Stat,
    pub completions: Stat,
    pub yards: Stat,
    pub touchdowns: Stat,
    pub interceptions: Stat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RushingLine {
    pub attempts: Stat,
    pub yards: Stat,
    pub touchdowns: Stat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivingLine {
    pub targets: Stat,
    pub receptions: Stat,
    pub yards: Stat,
    pub touchdowns: Stat,
}

/// Season statistics or projections for one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatLine {
    pub passing: PassingLine,
    pub rushing: RushingLine,
    pub receiving: ReceivingLine,
}

// == Player Props ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassingProps {
    pub yards_per_game: Stat,
    pub completion_pct: Stat,
    pub attempts_per_game: Stat,
    pub yards_per_attempt: Stat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RushingProps {
    pub yards_per_game: Stat,
    pub attempts_per_game: Stat,
    pub yards_per_carry: Stat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivingProps {
    pub yards_per_game: Stat,
    pub receptions_per_game: Stat,
    pub yards_per_reception: Stat,
    pub target_share: Stat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPropMetrics {
    pub passing: PassingProps,
    pub rushing: RushingProps,
    pub receiving: ReceivingProps,
}

// == Team Betting Stats ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingOffense {
    pub points_per_game: Stat,
    pub total_yards: Stat,
    pub passing_yards: Stat,
    pub rushing_yards: Stat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingDefense {
    pub points_allowed: Stat,
    pub sacks: Stat,
    pub interceptions: Stat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingSplits {
    pub home_record: Stat,
    pub away_record: Stat,
    pub last_five_games: Stat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBettingStats {
    pub offense: BettingOffense,
    pub defense: BettingDefense,
    pub trends: BettingSplits,
}

// == Team Trends ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallTrend {
    pub wins: Stat,
    pub losses: Stat,
    pub points_per_game: Stat,
    pub points_allowed_per_game: Stat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsTrend {
    pub record: Stat,
    pub home_record: Stat,
    pub away_record: Stat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverUnderTrend {
    pub overs: Stat,
    pub unders: Stat,
    pub pushes: Stat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SituationalTrend {
    pub home_straight_up: Stat,
    pub away_straight_up: Stat,
    pub as_favorite: Stat,
    pub as_underdog: Stat,
}

/// Straight-up, against-the-spread and over/under history for a team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamTrends {
    pub overall: OverallTrend,
    pub ats: AtsTrend,
    pub over_under: OverUnderTrend,
    pub situational: SituationalTrend,
}

// == Performance Metrics ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffenseMetrics {
    pub points_per_game: Stat,
    pub yards_per_game: Stat,
    pub third_down_conv_pct: Stat,
    pub red_zone_efficiency: Stat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefenseMetrics {
    pub points_allowed_per_game: Stat,
    pub yards_allowed_per_game: Stat,
    pub sacks: Stat,
    pub takeaways: Stat,
}

/// Inputs to the moneyline and spread predictions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPerformanceMetrics {
    pub offense: OffenseMetrics,
    pub defense: DefenseMetrics,
}
