//! Game records built from scoreboard and summary payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One side of a matchup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTeam {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    /// Score as reported; "0" before kickoff
    pub score: String,
}

/// Point spread parsed from `"<TEAM> <LINE>"` text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spread {
    pub favorite: String,
    pub line: Option<f64>,
}

impl std::fmt::Display for Spread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} {}", self.favorite, line),
            None => f.write_str(&self.favorite),
        }
    }
}

/// Clock and phase of a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    /// "pre", "in" or "post"
    #[serde(default)]
    pub state: Option<String>,
    pub detail: String,
    pub period: u32,
    pub display_clock: String,
    /// Seconds left in the current period
    pub clock_seconds: f64,
}

/// A scheduled, live or finished game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub home_team: GameTeam,
    pub away_team: GameTeam,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub spread: Option<Spread>,
    #[serde(default)]
    pub over_under: Option<f64>,
    pub status: GameStatus,
}

// == Game Details ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub start_time: Option<String>,
    pub venue: Option<String>,
    pub attendance: u64,
    pub weather: Option<Value>,
}

/// Box-score line for one team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamGameStats {
    pub total_yards: Option<String>,
    pub passing_yards: Option<String>,
    pub rushing_yards: Option<String>,
    pub turnovers: Option<String>,
    pub time_of_possession: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideStats {
    pub home: Option<TeamGameStats>,
    pub away: Option<TeamGameStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Situation {
    pub possession: Option<String>,
    pub down: Option<u32>,
    pub distance: Option<u32>,
    pub yard_line: Option<u32>,
    pub last_play: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub home: String,
    pub away: String,
}

impl Default for Score {
    fn default() -> Self {
        Self {
            home: "0".to_string(),
            away: "0".to_string(),
        }
    }
}

/// Everything the summary endpoint says about one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetails {
    pub game_info: GameInfo,
    pub team_stats: SideStats,
    pub situation: Option<Situation>,
    pub score: Score,
    #[serde(default)]
    pub home_team_id: Option<String>,
    #[serde(default)]
    pub away_team_id: Option<String>,
    #[serde(default)]
    pub status: Option<GameStatus>,
}
