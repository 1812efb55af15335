//! Team records.

use serde::{Deserialize, Serialize};

use super::stats::{TeamBettingStats, TeamTrends};

/// A franchise as listed by the site teams endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub abbreviation: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub conference: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// Overall win/loss/tie line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl TeamRecord {
    pub fn new(wins: u32, losses: u32, ties: u32) -> Self {
        Self { wins, losses, ties }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Wins over games played; 0 before any game.
    pub fn win_percentage(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            games => self.wins as f64 / games as f64,
        }
    }

    /// `W-L`, or `W-L-T` when there are ties.
    pub fn display(&self) -> String {
        if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }
}

/// Team with its record and betting context, as the teams page shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamOverview {
    pub team: Team,
    pub record: TeamRecord,
    pub win_percentage: f64,
    pub stats: TeamBettingStats,
    pub betting_trends: TeamTrends,
}

impl TeamOverview {
    pub fn new(team: Team, record: TeamRecord, stats: TeamBettingStats, trends: TeamTrends) -> Self {
        Self {
            team,
            win_percentage: record.win_percentage(),
            record,
            stats,
            betting_trends: trends,
        }
    }

    /// Zeroed record and empty stats, used when enrichment fails.
    pub fn bare(team: Team) -> Self {
        Self::new(
            team,
            TeamRecord::default(),
            TeamBettingStats::default(),
            TeamTrends::default(),
        )
    }
}
