//! Player records.

use serde::{Deserialize, Serialize};

use super::stats::PlayerStatLine;

/// An active roster player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub position: Option<String>,
    /// Team display name
    pub team: String,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub jersey: Option<String>,
    /// Seasons of experience
    #[serde(default)]
    pub experience: Option<u32>,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub headshot: Option<String>,
}

impl Player {
    pub fn position_is(&self, abbreviation: &str) -> bool {
        self.position.as_deref() == Some(abbreviation)
    }
}

/// Player plus the fantasy numbers the players and lineup pages need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    #[serde(flatten)]
    pub player: Player,
    #[serde(default)]
    pub fantasy_stats: Option<PlayerStatLine>,
    #[serde(default)]
    pub fantasy_points: f64,
    #[serde(default)]
    pub projected_points: f64,
}

impl PlayerProfile {
    /// Profile with no statistics and zero points.
    pub fn bare(player: Player) -> Self {
        Self {
            player,
            fantasy_stats: None,
            fantasy_points: 0.0,
            projected_points: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.player.id
    }
}
