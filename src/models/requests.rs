//! Request DTOs for the local JSON API
//!
//! Query strings of the list pages and the lineup slot body.

use serde::Deserialize;

use crate::error::Result;
use crate::managers::{PlayerFilter, PlayerSort, TeamFilter, TeamSort};

/// Query of `GET /api/teams`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamsQuery {
    #[serde(default)]
    pub conference: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    /// `winPercentage` (default), `wins` or `name`
    #[serde(default)]
    pub sort: Option<String>,
    /// Reload and re-enrich the team list first
    #[serde(default)]
    pub refresh: bool,
}

impl TeamsQuery {
    pub fn filter(&self) -> TeamFilter {
        TeamFilter {
            conference: self.conference.clone(),
            division: self.division.clone(),
            search: self.search.clone().unwrap_or_default(),
        }
    }

    pub fn sort(&self) -> Result<TeamSort> {
        self.sort
            .as_deref()
            .map(str::parse)
            .unwrap_or(Ok(TeamSort::default()))
    }
}

/// Query of `GET /api/players`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayersQuery {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    /// `fantasyPoints` (default), `name` or `position`
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

impl PlayersQuery {
    pub fn filter(&self) -> PlayerFilter {
        PlayerFilter {
            position: self.position.clone(),
            team: self.team.clone(),
            search: self.search.clone().unwrap_or_default(),
        }
    }

    pub fn sort(&self) -> Result<PlayerSort> {
        self.sort
            .as_deref()
            .map(str::parse)
            .unwrap_or(Ok(PlayerSort::default()))
    }
}

/// Body of `PUT /api/lineup/:slot`. A missing or null id empties the slot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupSlotRequest {
    #[serde(default)]
    pub player_id: Option<String>,
}

impl LineupSlotRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match self.player_id.as_deref() {
            Some(id) if id.len() > 64 => {
                Some("Player id exceeds maximum length of 64 characters".to_string())
            }
            Some(id) if id.chars().any(char::is_control) => {
                Some("Player id contains control characters".to_string())
            }
            _ => None,
        }
    }
}
