//! Upstream URL catalogue.

use crate::config::Config;

/// Builds request URLs against the core (statistics) and site (summary) bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    core: String,
    site: String,
    season_year: u16,
    season_type: u8,
}

impl Endpoints {
    pub fn new(core: &str, site: &str, season_year: u16, season_type: u8) -> Self {
        Self {
            core: core.trim_end_matches('/').to_string(),
            site: site.trim_end_matches('/').to_string(),
            season_year,
            season_type,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.core_api_base,
            &config.site_api_base,
            config.season_year,
            config.season_type,
        )
    }

    fn season(&self) -> String {
        format!(
            "{}/seasons/{}/types/{}",
            self.core, self.season_year, self.season_type
        )
    }

    // == Site ==
    pub fn teams(&self) -> String {
        format!("{}/teams", self.site)
    }

    pub fn team_roster(&self, team_id: &str) -> String {
        format!("{}/teams/{}/roster?enable=roster,stats", self.site, team_id)
    }

    pub fn scoreboard(&self) -> String {
        format!("{}/scoreboard", self.site)
    }

    pub fn game_summary(&self, game_id: &str) -> String {
        format!("{}/summary?event={}", self.site, game_id)
    }

    pub fn team_schedule(&self, team_id: &str) -> String {
        format!(
            "{}/teams/{}/schedule?season={}",
            self.site, team_id, self.season_year
        )
    }

    // == Core ==
    pub fn team_statistics(&self, team_id: &str) -> String {
        format!("{}/teams/{}/statistics", self.season(), team_id)
    }

    pub fn team_record(&self, team_id: &str) -> String {
        format!("{}/teams/{}/record", self.season(), team_id)
    }

    pub fn athlete_statistics(&self, player_id: &str) -> String {
        format!("{}/athletes/{}/statistics", self.season(), player_id)
    }

    pub fn athlete_projections(&self, player_id: &str) -> String {
        format!("{}/athletes/{}/projections", self.season(), player_id)
    }

    pub fn competition_odds(&self, game_id: &str) -> String {
        format!(
            "{}/events/{}/competitions/{}/odds",
            self.core, game_id, game_id
        )
    }

    pub fn team_injuries(&self, team_id: &str) -> String {
        format!("{}/teams/{}/injuries", self.core, team_id)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
