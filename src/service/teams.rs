//! Teams, rosters and team statistics.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{NflDataService, ALL_TEAMS_KEY, ROSTER_CACHE_SECS};
use crate::error::Result;
use crate::extract::{
    extract_record, is_valid_roster, parse_teams, process_roster, team_betting_stats,
    team_performance_metrics, team_trends,
};
use crate::fetch::{fetch_in_chunks, FetchError};
use crate::models::{Player, Team, TeamBettingStats, TeamPerformanceMetrics, TeamRecord, TeamTrends};

impl NflDataService {
    // == Teams ==
    /// Every franchise, cached under `all_teams` for a day.
    ///
    /// `force_refresh` drops both the processed list and the raw teams
    /// response first. A payload without the expected shape yields an empty
    /// list.
    pub async fn get_all_teams(&self, force_refresh: bool) -> Result<Vec<Team>> {
        let url = self.endpoints.teams();
        if force_refresh {
            self.pipeline.invalidate(ALL_TEAMS_KEY);
            self.pipeline.invalidate(&url);
        } else if let Some(teams) = self.pipeline.cached::<Vec<Team>>(ALL_TEAMS_KEY) {
            debug!("Using cached teams data");
            return Ok(teams);
        }

        let payload = self.fetch(&url).await?;
        let teams = match parse_teams(&payload) {
            Some(teams) => teams,
            None => {
                warn!("Invalid teams data structure");
                return Ok(Vec::new());
            }
        };

        info!("Retrieved {} teams", teams.len());
        self.pipeline.store(ALL_TEAMS_KEY, &teams, ROSTER_CACHE_SECS);
        Ok(teams)
    }

    // == Rosters ==
    /// Raw roster payload of one team, or `None` when it has no athletes.
    pub async fn get_team_roster(&self, team_id: &str) -> Result<Option<Value>> {
        let key = format!("team_roster_{}", team_id);
        if let Some(roster) = self.pipeline.cached::<Value>(&key) {
            return Ok(Some(roster));
        }

        let roster = self.fetch(&self.endpoints.team_roster(team_id)).await?;
        if !is_valid_roster(&roster) {
            warn!("Invalid roster data structure for team {}", team_id);
            return Ok(None);
        }
        self.pipeline.store(&key, &roster, ROSTER_CACHE_SECS);
        Ok(Some(roster))
    }

    /// Active players of every team.
    ///
    /// Rosters are fetched in chunks of `roster_batch_size` teams with a
    /// pause between chunks; a team whose roster fails is skipped.
    pub async fn get_all_active_players(&self) -> Result<Vec<Player>> {
        let teams = self.get_all_teams(false).await?;
        if teams.is_empty() {
            warn!("No teams retrieved, no players to load");
            return Ok(Vec::new());
        }

        let this = self;
        let players = fetch_in_chunks(
            &teams,
            self.roster_batch_size,
            self.roster_batch_delay,
            self.pipeline.clock().as_ref(),
            move |team: &Team| {
                let team = team.clone();
                async move { this.active_roster(&team).await }
            },
        )
        .await;

        info!("Loaded {} active players from {} teams", players.len(), teams.len());
        Ok(players)
    }

    async fn active_roster(&self, team: &Team) -> std::result::Result<Vec<Player>, FetchError> {
        let key = format!("roster_{}", team.id);
        if let Some(players) = self.pipeline.cached::<Vec<Player>>(&key) {
            debug!("Using cached roster for {}", team.name);
            return Ok(players);
        }

        let roster = self.pipeline.fetch(&self.endpoints.team_roster(&team.id)).await?;
        if !is_valid_roster(&roster) {
            warn!("Roster for {} has no athletes", team.name);
            return Ok(Vec::new());
        }

        let players = process_roster(&roster, team);
        self.pipeline.store(&key, &players, ROSTER_CACHE_SECS);
        Ok(players)
    }

    // == Team Statistics ==
    pub async fn get_team_record(&self, team_id: &str) -> Result<TeamRecord> {
        let record = self.fetch(&self.endpoints.team_record(team_id)).await?;
        Ok(extract_record(&record))
    }

    pub async fn get_team_betting_stats(&self, team_id: &str) -> Result<TeamBettingStats> {
        let stats = self.fetch(&self.endpoints.team_statistics(team_id)).await?;
        Ok(team_betting_stats(&stats))
    }

    pub async fn get_team_trends(&self, team_id: &str) -> Result<TeamTrends> {
        let stats = self.fetch(&self.endpoints.team_statistics(team_id)).await?;
        Ok(team_trends(&stats))
    }

    pub async fn get_team_performance_metrics(&self, team_id: &str) -> Result<TeamPerformanceMetrics> {
        let stats = self.fetch(&self.endpoints.team_statistics(team_id)).await?;
        Ok(team_performance_metrics(&stats))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn teams_payload(ids: &[&str]) -> Value {
        let teams: Vec<Value> = ids
            .iter()
            .map(|id| {
                json!({"team": {
                    "id": id,
                    "name": format!("Team{}", id),
                    "displayName": format!("City Team{}", id),
                    "abbreviation": format!("T{}", id),
                }})
            })
            .collect();
        json!({"sports": [{"leagues": [{"teams": teams}]}]})
    }

    pub fn roster_payload(team_id: &str) -> Value {
        json!({"athletes": [
            {"position": "offense", "items": [
                {"id": format!("{}01", team_id), "fullName": format!("Passer {}", team_id),
                 "position": {"abbreviation": "QB"}, "status": {"type": "active"}},
                {"id": format!("{}02", team_id), "fullName": format!("Runner {}", team_id),
                 "position": {"abbreviation": "RB"}, "status": {"type": "injured"}}
            ]},
            {"position": "defense", "items": [
                {"id": format!("{}03", team_id), "fullName": format!("Rusher {}", team_id),
                 "position": {"abbreviation": "DE"}, "status": {"type": "active"}}
            ]}
        ]})
    }
}
