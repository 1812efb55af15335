//! Teams page: enriched team list with filtering and sorting.

use std::cmp::Ordering;
use std::str::FromStr;

use futures::future::join_all;
use serde::Deserialize;
use tracing::{info, warn};

use super::{matches_choice, matches_search};
use crate::error::{Error, Result};
use crate::models::{Team, TeamOverview};
use crate::service::NflDataService;

// == Filter & Sort ==
/// Conference / division / name filter. `None` or `"ALL"` disables a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TeamFilter {
    #[serde(default)]
    pub conference: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub search: String,
}

impl TeamFilter {
    pub fn matches(&self, overview: &TeamOverview) -> bool {
        let team = &overview.team;
        matches_choice(self.conference.as_deref(), team.conference.as_deref())
            && matches_choice(self.division.as_deref(), team.division.as_deref())
            && matches_search(&self.search, &team.name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeamSort {
    #[default]
    WinPercentage,
    Wins,
    Name,
}

impl FromStr for TeamSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "winpercentage" | "win_percentage" => Ok(Self::WinPercentage),
            "wins" => Ok(Self::Wins),
            "name" => Ok(Self::Name),
            other => Err(Error::InvalidRequest(format!("Unknown team sort key: {}", other))),
        }
    }
}

impl TeamSort {
    /// Descending order for every key.
    fn compare(self, a: &TeamOverview, b: &TeamOverview) -> Ordering {
        match self {
            Self::WinPercentage => b.win_percentage.total_cmp(&a.win_percentage),
            Self::Wins => b.record.wins.cmp(&a.record.wins),
            Self::Name => b
                .team
                .name
                .to_lowercase()
                .cmp(&a.team.name.to_lowercase()),
        }
    }
}

// == Teams Manager ==
#[derive(Debug)]
pub struct TeamsManager {
    service: NflDataService,
    teams: Vec<TeamOverview>,
}

impl TeamsManager {
    pub fn new(service: NflDataService) -> Self {
        Self {
            service,
            teams: Vec::new(),
        }
    }

    /// Loads every team and enriches it with record, betting stats and
    /// trends. Returns the number of teams loaded.
    pub async fn load_teams(&mut self) -> Result<usize> {
        let teams = self.service.get_all_teams(false).await?;
        let enhanced = join_all(teams.into_iter().map(|team| self.enhance(team))).await;

        info!("Team data loaded: {} teams", enhanced.len());
        self.teams = enhanced;
        Ok(self.teams.len())
    }

    /// One team's overview; any failed lookup yields the zeroed overview.
    async fn enhance(&self, team: Team) -> TeamOverview {
        let lookups = futures::try_join!(
            self.service.get_team_record(&team.id),
            self.service.get_team_betting_stats(&team.id),
            self.service.get_team_trends(&team.id),
        );

        match lookups {
            Ok((record, stats, trends)) => TeamOverview::new(team, record, stats, trends),
            Err(e) => {
                warn!("Failed to load stats for team {}: {}", team.id, e);
                TeamOverview::bare(team)
            }
        }
    }

    pub fn teams(&self) -> &[TeamOverview] {
        &self.teams
    }

    /// Filtered, sorted copy of the loaded teams.
    pub fn view(&self, filter: &TeamFilter, sort: TeamSort) -> Vec<TeamOverview> {
        let mut teams: Vec<TeamOverview> = self
            .teams
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        teams.sort_by(|a, b| sort.compare(a, b));
        teams
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamRecord;
    use crate::service::test_support::*;
    use serde_json::json;

    fn team(id: &str, name: &str, conference: &str) -> Team {
        Team {
            id: id.into(),
            name: name.into(),
            display_name: name.into(),
            abbreviation: name[..3].to_uppercase(),
            location: None,
            conference: Some(conference.into()),
            division: None,
            logo: None,
        }
    }

    fn overview(id: &str, name: &str, conference: &str, wins: u32, losses: u32) -> TeamOverview {
        let mut overview = TeamOverview::bare(team(id, name, conference));
        overview.record = TeamRecord::new(wins, losses, 0);
        overview.win_percentage = overview.record.win_percentage();
        overview
    }

    fn manager_with(teams: Vec<TeamOverview>) -> TeamsManager {
        let (service, _, _) = service();
        let mut manager = TeamsManager::new(service);
        manager.teams = teams;
        manager
    }

    #[test]
    fn test_filter_and_default_sort() {
        let manager = manager_with(vec![
            overview("1", "Bills", "AFC", 10, 7),
            overview("2", "Chiefs", "AFC", 15, 2),
            overview("3", "Eagles", "NFC", 14, 3),
        ]);
        let filter = TeamFilter {
            conference: Some("AFC".into()),
            ..TeamFilter::default()
        };

        let names: Vec<String> = manager
            .view(&filter, TeamSort::default())
            .into_iter()
            .map(|t| t.team.name)
            .collect();

        assert_eq!(names, vec!["Chiefs", "Bills"]);
    }

    #[test]
    fn test_all_and_search_are_case_insensitive() {
        let manager = manager_with(vec![
            overview("1", "Bills", "AFC", 10, 7),
            overview("3", "Eagles", "NFC", 14, 3),
        ]);
        let filter = TeamFilter {
            conference: Some("all".into()),
            search: "EAG".into(),
            ..TeamFilter::default()
        };

        let view = manager.view(&filter, TeamSort::Name);

        assert_eq!(view.len(), 1);
        assert_eq!(view[0].team.name, "Eagles");
    }

    #[test]
    fn test_sort_keys_parse() {
        assert_eq!("wins".parse::<TeamSort>().unwrap(), TeamSort::Wins);
        assert_eq!("winPercentage".parse::<TeamSort>().unwrap(), TeamSort::WinPercentage);
        assert!("points".parse::<TeamSort>().is_err());
    }

    #[tokio::test]
    async fn test_failed_enrichment_zeroes_team() {
        let (service, transport, _) = service();
        transport.respond_json(
            "http://site/teams",
            json!({"sports": [{"leagues": [{"teams": [
                {"team": {"id": "1", "name": "Bills"}},
                {"team": {"id": "2", "name": "Chiefs"}}
            ]}]}]}),
        );
        transport.respond_json(
            "http://core/seasons/2024/types/2/teams/2/record",
            json!({"items": [{"name": "overall", "stats": [
                {"name": "wins", "value": 3.0}, {"name": "losses", "value": 1.0}
            ]}]}),
        );
        transport.respond_json(
            "http://core/seasons/2024/types/2/teams/2/statistics",
            json!({"splits": {"categories": []}}),
        );
        let mut manager = TeamsManager::new(service);

        assert_eq!(manager.load_teams().await.unwrap(), 2);
        let view = manager.view(&TeamFilter::default(), TeamSort::WinPercentage);

        assert_eq!(view[0].team.name, "Chiefs");
        assert_eq!(view[0].win_percentage, 0.75);
        assert_eq!(view[1].record, TeamRecord::default());
        assert_eq!(view[1].win_percentage, 0.0);
    }
}
