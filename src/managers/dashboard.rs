//! Dashboard: four independently loaded sections.

use std::fmt;
use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{Game, Player, Team};
use crate::service::NflDataService;

/// Entries shown in the top-teams and top-players sections.
pub const TOP_N: usize = 5;
pub const SECTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub value: String,
}

/// How many sections loaded; failed ones are listed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionReport {
    pub loaded: usize,
    pub total: usize,
    pub failed: Vec<&'static str>,
}

impl fmt::Display for SectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} sections loaded", self.loaded, self.total)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub live_games: Vec<Game>,
    pub top_teams: Vec<Team>,
    pub top_players: Vec<Player>,
    pub insights: Vec<Insight>,
    pub report: SectionReport,
    pub summary: String,
}

// == Dashboard Manager ==
#[derive(Debug, Clone)]
pub struct DashboardManager {
    service: NflDataService,
}

impl DashboardManager {
    pub fn new(service: NflDataService) -> Self {
        Self { service }
    }

    /// Loads every section concurrently. A failed section is logged and
    /// left empty; the others are unaffected.
    pub async fn load_all_sections(&self) -> Dashboard {
        let mut failed = Vec::new();
        let (live_games, top_teams, top_players, insights) = tokio::join!(
            self.live_games(),
            self.top_teams(),
            self.top_players(),
            self.insights(),
        );

        let live_games = settle("liveGames", live_games, &mut failed);
        let top_teams = settle("topTeams", top_teams, &mut failed);
        let top_players = settle("topPlayers", top_players, &mut failed);
        let insights = settle("insights", insights, &mut failed);

        let report = SectionReport {
            loaded: SECTION_COUNT - failed.len(),
            total: SECTION_COUNT,
            failed,
        };
        info!("Dashboard: {}", report);

        Dashboard {
            live_games,
            top_teams,
            top_players,
            insights,
            summary: report.to_string(),
            report,
        }
    }

    pub async fn live_games(&self) -> Result<Vec<Game>> {
        self.service.get_upcoming_games().await
    }

    pub async fn top_teams(&self) -> Result<Vec<Team>> {
        top(self.service.get_all_teams(false)).await
    }

    pub async fn top_players(&self) -> Result<Vec<Player>> {
        top(self.service.get_all_active_players()).await
    }

    pub async fn insights(&self) -> Result<Vec<Insight>> {
        let (games, teams) = futures::try_join!(
            self.service.get_upcoming_games(),
            self.service.get_all_teams(false),
        )?;
        Ok(build_insights(&games, &teams))
    }
}

async fn top<T, F>(load: F) -> Result<Vec<T>>
where
    F: Future<Output = Result<Vec<T>>>,
{
    let mut items = load.await?;
    items.truncate(TOP_N);
    Ok(items)
}

fn settle<T>(section: &'static str, result: Result<Vec<T>>, failed: &mut Vec<&'static str>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("Dashboard section {} failed: {}", section, e);
        failed.push(section);
        Vec::new()
    })
}

// == Insights ==
fn build_insights(games: &[Game], teams: &[Team]) -> Vec<Insight> {
    let top_game = games.first();
    let best_bet = games
        .iter()
        .find(|g| g.spread.is_some() && g.over_under.is_some());
    let top_team = teams.first();

    vec![
        Insight {
            title: "Top Matchup".to_string(),
            description: top_game
                .map(|g| format!("{} vs {}", g.home_team.name, g.away_team.name))
                .unwrap_or_else(|| "No upcoming games".to_string()),
            value: top_game
                .and_then(|g| g.start_time.clone())
                .unwrap_or_else(|| "N/A".to_string()),
        },
        Insight {
            title: "Best Betting Value".to_string(),
            description: best_bet
                .and_then(|g| g.spread.as_ref().map(|s| format!("{} ({})", g.home_team.name, s)))
                .unwrap_or_else(|| "No betting lines available".to_string()),
            value: best_bet
                .and_then(|g| g.over_under)
                .map(|total| format!("O/U {}", total))
                .unwrap_or_else(|| "N/A".to_string()),
        },
        Insight {
            title: "Fantasy Trend".to_string(),
            description: top_team
                .map(|t| format!("Top performing team: {}", t.name))
                .unwrap_or_else(|| "No trend data available".to_string()),
            value: top_team
                .map(|t| t.abbreviation.clone())
                .unwrap_or_else(|| "N/A".to_string()),
        },
    ]
}
