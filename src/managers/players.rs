//! Players page: active players with fantasy points.

use std::cmp::Ordering;
use std::str::FromStr;

use futures::future::join_all;
use serde::Deserialize;
use tracing::{info, warn};

use super::{matches_choice, matches_search};
use crate::error::{Error, Result};
use crate::models::{Player, PlayerProfile};
use crate::scoring::{fantasy_points, ScoringRules};
use crate::service::NflDataService;

// == Filter & Sort ==
/// Position / team / name filter. `None` or `"ALL"` disables a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlayerFilter {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub search: String,
}

impl PlayerFilter {
    pub fn matches(&self, profile: &PlayerProfile) -> bool {
        let player = &profile.player;
        matches_choice(self.position.as_deref(), player.position.as_deref())
            && matches_choice(self.team.as_deref(), Some(player.team.as_str()))
            && matches_search(&self.search, &player.full_name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayerSort {
    #[default]
    FantasyPoints,
    Name,
    Position,
}

impl FromStr for PlayerSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fantasypoints" | "fantasy_points" => Ok(Self::FantasyPoints),
            "name" => Ok(Self::Name),
            "position" => Ok(Self::Position),
            other => Err(Error::InvalidRequest(format!("Unknown player sort key: {}", other))),
        }
    }
}

impl PlayerSort {
    /// Descending order for every key.
    fn compare(self, a: &PlayerProfile, b: &PlayerProfile) -> Ordering {
        match self {
            Self::FantasyPoints => b.fantasy_points.total_cmp(&a.fantasy_points),
            Self::Name => lowercase(&b.player.full_name).cmp(&lowercase(&a.player.full_name)),
            Self::Position => b.player.position.cmp(&a.player.position),
        }
    }
}

fn lowercase(s: &str) -> String {
    s.to_lowercase()
}

// == Players Manager ==
#[derive(Debug)]
pub struct PlayersManager {
    service: NflDataService,
    rules: ScoringRules,
    players: Vec<PlayerProfile>,
}

impl PlayersManager {
    pub fn new(service: NflDataService) -> Self {
        Self::with_rules(service, ScoringRules::ppr())
    }

    pub fn with_rules(service: NflDataService, rules: ScoringRules) -> Self {
        Self {
            service,
            rules,
            players: Vec::new(),
        }
    }

    /// Loads every active player with season stats and fantasy points.
    pub async fn load_players(&mut self) -> Result<usize> {
        let players = self.service.get_all_active_players().await?;
        let profiles = join_all(players.into_iter().map(|p| self.enhance(p))).await;

        info!("Player data loaded: {} players", profiles.len());
        self.players = profiles;
        Ok(self.players.len())
    }

    /// Profile with stats and points; a failed lookup leaves 0 points.
    async fn enhance(&self, player: Player) -> PlayerProfile {
        match self.service.get_player_fantasy_stats(&player.id).await {
            Ok(stats) => PlayerProfile {
                fantasy_points: fantasy_points(&stats, &self.rules),
                fantasy_stats: Some(stats),
                ..PlayerProfile::bare(player)
            },
            Err(e) => {
                warn!("Failed to load stats for player {}: {}", player.id, e);
                PlayerProfile::bare(player)
            }
        }
    }

    pub fn players(&self) -> &[PlayerProfile] {
        &self.players
    }

    pub fn view(&self, filter: &PlayerFilter, sort: PlayerSort) -> Vec<PlayerProfile> {
        let mut players: Vec<PlayerProfile> = self
            .players
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        players.sort_by(|a, b| sort.compare(a, b));
        players
    }
}
