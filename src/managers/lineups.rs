//! Lineup builder: slot assignment, validation and persistence.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{Player, PlayerProfile, Team};
use crate::scoring::{fantasy_points, ScoringRules};
use crate::service::NflDataService;

/// Positions the FLEX slot accepts.
const FLEX_POSITIONS: [&str; 3] = ["RB", "WR", "TE"];
const DST_POSITION: &str = "DST";

// == Lineup Slot ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineupSlot {
    #[serde(rename = "QB")]
    Qb,
    #[serde(rename = "RB1")]
    Rb1,
    #[serde(rename = "RB2")]
    Rb2,
    #[serde(rename = "WR1")]
    Wr1,
    #[serde(rename = "WR2")]
    Wr2,
    #[serde(rename = "TE")]
    Te,
    #[serde(rename = "FLEX")]
    Flex,
    #[serde(rename = "DST")]
    Dst,
}

impl LineupSlot {
    pub const ALL: [LineupSlot; 8] = [
        Self::Qb,
        Self::Rb1,
        Self::Rb2,
        Self::Wr1,
        Self::Wr2,
        Self::Te,
        Self::Flex,
        Self::Dst,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Qb => "QB",
            Self::Rb1 => "RB1",
            Self::Rb2 => "RB2",
            Self::Wr1 => "WR1",
            Self::Wr2 => "WR2",
            Self::Te => "TE",
            Self::Flex => "FLEX",
            Self::Dst => DST_POSITION,
        }
    }

    /// True when a player listed at `position` may fill this slot.
    pub fn accepts(self, position: &str) -> bool {
        match self {
            Self::Qb => position == "QB",
            Self::Rb1 | Self::Rb2 => position == "RB",
            Self::Wr1 | Self::Wr2 => position == "WR",
            Self::Te => position == "TE",
            Self::Flex => FLEX_POSITIONS.contains(&position),
            Self::Dst => position == DST_POSITION,
        }
    }

    /// Every slot but FLEX must be filled for a valid lineup.
    pub fn is_required(self) -> bool {
        self != Self::Flex
    }
}

impl fmt::Display for LineupSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineupSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidRequest(format!("Unknown lineup slot: {}", s)))
    }
}

// == Lineup ==
/// Slot assignments; every slot is always present, empty ones as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lineup {
    slots: BTreeMap<LineupSlot, Option<PlayerProfile>>,
}

impl Default for Lineup {
    fn default() -> Self {
        Self {
            slots: LineupSlot::ALL.into_iter().map(|slot| (slot, None)).collect(),
        }
    }
}

impl Lineup {
    pub fn get(&self, slot: LineupSlot) -> Option<&PlayerProfile> {
        self.slots.get(&slot).and_then(Option::as_ref)
    }

    pub fn set(&mut self, slot: LineupSlot, player: Option<PlayerProfile>) {
        self.slots.insert(slot, player);
    }

    /// Slot currently holding `player_id`.
    pub fn slot_of(&self, player_id: &str) -> Option<LineupSlot> {
        self.slots
            .iter()
            .find(|(_, p)| p.as_ref().map(|p| p.id() == player_id).unwrap_or(false))
            .map(|(slot, _)| *slot)
    }

    pub fn is_complete(&self) -> bool {
        LineupSlot::ALL
            .into_iter()
            .filter(|slot| slot.is_required())
            .all(|slot| self.get(slot).is_some())
    }

    pub fn total_projected_points(&self) -> f64 {
        self.slots
            .values()
            .flatten()
            .map(|p| p.projected_points)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LineupSlot, Option<&PlayerProfile>)> {
        self.slots.iter().map(|(slot, p)| (*slot, p.as_ref()))
    }

    /// Adds any slot missing from a stored lineup.
    fn normalized(mut self) -> Self {
        for slot in LineupSlot::ALL {
            self.slots.entry(slot).or_insert(None);
        }
        self
    }
}

/// Team defense entry for the DST slot.
fn team_defense(team: &Team) -> PlayerProfile {
    PlayerProfile::bare(Player {
        id: format!("dst_{}", team.id),
        full_name: format!("{} D/ST", team.display_name),
        position: Some(DST_POSITION.to_string()),
        team: team.name.clone(),
        team_id: Some(team.id.clone()),
        jersey: None,
        experience: None,
        college: None,
        headshot: team.logo.clone(),
    })
}

fn fills_any_slot(player: &Player) -> bool {
    player
        .position
        .as_deref()
        .map(|pos| LineupSlot::ALL.into_iter().any(|slot| slot.accepts(pos)))
        .unwrap_or(false)
}

// == Lineup Manager ==
#[derive(Debug)]
pub struct LineupManager {
    service: NflDataService,
    rules: ScoringRules,
    available: Vec<PlayerProfile>,
    lineup: Lineup,
}

impl LineupManager {
    pub fn new(service: NflDataService) -> Self {
        Self {
            service,
            rules: ScoringRules::ppr(),
            available: Vec::new(),
            lineup: Lineup::default(),
        }
    }

    /// Loads lineup-eligible players with projected points, plus one
    /// defense entry per team.
    pub async fn load_available_players(&mut self) -> Result<usize> {
        let players: Vec<Player> = self
            .service
            .get_all_active_players()
            .await?
            .into_iter()
            .filter(fills_any_slot)
            .collect();
        let mut available = join_all(players.into_iter().map(|p| self.with_projection(p))).await;

        let teams = self.service.get_all_teams(false).await?;
        available.extend(teams.iter().map(team_defense));

        info!("Available players loaded: {}", available.len());
        self.available = available;
        Ok(self.available.len())
    }

    async fn with_projection(&self, player: Player) -> PlayerProfile {
        match self.service.get_player_projections(&player.id).await {
            Ok(projections) => PlayerProfile {
                projected_points: fantasy_points(&projections, &self.rules),
                ..PlayerProfile::bare(player)
            },
            Err(e) => {
                warn!("Failed to load projections for player {}: {}", player.id, e);
                PlayerProfile::bare(player)
            }
        }
    }

    pub fn available(&self) -> &[PlayerProfile] {
        &self.available
    }

    pub fn lineup(&self) -> &Lineup {
        &self.lineup
    }

    /// Players that may fill `slot` and are not already in the lineup.
    pub fn eligible_players(&self, slot: LineupSlot) -> Vec<&PlayerProfile> {
        self.available
            .iter()
            .filter(|p| p.player.position.as_deref().map(|pos| slot.accepts(pos)).unwrap_or(false))
            .filter(|p| self.lineup.slot_of(p.id()).is_none())
            .collect()
    }

    /// Puts `player_id` in `slot`, or empties the slot when `None`.
    pub fn update_position(&mut self, slot: LineupSlot, player_id: Option<&str>) -> Result<()> {
        let player_id = match player_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                self.lineup.set(slot, None);
                return Ok(());
            }
        };

        let player = self
            .available
            .iter()
            .find(|p| p.id() == player_id)
            .ok_or_else(|| Error::NotFound(format!("Player {}", player_id)))?;

        let position = player.player.position.as_deref().unwrap_or_default();
        if !slot.accepts(position) {
            return Err(Error::InvalidRequest(format!(
                "{} ({}) cannot fill {}",
                player.player.full_name, position, slot
            )));
        }
        if let Some(current) = self.lineup.slot_of(player_id).filter(|s| *s != slot) {
            return Err(Error::InvalidRequest(format!(
                "{} is already in the lineup at {}",
                player.player.full_name, current
            )));
        }

        let player = player.clone();
        self.lineup.set(slot, Some(player));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lineup = Lineup::default();
    }

    pub fn validate(&self) -> bool {
        self.lineup.is_complete()
    }

    /// Persists the lineup; incomplete lineups are rejected.
    pub fn save(&self) -> Result<()> {
        if !self.validate() {
            return Err(Error::InvalidRequest(
                "Please fill all required positions".to_string(),
            ));
        }
        if !self.service.preferences().lock().save_lineup(&self.lineup) {
            return Err(Error::Storage("Failed to persist lineup".to_string()));
        }
        info!("Lineup saved");
        Ok(())
    }

    /// Replaces the current lineup with the saved one, if any.
    pub fn load_saved(&mut self) -> bool {
        let saved = self.service.preferences().lock().lineup::<Lineup>();
        match saved {
            Some(saved) => {
                self.lineup = saved.normalized();
                true
            }
            None => false,
        }
    }

    pub fn total_projected_points(&self) -> f64 {
        self.lineup.total_projected_points()
    }
}
