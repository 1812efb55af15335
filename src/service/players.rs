//! Player statistics.

use super::NflDataService;
use crate::error::Result;
use crate::extract::{player_fantasy_stats, player_projections, player_prop_metrics};
use crate::models::{PlayerPropMetrics, PlayerStatLine};

impl NflDataService {
    /// Season totals used for fantasy scoring.
    pub async fn get_player_fantasy_stats(&self, player_id: &str) -> Result<PlayerStatLine> {
        let stats = self.fetch(&self.endpoints.athlete_statistics(player_id)).await?;
        Ok(player_fantasy_stats(&stats))
    }

    pub async fn get_player_projections(&self, player_id: &str) -> Result<PlayerStatLine> {
        let projections = self.fetch(&self.endpoints.athlete_projections(player_id)).await?;
        Ok(player_projections(&projections))
    }

    /// Per-game averages behind player prop lines.
    pub async fn get_player_prop_metrics(&self, player_id: &str) -> Result<PlayerPropMetrics> {
        let stats = self.fetch(&self.endpoints.athlete_statistics(player_id)).await?;
        Ok(player_prop_metrics(&stats))
    }
}
