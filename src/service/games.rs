//! Games, odds, matchups and pregame insights.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;

use super::NflDataService;
use crate::error::{Error, Result};
use crate::extract::{parse_betting_data, parse_game_details, parse_scoreboard, text};
use crate::models::{BettingData, Game, GameDetails, PredictionInsights};
use crate::prediction::{predict_spread, predict_total};

/// Placeholder id rejected by game lookups.
const INVALID_GAME_ID: &str = "invalid_game";

impl NflDataService {
    // == Scoreboard ==
    /// Raw scoreboard events of the current week.
    pub async fn get_current_week_games(&self) -> Result<Vec<Value>> {
        let board = self.fetch(&self.endpoints.scoreboard()).await?;
        Ok(board
            .get("events")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// Current week's games as typed records.
    pub async fn get_upcoming_games(&self) -> Result<Vec<Game>> {
        let board = self.fetch(&self.endpoints.scoreboard()).await?;
        Ok(parse_scoreboard(&board))
    }

    // == Game Details ==
    pub async fn get_game_details(&self, game_id: &str) -> Result<GameDetails> {
        if game_id.trim().is_empty() || game_id == INVALID_GAME_ID {
            return Err(Error::InvalidRequest(format!(
                "Invalid game ID provided: {:?}",
                game_id
            )));
        }

        let summary = self.fetch(&self.endpoints.game_summary(game_id)).await?;
        Ok(parse_game_details(&summary))
    }

    /// Current odds of a game.
    ///
    /// Upstream failures and unusable payloads both produce the all-null
    /// record; only a missing id is an error.
    pub async fn get_betting_data(&self, game_id: &str) -> Result<BettingData> {
        if game_id.trim().is_empty() {
            return Err(Error::InvalidRequest("Game ID is required".to_string()));
        }

        match self.pipeline.fetch(&self.endpoints.competition_odds(game_id)).await {
            Ok(odds) => Ok(parse_betting_data(&odds)),
            Err(e) => {
                warn!("Error fetching betting data for game {}: {}", game_id, e);
                Ok(BettingData::default())
            }
        }
    }

    // == Matchups ==
    /// This season's games of `team1_id` in which `team2_id` competes.
    pub async fn get_historical_matchups(&self, team1_id: &str, team2_id: &str) -> Result<Vec<Value>> {
        let schedule = self.fetch(&self.endpoints.team_schedule(team1_id)).await?;
        let events = schedule
            .get("events")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        Ok(events
            .iter()
            .filter(|event| has_competitor(event, team2_id))
            .cloned()
            .collect())
    }

    /// Listed injuries per team id, fetched one team at a time.
    pub async fn get_team_injury_counts<S: AsRef<str>>(
        &self,
        team_ids: &[S],
    ) -> Result<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for team_id in team_ids {
            let team_id = team_id.as_ref();
            let injuries = self.fetch(&self.endpoints.team_injuries(team_id)).await?;
            counts.insert(team_id.to_string(), injury_count(&injuries));
        }
        Ok(counts)
    }

    // == Insights ==
    /// Pregame spread and total from both teams' scoring metrics.
    pub async fn get_prediction_insights(&self, home_id: &str, away_id: &str) -> Result<PredictionInsights> {
        let (home, away) = futures::try_join!(
            self.get_team_performance_metrics(home_id),
            self.get_team_performance_metrics(away_id),
        )?;

        Ok(PredictionInsights {
            home_team_id: home_id.to_string(),
            away_team_id: away_id.to_string(),
            spread: predict_spread(&home, &away),
            total_score: predict_total(&home, &away),
        })
    }
}

fn has_competitor(event: &Value, team_id: &str) -> bool {
    event
        .pointer("/competitions/0/competitors")
        .and_then(Value::as_array)
        .map(|competitors| {
            competitors
                .iter()
                .any(|c| text(c, "id").as_deref() == Some(team_id))
        })
        .unwrap_or(false)
}

/// Array length, else `count`, else the length of `items`.
fn injury_count(injuries: &Value) -> usize {
    if let Some(list) = injuries.as_array() {
        return list.len();
    }
    if let Some(count) = injuries.get("count").and_then(Value::as_u64) {
        return count as usize;
    }
    injuries
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::*;
    use serde_json::json;

    fn scoreboard() -> Value {
        json!({"events": [{
            "id": "401",
            "name": "Bills at Chiefs",
            "date": "2024-09-08T17:00Z",
            "competitions": [{
                "competitors": [
                    {"id": "12", "homeAway": "home", "score": "10", "team": {"name": "Chiefs", "abbreviation": "KC"}},
                    {"id": "2", "homeAway": "away", "score": "7", "team": {"name": "Bills", "abbreviation": "BUF"}}
                ],
                "odds": [{"details": "KC -3.5", "overUnder": 47.5}]
            }],
            "status": {"type": {"state": "in", "detail": "2nd Quarter"}}
        }]})
    }

    #[tokio::test]
    async fn test_current_week_and_upcoming_share_one_fetch() {
        let (service, transport, _) = service();
        transport.respond_json("http://site/scoreboard", scoreboard());

        let raw = service.get_current_week_games().await.unwrap();
        let games = service.get_upcoming_games().await.unwrap();

        assert_eq!(raw.len(), 1);
        assert_eq!(games[0].home_team.name, "Chiefs");
        assert_eq!(games[0].over_under, Some(47.5));
        assert_eq!(transport.call_count("http://site/scoreboard"), 1);
    }

    #[tokio::test]
    async fn test_scoreboard_without_events() {
        let (service, transport, _) = service();
        transport.respond_json("http://site/scoreboard", json!({"leagues": []}));

        assert!(service.get_current_week_games().await.unwrap().is_empty());
        assert!(service.get_upcoming_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_game_details_rejects_bad_ids() {
        let (service, transport, _) = service();

        for id in ["", "invalid_game"] {
            let result = service.get_game_details(id).await;
            assert!(matches!(result, Err(Error::InvalidRequest(_))), "id {:?}", id);
        }
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_game_details() {
        let (service, transport, _) = service();
        transport.respond_json(
            "http://site/summary?event=401",
            json!({
                "header": {"competitions": [{"competitors": [
                    {"id": "12", "homeAway": "home", "score": "21"},
                    {"id": "2", "homeAway": "away", "score": "17"}
                ]}]},
                "gameInfo": {"venue": {"fullName": "Arrowhead"}, "attendance": 73000}
            }),
        );

        let details = service.get_game_details("401").await.unwrap();

        assert_eq!(details.game_info.venue.as_deref(), Some("Arrowhead"));
        assert_eq!(details.game_info.attendance, 73_000);
        assert_eq!(details.score.home, "21");
        assert_eq!(details.home_team_id.as_deref(), Some("12"));
    }

    #[tokio::test]
    async fn test_betting_data_failure_is_all_null() {
        let (service, _, _) = service();

        let odds = service.get_betting_data("401").await.unwrap();

        assert!(odds.is_empty());
        assert!(matches!(
            service.get_betting_data("").await,
            Err(Error::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_betting_data_parsed() {
        let (service, transport, _) = service();
        transport.respond_json(
            "http://core/events/401/competitions/401/odds",
            json!([{"overUnder": 47.5, "overOdds": -110.0, "underOdds": -110.0}]),
        );

        let odds = service.get_betting_data("401").await.unwrap();

        assert_eq!(odds.over_under.and_then(|t| t.total), Some(47.5));
    }

    #[tokio::test]
    async fn test_historical_matchups_filter_by_opponent() {
        let (service, transport, _) = service();
        transport.respond_json(
            "http://site/teams/12/schedule?season=2024",
            json!({"events": [
                {"id": "a", "competitions": [{"competitors": [{"id": "12"}, {"id": "2"}]}]},
                {"id": "b", "competitions": [{"competitors": [{"id": "12"}, {"id": "7"}]}]},
                {"id": "c", "competitions": []}
            ]}),
        );

        let games = service.get_historical_matchups("12", "2").await.unwrap();

        assert_eq!(games.len(), 1);
        assert_eq!(games[0]["id"], "a");
    }

    #[tokio::test]
    async fn test_injury_counts() {
        let (service, transport, _) = service();
        transport.respond_json("http://core/teams/1/injuries", json!([{}, {}, {}]));
        transport.respond_json("http://core/teams/2/injuries", json!({"count": 4, "items": []}));
        transport.respond_json("http://core/teams/3/injuries", json!({"items": [{}]}));

        let counts = service.get_team_injury_counts(&["1", "2", "3"]).await.unwrap();

        assert_eq!(counts["1"], 3);
        assert_eq!(counts["2"], 4);
        assert_eq!(counts["3"], 1);
    }

    #[tokio::test]
    async fn test_prediction_insights() {
        let (service, transport, _) = service();
        let stats = |ppg: f64, papg: f64| {
            json!({"splits": {"categories": [
                {"name": "scoring", "stats": [{"name": "totalPointsPerGame", "value": ppg}]},
                {"name": "defensive", "stats": [{"name": "pointsAllowedPerGame", "value": papg}]}
            ]}})
        };
        transport.respond_json("http://core/seasons/2024/types/2/teams/12/statistics", stats(28.0, 18.0));
        transport.respond_json("http://core/seasons/2024/types/2/teams/2/statistics", stats(24.0, 21.0));

        let insights = service.get_prediction_insights("12", "2").await.unwrap();

        // (28 - 21) - (24 - 18) + 3
        assert_eq!(insights.spread, Some(4.0));
        assert_eq!(insights.total_score, Some(52.0));
    }
}
