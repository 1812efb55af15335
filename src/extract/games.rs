//! Scoreboard and game summary parsing.

use serde_json::Value;
use tracing::warn;

use super::{first, number, text};
use super::odds::{extract_over_under, extract_spread};
use crate::models::{
    Game, GameDetails, GameInfo, GameStatus, GameTeam, LiveSnapshot, Score, SideStats, Situation,
    TeamGameStats,
};

/// Competitor for `side` ("home"/"away"), by `homeAway` or else by position
/// (home first).
fn pick_side<'a>(competitors: &'a [Value], side: &str) -> Option<&'a Value> {
    competitors
        .iter()
        .find(|c| c.get("homeAway").and_then(Value::as_str) == Some(side))
        .or_else(|| match side {
            "home" => competitors.first(),
            _ => competitors.get(1),
        })
}

fn competitors(competition: &Value) -> &[Value] {
    competition
        .get("competitors")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Seconds from an `M:SS` clock display.
pub fn parse_clock(display: &str) -> Option<f64> {
    let (minutes, seconds) = display.trim().split_once(':')?;
    let minutes: f64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    Some(minutes * 60.0 + seconds)
}

fn parse_status(status: &Value) -> GameStatus {
    let kind = status.get("type");
    let display_clock = text(status, "displayClock").unwrap_or_else(|| "0:00".to_string());
    let clock_seconds = number(status, "clock")
        .or_else(|| parse_clock(&display_clock))
        .unwrap_or(0.0);

    GameStatus {
        state: kind.and_then(|k| text(k, "state")),
        detail: kind
            .and_then(|k| text(k, "detail").or_else(|| text(k, "shortDetail")))
            .unwrap_or_default(),
        period: number(status, "period").map(|p| p as u32).unwrap_or(0),
        display_clock,
        clock_seconds,
    }
}

fn game_team(competitor: &Value) -> GameTeam {
    let team = competitor.get("team").unwrap_or(&Value::Null);
    GameTeam {
        id: text(competitor, "id")
            .or_else(|| text(team, "id"))
            .unwrap_or_default(),
        name: text(team, "name")
            .or_else(|| text(team, "displayName"))
            .unwrap_or_default(),
        abbreviation: text(team, "abbreviation"),
        score: text(competitor, "score").unwrap_or_else(|| "0".to_string()),
    }
}

// == Scoreboard ==
/// One scoreboard event. `None` when the event lacks an id or a
/// competition with two competitors.
pub fn parse_scoreboard_game(event: &Value) -> Option<Game> {
    let id = text(event, "id")?;
    let competition = first(event, "competitions")?;
    let sides = competitors(competition);
    if sides.len() < 2 {
        return None;
    }

    let status = event
        .get("status")
        .or_else(|| competition.get("status"))
        .map(parse_status)
        .unwrap_or_default();

    Some(Game {
        id,
        name: text(event, "name"),
        home_team: game_team(pick_side(sides, "home")?),
        away_team: game_team(pick_side(sides, "away")?),
        start_time: text(event, "date"),
        spread: extract_spread(event),
        over_under: extract_over_under(event),
        status,
    })
}

/// Every well-formed event of a scoreboard payload, in payload order.
pub fn parse_scoreboard(scoreboard: &Value) -> Vec<Game> {
    let events = match scoreboard.get("events").and_then(Value::as_array) {
        Some(events) => events,
        None => {
            warn!("Scoreboard payload has no events array");
            return Vec::new();
        }
    };

    events
        .iter()
        .filter_map(|event| {
            let game = parse_scoreboard_game(event);
            if game.is_none() {
                warn!("Skipping malformed scoreboard event {:?}", event.get("id"));
            }
            game
        })
        .collect()
}

// == Summary ==
/// Box-score line looked up by statistic name.
pub fn extract_team_game_stats(team: &Value) -> TeamGameStats {
    let stats = team.get("statistics").and_then(Value::as_array);
    let stat = |name: &str| -> Option<String> {
        let entry = stats?
            .iter()
            .find(|s| s.get("name").and_then(Value::as_str) == Some(name))?;
        text(entry, "value").or_else(|| text(entry, "displayValue"))
    };

    TeamGameStats {
        total_yards: stat("totalYards"),
        passing_yards: stat("netPassingYards"),
        rushing_yards: stat("rushingYards"),
        turnovers: stat("turnovers"),
        time_of_possession: stat("possessionTime"),
    }
}

fn parse_situation(situation: &Value) -> Situation {
    let count = |key: &str| number(situation, key).map(|v| v.max(0.0) as u32);
    Situation {
        possession: text(situation, "possession"),
        down: count("down"),
        distance: count("distance"),
        yard_line: count("yardLine"),
        last_play: situation.get("lastPlay").and_then(|p| text(p, "text")),
    }
}

/// Game details from a summary payload.
pub fn parse_game_details(summary: &Value) -> GameDetails {
    let competition = summary
        .get("header")
        .and_then(|h| first(h, "competitions"))
        .unwrap_or(&Value::Null);
    let sides = competitors(competition);
    let home = pick_side(sides, "home");
    let away = pick_side(sides, "away");

    let info = summary.get("gameInfo").unwrap_or(&Value::Null);
    let game_info = GameInfo {
        start_time: text(competition, "date"),
        venue: info.get("venue").and_then(|v| text(v, "fullName")),
        attendance: number(info, "attendance").map(|a| a as u64).unwrap_or(0),
        weather: info.get("weather").filter(|w| !w.is_null()).cloned(),
    };

    let box_teams = summary
        .pointer("/boxscore/teams")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let team_stats = SideStats {
        home: pick_side(box_teams, "home").map(extract_team_game_stats),
        away: pick_side(box_teams, "away").map(extract_team_game_stats),
    };

    let score_of = |side: Option<&Value>| {
        side.and_then(|c| text(c, "score"))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "0".to_string())
    };

    GameDetails {
        game_info,
        team_stats,
        situation: summary
            .get("situation")
            .filter(|s| s.is_object())
            .map(parse_situation),
        score: Score {
            home: score_of(home),
            away: score_of(away),
        },
        home_team_id: home.and_then(|c| text(c, "id")),
        away_team_id: away.and_then(|c| text(c, "id")),
        status: competition.get("status").map(parse_status),
    }
}

/// Live snapshot of one game from its summary payload.
pub fn parse_live_snapshot(game_id: &str, summary: &Value) -> LiveSnapshot {
    let details = parse_game_details(summary);
    let status = details.status.unwrap_or_default();
    let score = |s: &str| s.trim().parse::<u32>().unwrap_or(0);

    LiveSnapshot {
        game_id: game_id.to_string(),
        home_score: score(&details.score.home),
        away_score: score(&details.score.away),
        period: status.period,
        display_clock: status.display_clock,
        clock_seconds: status.clock_seconds,
        state: status.state,
        possession: details.situation.as_ref().and_then(|s| s.possession.clone()),
        last_play: details.situation.and_then(|s| s.last_play),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event() -> Value {
        json!({
            "id": "401671789",
            "name": "Buffalo Bills at Kansas City Chiefs",
            "date": "2024-11-17T21:25Z",
            "status": {
                "clock": 754.0,
                "displayClock": "12:34",
                "period": 2,
                "type": {"state": "in", "detail": "12:34 - 2nd Quarter"}
            },
            "competitions": [{
                "competitors": [
                    {"id": "2", "homeAway": "away", "score": "10",
                     "team": {"id": "2", "name": "Bills", "abbreviation": "BUF"}},
                    {"id": "12", "homeAway": "home", "score": "14",
                     "team": {"id": "12", "name": "Chiefs", "abbreviation": "KC"}}
                ],
                "odds": [{"details": "KC -2.5", "overUnder": 46.5}]
            }]
        })
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("12:34"), Some(754.0));
        assert_eq!(parse_clock("0:07"), Some(7.0));
        assert_eq!(parse_clock("Final"), None);
    }

    #[test]
    fn test_scoreboard_game_uses_home_away_markers() {
        let game = parse_scoreboard_game(&event()).unwrap();

        assert_eq!(game.home_team.name, "Chiefs");
        assert_eq!(game.home_team.score, "14");
        assert_eq!(game.away_team.abbreviation.as_deref(), Some("BUF"));
        assert_eq!(game.spread.unwrap().line, Some(-2.5));
        assert_eq!(game.over_under, Some(46.5));
        assert_eq!(game.status.period, 2);
        assert_eq!(game.status.detail, "12:34 - 2nd Quarter");
    }

    #[test]
    fn test_scoreboard_game_falls_back_to_order() {
        let event = json!({
            "id": 7,
            "competitions": [{"competitors": [
                {"id": "1", "team": {"displayName": "Home Team"}},
                {"id": "2", "team": {"name": "Away"}}
            ]}]
        });
        let game = parse_scoreboard_game(&event).unwrap();

        assert_eq!(game.id, "7");
        assert_eq!(game.home_team.name, "Home Team");
        assert_eq!(game.away_team.id, "2");
        assert_eq!(game.home_team.score, "0");
        assert!(game.spread.is_none());
    }

    #[test]
    fn test_scoreboard_skips_malformed_events() {
        let board = json!({"events": [event(), {"id": "x"}, {"competitions": []}]});
        assert_eq!(parse_scoreboard(&board).len(), 1);
        assert!(parse_scoreboard(&json!({})).is_empty());
    }

    #[test]
    fn test_team_game_stats() {
        let team = json!({"statistics": [
            {"name": "totalYards", "displayValue": "356"},
            {"name": "turnovers", "value": 2},
            {"name": "possessionTime", "displayValue": "31:02"}
        ]});
        let stats = extract_team_game_stats(&team);

        assert_eq!(stats.total_yards.as_deref(), Some("356"));
        assert_eq!(stats.turnovers.as_deref(), Some("2"));
        assert_eq!(stats.time_of_possession.as_deref(), Some("31:02"));
        assert_eq!(stats.passing_yards, None);
        assert_eq!(extract_team_game_stats(&json!({})), TeamGameStats::default());
    }

    #[test]
    fn test_game_details_and_snapshot() {
        let summary = json!({
            "header": {"competitions": [{
                "date": "2024-11-17T21:25Z",
                "status": {"displayClock": "3:00", "period": 4, "type": {"state": "in"}},
                "competitors": [
                    {"id": "12", "homeAway": "home", "score": "27"},
                    {"id": "2", "homeAway": "away", "score": "24"}
                ]
            }]},
            "gameInfo": {"venue": {"fullName": "Arrowhead"}, "attendance": 73000},
            "boxscore": {"teams": [{"statistics": [{"name": "totalYards", "displayValue": "400"}]}]},
            "situation": {"possession": "2", "down": 3, "distance": 7, "yardLine": 35,
                          "lastPlay": {"text": "Pass complete"}}
        });

        let details = parse_game_details(&summary);
        assert_eq!(details.game_info.venue.as_deref(), Some("Arrowhead"));
        assert_eq!(details.game_info.attendance, 73_000);
        assert_eq!(details.score.home, "27");
        assert_eq!(details.home_team_id.as_deref(), Some("12"));
        assert_eq!(details.team_stats.home.unwrap().total_yards.as_deref(), Some("400"));
        assert!(details.team_stats.away.is_none());
        assert_eq!(details.situation.unwrap().down, Some(3));

        let snapshot = parse_live_snapshot("401", &summary);
        assert_eq!((snapshot.home_score, snapshot.away_score), (27, 24));
        assert_eq!(snapshot.period, 4);
        assert_eq!(snapshot.clock_seconds, 180.0);
        assert_eq!(snapshot.last_play.as_deref(), Some("Pass complete"));
    }

    #[test]
    fn test_empty_summary_defaults() {
        let details = parse_game_details(&json!({}));
        assert_eq!(details.score, Score::default());
        assert!(details.situation.is_none());
        assert_eq!(details.game_info.attendance, 0);
    }
}
