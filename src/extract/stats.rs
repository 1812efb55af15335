//! Statistic lookups over `splits.categories[].stats[]` payloads.

use serde_json::Value;

use super::{as_number, find_by, number};
use crate::models::{
    AtsTrend, BettingDefense, BettingOffense, BettingSplits, DefenseMetrics, OffenseMetrics,
    OverUnderTrend, OverallTrend, PassingLine, PassingProps, PlayerPropMetrics, PlayerStatLine,
    ReceivingLine, ReceivingProps, RushingLine, RushingProps, SituationalTrend, Stat, StatValue,
    TeamBettingStats, TeamPerformanceMetrics, TeamRecord, TeamTrends,
};

// == Stat Lookup ==
/// Looks up `category`.`stat_name`.
///
/// A payload with no categories yields the `N/A` placeholder; a payload that
/// has categories but lacks this category or stat yields `None`.
pub fn extract_stat(stats: &Value, category: &str, stat_name: &str) -> Stat {
    lookup(stats, category, stat_name, None)
}

/// Like [`extract_stat`], with the value divided by games played.
pub fn extract_stat_per_game(stats: &Value, category: &str, stat_name: &str) -> Stat {
    let games = games_played(stats);
    lookup(stats, category, stat_name, Some(games))
}

fn lookup(stats: &Value, category: &str, stat_name: &str, per_game: Option<Option<f64>>) -> Stat {
    let categories = match stats.pointer("/splits/categories").and_then(Value::as_array) {
        Some(categories) if !categories.is_empty() => categories,
        _ => return Some(StatValue::unavailable()),
    };

    let category_stats = categories
        .iter()
        .find(|c| c.get("name").and_then(Value::as_str) == Some(category))?
        .get("stats")?;
    let stat = find_by(category_stats, "name", stat_name)?;

    let raw = stat.get("value").and_then(as_number);
    let value = match per_game {
        None => raw,
        Some(Some(games)) if games > 0.0 => raw.map(|v| v / games),
        Some(_) => None,
    };
    let display_value = stat
        .get("displayValue")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| raw.map(|v| v.to_string()))
        .unwrap_or_else(|| "N/A".to_string());
    let rank = stat
        .get("rank")
        .and_then(Value::as_u64)
        .filter(|r| *r > 0)
        .map(|r| r as u32);

    Some(StatValue {
        value,
        display_value,
        rank,
    })
}

fn games_played(stats: &Value) -> Option<f64> {
    number(stats, "gamesPlayed").or_else(|| {
        lookup(stats, "general", "gamesPlayed", None).and_then(|s| s.value)
    })
}

/// Stats of the `lastNGames` split for `n`, if the payload carries one.
pub fn extract_last_n_games(stats: &Value, n: u64) -> Option<Value> {
    stats
        .get("splits")?
        .as_array()?
        .iter()
        .find(|s| {
            s.get("type").and_then(Value::as_str) == Some("lastNGames")
                && s.get("value").and_then(Value::as_u64) == Some(n)
        })?
        .get("stats")
        .cloned()
}

/// Overall wins/losses/ties from a team record payload; zeros when absent.
pub fn extract_record(record: &Value) -> TeamRecord {
    let overall = record
        .get("items")
        .and_then(|items| find_by(items, "name", "overall"));

    let count = |name: &str| -> u32 {
        overall
            .and_then(|o| o.get("stats"))
            .and_then(|stats| find_by(stats, "name", name))
            .and_then(|s| number(s, "value"))
            .map(|v| v.max(0.0) as u32)
            .unwrap_or(0)
    };

    TeamRecord::new(count("wins"), count("losses"), count("ties"))
}

// == Record Builders ==
/// Season totals used for fantasy scoring.
pub fn player_fantasy_stats(stats: &Value) -> PlayerStatLine {
    PlayerStatLine {
        passing: PassingLine {
            yards: extract_stat(stats, "passing", "passingYards"),
            touchdowns: extract_stat(stats, "passing", "passingTouchdowns"),
            interceptions: extract_stat(stats, "passing", "interceptions"),
            ..Default::default()
        },
        rushing: RushingLine {
            yards: extract_stat(stats, "rushing", "rushingYards"),
            touchdowns: extract_stat(stats, "rushing", "rushingTouchdowns"),
            ..Default::default()
        },
        receiving: ReceivingLine {
            yards: extract_stat(stats, "receiving", "receivingYards"),
            touchdowns: extract_stat(stats, "receiving", "receivingTouchdowns"),
            receptions: extract_stat(stats, "receiving", "receptions"),
            ..Default::default()
        },
    }
}

pub fn player_projections(stats: &Value) -> PlayerStatLine {
    PlayerStatLine {
        passing: PassingLine {
            attempts: extract_stat(stats, "passing", "passingAttempts"),
            completions: extract_stat(stats, "passing", "completions"),
            yards: extract_stat(stats, "passing", "passingYards"),
            touchdowns: extract_stat(stats, "passing", "passingTouchdowns"),
            interceptions: extract_stat(stats, "passing", "interceptions"),
        },
        rushing: RushingLine {
            attempts: extract_stat(stats, "rushing", "rushingAttempts"),
            yards: extract_stat(stats, "rushing", "rushingYards"),
            touchdowns: extract_stat(stats, "rushing", "rushingTouchdowns"),
        },
        receiving: ReceivingLine {
            targets: extract_stat(stats, "receiving", "receivingTargets"),
            receptions: extract_stat(stats, "receiving", "receptions"),
            yards: extract_stat(stats, "receiving", "receivingYards"),
            touchdowns: extract_stat(stats, "receiving", "receivingTouchdowns"),
        },
    }
}

pub fn player_prop_metrics(stats: &Value) -> PlayerPropMetrics {
    PlayerPropMetrics {
        passing: PassingProps {
            yards_per_game: extract_stat(stats, "passing", "passingYardsPerGame"),
            completion_pct: extract_stat(stats, "passing", "completionPct"),
            attempts_per_game: extract_stat_per_game(stats, "passing", "passingAttempts"),
            yards_per_attempt: extract_stat(stats, "passing", "yardsPerPassAttempt"),
        },
        rushing: RushingProps {
            yards_per_game: extract_stat(stats, "rushing", "rushingYardsPerGame"),
            attempts_per_game: extract_stat_per_game(stats, "rushing", "rushingAttempts"),
            yards_per_carry: extract_stat(stats, "rushing", "yardsPerRushAttempt"),
        },
        receiving: ReceivingProps {
            yards_per_game: extract_stat(stats, "receiving", "receivingYardsPerGame"),
            receptions_per_game: extract_stat_per_game(stats, "receiving", "receptions"),
            yards_per_reception: extract_stat(stats, "receiving", "yardsPerReception"),
            target_share: extract_stat_per_game(stats, "receiving", "receivingTargets"),
        },
    }
}

pub fn team_betting_stats(stats: &Value) -> TeamBettingStats {
    TeamBettingStats {
        offense: BettingOffense {
            points_per_game: extract_stat(stats, "scoring", "totalPointsPerGame"),
            total_yards: extract_stat(stats, "general", "totalYards"),
            passing_yards: extract_stat(stats, "passing", "netPassingYards"),
            rushing_yards: extract_stat(stats, "rushing", "rushingYards"),
        },
        defense: BettingDefense {
            points_allowed: extract_stat(stats, "defensive", "pointsAllowed"),
            sacks: extract_stat(stats, "defensive", "sacks"),
            interceptions: extract_stat(stats, "defensiveInterceptions", "interceptions"),
        },
        trends: BettingSplits {
            home_record: extract_stat(stats, "miscellaneous", "homeRecord"),
            away_record: extract_stat(stats, "miscellaneous", "awayRecord"),
            last_five_games: extract_stat(stats, "miscellaneous", "lastFiveGames"),
        },
    }
}

pub fn team_trends(stats: &Value) -> TeamTrends {
    TeamTrends {
        overall: OverallTrend {
            wins: extract_stat(stats, "record", "wins"),
            losses: extract_stat(stats, "record", "losses"),
            points_per_game: extract_stat(stats, "scoring", "totalPointsPerGame"),
            points_allowed_per_game: extract_stat(stats, "defensive", "pointsAllowedPerGame"),
        },
        ats: AtsTrend {
            record: extract_stat(stats, "betting", "atsRecord"),
            home_record: extract_stat(stats, "betting", "homeAtsRecord"),
            away_record: extract_stat(stats, "betting", "awayAtsRecord"),
        },
        over_under: OverUnderTrend {
            overs: extract_stat(stats, "betting", "oversRecord"),
            unders: extract_stat(stats, "betting", "undersRecord"),
            pushes: extract_stat(stats, "betting", "pushesRecord"),
        },
        situational: SituationalTrend {
            home_straight_up: extract_stat(stats, "record", "homeRecord"),
            away_straight_up: extract_stat(stats, "record", "awayRecord"),
            as_favorite: extract_stat(stats, "record", "favoriteRecord"),
            as_underdog: extract_stat(stats, "record", "underdogRecord"),
        },
    }
}

pub fn team_performance_metrics(stats: &Value) -> TeamPerformanceMetrics {
    TeamPerformanceMetrics {
        offense: OffenseMetrics {
            points_per_game: extract_stat(stats, "scoring", "totalPointsPerGame"),
            yards_per_game: extract_stat(stats, "passing", "yardsPerGame"),
            third_down_conv_pct: extract_stat(stats, "miscellaneous", "thirdDownConvPct"),
            red_zone_efficiency: extract_stat(stats, "miscellaneous", "redzoneScoringPct"),
        },
        defense: DefenseMetrics {
            points_allowed_per_game: extract_stat(stats, "defensive", "pointsAllowedPerGame"),
            yards_allowed_per_game: extract_stat(stats, "defensive", "yardsAllowed"),
            sacks: extract_stat(stats, "defensive", "sacks"),
            takeaways: extract_stat(stats, "miscellaneous", "totalTakeaways"),
        },
    }
}
