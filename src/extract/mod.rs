//! Extraction Module
//!
//! Pure functions that pull typed records out of provider payloads. Every
//! extractor tolerates missing or partial data: absent fields become `None`
//! or a documented default, never a panic or an error.

mod games;
mod odds;
mod stats;
mod teams;

pub use games::{
    extract_team_game_stats, parse_clock, parse_game_details, parse_live_snapshot,
    parse_scoreboard, parse_scoreboard_game,
};
pub use odds::{extract_over_under, extract_spread, parse_betting_data, parse_spread_text};
pub use stats::{
    extract_last_n_games, extract_record, extract_stat, extract_stat_per_game,
    player_fantasy_stats, player_projections, player_prop_metrics, team_betting_stats,
    team_performance_metrics, team_trends,
};
pub use teams::{is_valid_roster, parse_teams, process_roster};

use serde_json::Value;

// == JSON Helpers ==
/// String form of a field that may be a JSON string or number.
pub(crate) fn text(value: &Value, key: &str) -> Option<String> {
    as_text(value.get(key)?)
}

pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric form of a field that may be a JSON number or numeric string.
pub(crate) fn number(value: &Value, key: &str) -> Option<f64> {
    as_number(value.get(key)?)
}

pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First element of the array at `key`.
pub(crate) fn first<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key)?.as_array()?.first()
}

/// Element of `items` whose `key` field equals `wanted`.
pub(crate) fn find_by<'a>(items: &'a Value, key: &str, wanted: &str) -> Option<&'a Value> {
    items
        .as_array()?
        .iter()
        .find(|item| item.get(key).and_then(Value::as_str) == Some(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_and_number_accept_both_encodings() {
        let v = json!({"id": 12, "score": "24", "name": "Chiefs", "flag": true});

        assert_eq!(text(&v, "id").as_deref(), Some("12"));
        assert_eq!(text(&v, "name").as_deref(), Some("Chiefs"));
        assert_eq!(number(&v, "score"), Some(24.0));
        assert_eq!(number(&v, "id"), Some(12.0));
        assert_eq!(text(&v, "flag"), None);
        assert_eq!(number(&v, "missing"), None);
    }

    #[test]
    fn test_find_by() {
        let items = json!([{"name": "a", "v": 1}, {"name": "b", "v": 2}]);
        assert_eq!(find_by(&items, "name", "b").unwrap()["v"], 2);
        assert!(find_by(&items, "name", "c").is_none());
        assert!(find_by(&json!({}), "name", "a").is_none());
    }
}
