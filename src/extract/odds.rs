//! Odds parsing for scoreboard events and the core odds endpoint.

use serde_json::Value;
use tracing::warn;

use super::{as_number, as_text, first, number, text};
use crate::models::{BettingData, LineMovement, Moneyline, Spread, SpreadLine, TotalLine};

/// Parses `"<TEAM> <LINE>"` odds text, e.g. `"KC -3.5"`.
pub fn parse_spread_text(details: &str) -> Option<Spread> {
    let mut parts = details.split_whitespace();
    let favorite = parts.next()?.to_string();
    let line = parts.next().and_then(|l| l.parse().ok());
    Some(Spread { favorite, line })
}

fn event_odds(event: &Value) -> Option<&Value> {
    first(first(event, "competitions")?, "odds")
}

/// Spread of a scoreboard event's first odds entry.
pub fn extract_spread(event: &Value) -> Option<Spread> {
    let details = event_odds(event)?.get("details")?.as_str()?;
    parse_spread_text(details)
}

/// Over/under total of a scoreboard event's first odds entry.
pub fn extract_over_under(event: &Value) -> Option<f64> {
    number(event_odds(event)?, "overUnder")
}

// == Betting Data ==
/// Parses an odds payload: either an array of odds entries or a page with
/// an `items` array. Only the first entry is used.
///
/// Both the flat layout (`spread: {favorite, line, odds}`,
/// `moneyline: {home, away}`) and the provider's per-side layout
/// (`spread: -3.5`, `details`, `homeTeamOdds.moneyLine`) are understood.
pub fn parse_betting_data(odds: &Value) -> BettingData {
    let current = match odds {
        Value::Array(items) => items.first(),
        other => first(other, "items"),
    };
    let current = match current {
        Some(current) if current.is_object() => current,
        _ => return BettingData::default(),
    };

    let has_lines = ["spread", "moneyline", "overUnder", "details", "homeTeamOdds"]
        .iter()
        .any(|key| current.get(key).is_some());
    if !has_lines {
        warn!("Invalid odds data structure received");
        return BettingData::default();
    }

    BettingData {
        spread: spread_line(current),
        moneyline: moneyline(current),
        over_under: total_line(current),
        movements: movements(current),
    }
}

fn spread_line(odds: &Value) -> Option<SpreadLine> {
    match odds.get("spread") {
        Some(spread) if spread.is_object() => Some(SpreadLine {
            favorite: spread
                .get("favorite")
                .and_then(|f| text(f, "abbreviation").or_else(|| as_text(f))),
            line: number(spread, "line"),
            odds: number(spread, "odds"),
        }),
        Some(line) if as_number(line).is_some() => {
            let favorite = odds
                .get("details")
                .and_then(Value::as_str)
                .and_then(parse_spread_text)
                .map(|s| s.favorite);
            Some(SpreadLine {
                favorite,
                line: as_number(line),
                odds: odds.get("homeTeamOdds").and_then(|h| number(h, "spreadOdds")),
            })
        }
        _ => {
            let parsed = parse_spread_text(odds.get("details")?.as_str()?)?;
            Some(SpreadLine {
                favorite: Some(parsed.favorite),
                line: parsed.line,
                odds: None,
            })
        }
    }
}

fn moneyline(odds: &Value) -> Option<Moneyline> {
    if let Some(ml) = odds.get("moneyline").filter(|m| m.is_object()) {
        return Some(Moneyline {
            home: number(ml, "home"),
            away: number(ml, "away"),
        });
    }
    let home = odds.get("homeTeamOdds").and_then(|h| number(h, "moneyLine"));
    let away = odds.get("awayTeamOdds").and_then(|a| number(a, "moneyLine"));
    if home.is_none() && away.is_none() {
        return None;
    }
    Some(Moneyline { home, away })
}

fn total_line(odds: &Value) -> Option<TotalLine> {
    let total = number(odds, "overUnder");
    let over_odds = number(odds, "overOdds");
    let under_odds = number(odds, "underOdds");
    if total.is_none() && over_odds.is_none() && under_odds.is_none() {
        return None;
    }
    Some(TotalLine {
        total,
        over_odds,
        under_odds,
    })
}

fn movements(odds: &Value) -> Vec<LineMovement> {
    odds.get("movements")
        .and_then(Value::as_array)
        .map(|moves| {
            moves
                .iter()
                .map(|m| LineMovement {
                    time: text(m, "timestamp"),
                    kind: text(m, "type"),
                    from: number(m, "from"),
                    to: number(m, "to"),
                })
                .collect()
        })
        .unwrap_or_default()
}
