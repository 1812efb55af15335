//! Team list and roster parsing.

use serde_json::Value;
use tracing::{debug, warn};

use super::{first, number, text};
use crate::models::{Player, Team};

const POSITION_GROUPS: [&str; 3] = ["offense", "defense", "specialTeam"];

/// Teams from the site teams payload (`sports[0].leagues[0].teams[].team`).
///
/// `None` when the payload does not have that shape. Entries without an id
/// or a name are skipped.
pub fn parse_teams(payload: &Value) -> Option<Vec<Team>> {
    let league = first(first(payload, "sports")?, "leagues")?;
    let entries = league.get("teams")?.as_array()?;

    let teams = entries
        .iter()
        .filter_map(|entry| {
            let team = entry.get("team").unwrap_or(entry);
            let parsed = parse_team(team);
            if parsed.is_none() {
                debug!("Skipping team entry without id/name");
            }
            parsed
        })
        .collect();
    Some(teams)
}

fn parse_team(team: &Value) -> Option<Team> {
    let id = text(team, "id")?;
    let display_name = text(team, "displayName");
    let name = text(team, "name").or_else(|| display_name.clone())?;

    Some(Team {
        display_name: display_name.unwrap_or_else(|| name.clone()),
        abbreviation: text(team, "abbreviation").unwrap_or_default(),
        location: text(team, "location"),
        conference: text(team, "conference"),
        division: text(team, "division"),
        logo: first(team, "logos").and_then(|l| text(l, "href")),
        id,
        name,
    })
}

/// True when a roster payload carries an `athletes` array.
pub fn is_valid_roster(roster: &Value) -> bool {
    roster.get("athletes").map(Value::is_array).unwrap_or(false)
}

/// Active players of the offense, defense and special-teams groups, in
/// that group order.
pub fn process_roster(roster: &Value, team: &Team) -> Vec<Player> {
    let groups = match roster.get("athletes").and_then(Value::as_array) {
        Some(groups) => groups,
        None => {
            warn!("Invalid roster data structure for {}", team.name);
            return Vec::new();
        }
    };

    POSITION_GROUPS
        .iter()
        .filter_map(|group| {
            groups
                .iter()
                .find(|g| g.get("position").and_then(Value::as_str) == Some(*group))
        })
        .filter_map(|group| group.get("items").and_then(Value::as_array))
        .flatten()
        .filter(|athlete| athlete.pointer("/status/type").and_then(Value::as_str) == Some("active"))
        .filter_map(|athlete| parse_player(athlete, team))
        .collect()
}

fn parse_player(athlete: &Value, team: &Team) -> Option<Player> {
    let experience = athlete.get("experience").and_then(|e| {
        number(e, "years").or_else(|| super::as_number(e))
    });

    Some(Player {
        id: text(athlete, "id")?,
        full_name: text(athlete, "fullName")?,
        position: athlete.get("position").and_then(|p| text(p, "abbreviation")),
        team: team.name.clone(),
        team_id: Some(team.id.clone()),
        jersey: text(athlete, "jersey"),
        experience: experience.map(|e| e.max(0.0) as u32),
        college: athlete.get("college").and_then(|c| text(c, "name")),
        headshot: athlete.get("headshot").and_then(|h| text(h, "href")),
    })
}
