//! Page Managers
//!
//! Derived collections behind the dashboard, teams, players and lineup
//! pages. Each manager loads through [`crate::service::NflDataService`] and
//! degrades a failed lookup to an empty or zeroed entry.

mod dashboard;
mod lineups;
mod players;
mod teams;

pub use dashboard::{Dashboard, DashboardManager, Insight, SectionReport, SECTION_COUNT, TOP_N};
pub use lineups::{Lineup, LineupManager, LineupSlot};
pub use players::{PlayerFilter, PlayerSort, PlayersManager};
pub use teams::{TeamFilter, TeamSort, TeamsManager};

/// Exact match on a choice field; `None`, empty and `"ALL"` match anything.
pub(crate) fn matches_choice(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted.map(str::trim) {
        None => true,
        Some(w) if w.is_empty() || w.eq_ignore_ascii_case("ALL") => true,
        Some(w) => actual.map(|a| a.eq_ignore_ascii_case(w)).unwrap_or(false),
    }
}

/// Case-insensitive substring match.
pub(crate) fn matches_search(search: &str, name: &str) -> bool {
    name.to_lowercase().contains(&search.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_choice() {
        assert!(matches_choice(None, None));
        assert!(matches_choice(Some("ALL"), Some("AFC")));
        assert!(matches_choice(Some("afc"), Some("AFC")));
        assert!(!matches_choice(Some("NFC"), Some("AFC")));
        assert!(!matches_choice(Some("NFC"), None));
    }

    #[test]
    fn test_matches_search() {
        assert!(matches_search("", "Chiefs"));
        assert!(matches_search(" chi ", "Chiefs"));
        assert!(!matches_search("bills", "Chiefs"));
    }
}
