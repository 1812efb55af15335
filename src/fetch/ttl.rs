//! URL-derived cache lifetimes.

use crate::config::TtlTable;

/// Picks a TTL from the shape of a request URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TtlPolicy {
    table: TtlTable,
}

impl TtlPolicy {
    pub fn new(table: TtlTable) -> Self {
        Self { table }
    }

    /// Roster paths → roster TTL, statistics → stats TTL, odds/score paths
    /// → live TTL, anything else → default. First match wins.
    pub fn ttl_for(&self, url: &str) -> u64 {
        let url = url.to_ascii_lowercase();
        if url.contains("roster") {
            self.table.roster_secs
        } else if url.contains("statistics") {
            self.table.stats_secs
        } else if url.contains("odds") || url.contains("score") {
            self.table.live_secs
        } else {
            self.table.default_secs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_table() {
        let policy = TtlPolicy::default();

        assert_eq!(policy.ttl_for("https://x/teams/12/roster?enable=roster,stats"), 86_400);
        assert_eq!(policy.ttl_for("https://x/seasons/2024/types/2/teams/1/statistics"), 3_600);
        assert_eq!(policy.ttl_for("https://x/events/1/competitions/1/odds"), 300);
        assert_eq!(policy.ttl_for("https://x/scoreboard"), 300);
        assert_eq!(policy.ttl_for("https://x/teams"), 3_600);
    }

    #[test]
    fn test_roster_wins_over_stats() {
        // the roster endpoint also asks for stats
        let policy = TtlPolicy::default();
        assert_eq!(policy.ttl_for("https://x/teams/1/roster?enable=statistics"), 86_400);
    }
}
