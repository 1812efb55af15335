//! Fantasy scoring.

use serde::{Deserialize, Serialize};

use crate::models::{stat_number, PlayerStatLine};

/// Scoring format; they differ only in points per reception.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringFormat {
    #[default]
    Ppr,
    Half,
    Standard,
}

/// Points awarded per unit of each statistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRules {
    pub passing_yard: f64,
    pub passing_touchdown: f64,
    pub interception: f64,
    pub rushing_yard: f64,
    pub rushing_touchdown: f64,
    pub reception: f64,
    pub receiving_yard: f64,
    pub receiving_touchdown: f64,
}

impl ScoringRules {
    pub fn for_format(format: ScoringFormat) -> Self {
        let reception = match format {
            ScoringFormat::Ppr => 1.0,
            ScoringFormat::Half => 0.5,
            ScoringFormat::Standard => 0.0,
        };
        Self {
            passing_yard: 0.04,
            passing_touchdown: 4.0,
            interception: -2.0,
            rushing_yard: 0.1,
            rushing_touchdown: 6.0,
            reception,
            receiving_yard: 0.1,
            receiving_touchdown: 6.0,
        }
    }

    pub fn ppr() -> Self {
        Self::for_format(ScoringFormat::Ppr)
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::ppr()
    }
}

/// Fantasy points for a stat line; missing stats count as zero.
pub fn fantasy_points(stats: &PlayerStatLine, rules: &ScoringRules) -> f64 {
    let passing = &stats.passing;
    let rushing = &stats.rushing;
    let receiving = &stats.receiving;

    stat_number(&passing.yards) * rules.passing_yard
        + stat_number(&passing.touchdowns) * rules.passing_touchdown
        + stat_number(&passing.interceptions) * rules.interception
        + stat_number(&rushing.yards) * rules.rushing_yard
        + stat_number(&rushing.touchdowns) * rules.rushing_touchdown
        + stat_number(&receiving.receptions) * rules.reception
        + stat_number(&receiving.yards) * rules.receiving_yard
        + stat_number(&receiving.touchdowns) * rules.receiving_touchdown
}
