//! Pregame and in-game prediction math.

use crate::models::{LivePrediction, LiveSnapshot, TeamPerformanceMetrics};

/// Added to the home side's expected margin.
pub const HOME_FIELD_ADVANTAGE: f64 = 3.0;

const QUARTER_SECS: f64 = 15.0 * 60.0;
const REGULATION_SECS: f64 = 4.0 * QUARTER_SECS;

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Expected home margin: `(homePPG - awayPAPG) - (awayPPG - homePAPG) + 3`,
/// one decimal. `None` when any input is missing.
pub fn predict_spread(home: &TeamPerformanceMetrics, away: &TeamPerformanceMetrics) -> Option<f64> {
    let home_ppg = home.offense.points_per_game.as_ref()?.value?;
    let home_papg = home.defense.points_allowed_per_game.as_ref()?.value?;
    let away_ppg = away.offense.points_per_game.as_ref()?.value?;
    let away_papg = away.defense.points_allowed_per_game.as_ref()?.value?;

    let home_edge = home_ppg - away_papg;
    let away_edge = away_ppg - home_papg;
    Some(round_to_tenth(home_edge - away_edge + HOME_FIELD_ADVANTAGE))
}

/// Expected combined score, rounded to a whole point.
pub fn predict_total(home: &TeamPerformanceMetrics, away: &TeamPerformanceMetrics) -> Option<f64> {
    let home_ppg = home.offense.points_per_game.as_ref()?.value?;
    let away_ppg = away.offense.points_per_game.as_ref()?.value?;
    Some((home_ppg + away_ppg).round())
}

/// Share of regulation played, from period and seconds left in it.
pub fn elapsed_fraction(snapshot: &LiveSnapshot) -> f64 {
    match snapshot.state.as_deref() {
        Some("post") => return 1.0,
        Some("pre") => return 0.0,
        _ => {}
    }
    match snapshot.period {
        0 => 0.0,
        p if p > 4 => 1.0,
        p => {
            let left = snapshot.clock_seconds.clamp(0.0, QUARTER_SECS);
            let elapsed = (p - 1) as f64 * QUARTER_SECS + (QUARTER_SECS - left);
            (elapsed / REGULATION_SECS).clamp(0.0, 1.0)
        }
    }
}

/// Margin and total projected forward at the current scoring pace.
pub fn live_prediction(snapshot: &LiveSnapshot) -> LivePrediction {
    let margin = snapshot.home_score as i64 - snapshot.away_score as i64;
    let total = u64::from(snapshot.home_score) + u64::from(snapshot.away_score);
    let fraction = elapsed_fraction(snapshot);

    let project = |current: f64| {
        if fraction > 0.0 {
            Some(round_to_tenth(current / fraction))
        } else {
            None
        }
    };

    LivePrediction {
        game_id: snapshot.game_id.clone(),
        margin,
        total,
        elapsed_fraction: fraction,
        projected_margin: project(margin as f64),
        projected_total: project(total as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatValue;

    fn metrics(ppg: f64, papg: f64) -> TeamPerformanceMetrics {
        let stat = |v: f64| {
            Some(StatValue {
                value: Some(v),
                display_value: v.to_string(),
                rank: None,
            })
        };
        let mut m = TeamPerformanceMetrics::default();
        m.offense.points_per_game = stat(ppg);
        m.defense.points_allowed_per_game = stat(papg);
        m
    }

    #[test]
    fn test_pregame_spread_and_total() {
        let home = metrics(27.4, 19.1);
        let away = metrics(22.0, 23.3);

        // (27.4 - 23.3) - (22.0 - 19.1) + 3 = 4.2
        assert_eq!(predict_spread(&home, &away), Some(4.2));
        assert_eq!(predict_total(&home, &away), Some(49.0));
    }

    #[test]
    fn test_missing_inputs() {
        let home = metrics(27.4, 19.1);
        let empty = TeamPerformanceMetrics::default();
        assert_eq!(predict_spread(&home, &empty), None);
        assert_eq!(predict_total(&empty, &home), None);
    }

    fn snapshot(period: u32, clock: f64, home: u32, away: u32) -> LiveSnapshot {
        LiveSnapshot {
            game_id: "401".into(),
            home_score: home,
            away_score: away,
            period,
            clock_seconds: clock,
            state: Some("in".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_elapsed_fraction() {
        assert_eq!(elapsed_fraction(&snapshot(0, 900.0, 0, 0)), 0.0);
        assert_eq!(elapsed_fraction(&snapshot(2, 0.0, 0, 0)), 0.5);
        assert_eq!(elapsed_fraction(&snapshot(3, 450.0, 0, 0)), 0.625);
        assert_eq!(elapsed_fraction(&snapshot(5, 300.0, 0, 0)), 1.0);

        let mut done = snapshot(4, 0.0, 0, 0);
        done.state = Some("post".into());
        assert_eq!(elapsed_fraction(&done), 1.0);
    }

    #[test]
    fn test_live_projection_at_halftime() {
        let prediction = live_prediction(&snapshot(2, 0.0, 17, 10));

        assert_eq!(prediction.margin, 7);
        assert_eq!(prediction.total, 27);
        assert_eq!(prediction.projected_margin, Some(14.0));
        assert_eq!(prediction.projected_total, Some(54.0));
    }

    #[test]
    fn test_no_projection_before_kickoff() {
        let prediction = live_prediction(&snapshot(0, 900.0, 0, 0));
        assert_eq!(prediction.projected_total, None);
        assert_eq!(prediction.projected_margin, None);
    }

    #[test]
    fn test_extreme_scores_do_not_overflow() {
        let prediction = live_prediction(&snapshot(2, 0.0, u32::MAX, 1));

        assert_eq!(prediction.total, u64::from(u32::MAX) + 1);
        assert_eq!(prediction.margin, i64::from(u32::MAX) - 1);
        assert!(prediction.projected_total.is_some());
    }
}
