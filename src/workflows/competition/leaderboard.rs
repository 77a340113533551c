use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::domain::{HouseScore, WEEK_WINDOW_DAYS};
use super::scorer::CompetitionScorer;
use crate::workflows::roster::HistoryAccessor;

/// Competition season bounds. Progress is reported against this range.
pub const SEASON_START: (i32, u32, u32) = (2025, 9, 1);
pub const SEASON_END: (i32, u32, u32) = (2026, 6, 30);

/// Leaderboard view combining monthly standings, the weekly sprint, and how
/// far into the season we are.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub standings: Vec<HouseScore>,
    pub weekly: Vec<HouseScore>,
    /// Percentage of the season elapsed, clamped to [0,100].
    pub season_progress: f64,
}

impl<H> CompetitionScorer<H>
where
    H: HistoryAccessor,
{
    pub fn leaderboard(&self, now: DateTime<Utc>) -> Leaderboard {
        Leaderboard {
            standings: self.calculate_house_scores(now),
            weekly: self.scores_for_window(WEEK_WINDOW_DAYS, now),
            season_progress: season_progress(now),
        }
    }
}

pub fn season_progress(now: DateTime<Utc>) -> f64 {
    let (sy, sm, sd) = SEASON_START;
    let (ey, em, ed) = SEASON_END;
    let start = season_instant(sy, sm, sd);
    let end = season_instant(ey, em, ed);

    let span = (end - start).num_seconds();
    if span <= 0 {
        return 100.0;
    }

    let elapsed = (now - start).num_seconds();
    (elapsed as f64 / span as f64 * 100.0).clamp(0.0, 100.0)
}

fn season_instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .expect("season bounds are valid calendar dates")
}
