use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use super::domain::{
    achievements, Badge, CategoryPoints, HouseScore, PointAward, ScoreCategory,
    EARLY_FINISH_BONUS, EVENT_ATTENDANCE_BONUS, MONTH_WINDOW_DAYS, PERFECT_WEEK_BONUS,
    WEEK_WINDOW_DAYS,
};
use crate::workflows::roster::{AccessorError, HistoryAccessor, TaskStatus, STANDARD_HOUSES};

/// Seed for the stand-in categories. Fixed so repeated leaderboard calls
/// agree with each other and with the tests.
pub const DEFAULT_PLACEHOLDER_SEED: u64 = 42;

/// Bounds for the stand-in category values.
pub const PLACEHOLDER_POINT_MIN: u32 = 40;
pub const PLACEHOLDER_POINT_MAX: u32 = 90;

#[derive(Debug, thiserror::Error)]
pub enum CompetitionError {
    #[error("failed to score {house}: {source}")]
    HouseData {
        house: String,
        #[source]
        source: AccessorError,
    },
}

/// Stand-in values for teamwork, cleanliness, and participation.
///
/// No tracked signal exists for these categories yet, so each house gets a
/// bounded value from its own seeded stream: reproducible across calls, and
/// one house's draw never shifts another's.
/// TODO: replace with real telemetry once chore audits and attendance
/// check-ins record these signals.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderSignals {
    seed: Option<u64>,
}

impl PlaceholderSignals {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// All stand-in categories read zero. Used by tests and by deployments
    /// that prefer to wait for real signals.
    pub fn disabled() -> Self {
        Self { seed: None }
    }

    fn sample(&self, house_index: usize) -> (u32, u32, u32) {
        let Some(seed) = self.seed else {
            return (0, 0, 0);
        };

        let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(house_index as u64));
        let mut draw = || rng.gen_range(PLACEHOLDER_POINT_MIN..=PLACEHOLDER_POINT_MAX);
        (draw(), draw(), draw())
    }
}

impl Default for PlaceholderSignals {
    fn default() -> Self {
        Self::seeded(DEFAULT_PLACEHOLDER_SEED)
    }
}

/// Competition scoring engine. Reads chore and event history through the
/// accessor and returns freshly ranked standings; nothing is persisted.
pub struct CompetitionScorer<H> {
    accessor: Arc<H>,
    placeholders: PlaceholderSignals,
}

impl<H> CompetitionScorer<H>
where
    H: HistoryAccessor,
{
    pub fn new(accessor: Arc<H>) -> Self {
        Self::with_placeholders(accessor, PlaceholderSignals::default())
    }

    pub fn with_placeholders(accessor: Arc<H>, placeholders: PlaceholderSignals) -> Self {
        Self {
            accessor,
            placeholders,
        }
    }

    /// Ranked standings over the month window. A house whose data cannot be
    /// loaded stays in the list as a zero-valued entry so the leaderboard
    /// shape is stable for consumers.
    pub fn calculate_house_scores(&self, now: DateTime<Utc>) -> Vec<HouseScore> {
        self.scores_for_window(MONTH_WINDOW_DAYS, now)
    }

    pub(crate) fn scores_for_window(&self, window_days: i64, now: DateTime<Utc>) -> Vec<HouseScore> {
        let mut scores: Vec<HouseScore> = STANDARD_HOUSES
            .iter()
            .enumerate()
            .map(|(index, house)| {
                let categories = match self.categories(house, index, window_days, now) {
                    Ok(categories) => categories,
                    Err(error) => {
                        warn!(%house, %error, "scoring failed, emitting zeroed entry");
                        CategoryPoints::default()
                    }
                };
                let total_points = categories.total();
                HouseScore {
                    house: house.to_string(),
                    categories,
                    total_points,
                    rank: 0,
                    badge: Badge::from_points(total_points),
                    achievements: achievements(&categories, total_points),
                }
            })
            .collect();

        // Stable sort: equal totals keep the fixed house order.
        scores.sort_by(|a, b| b.total_points.cmp(&a.total_points));
        for (index, score) in scores.iter_mut().enumerate() {
            score.rank = index as u32 + 1;
        }

        scores
    }

    fn categories(
        &self,
        house: &str,
        house_index: usize,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Result<CategoryPoints, CompetitionError> {
        let wrap = |source: AccessorError| CompetitionError::HouseData {
            house: house.to_string(),
            source,
        };

        let members = self.accessor.house_members(house).map_err(wrap)?;

        let window_start = now - Duration::days(window_days);
        let week_start = now - Duration::days(WEEK_WINDOW_DAYS);

        let mut recent = 0u32;
        let mut recent_completed = 0u32;
        let mut early_finishes = 0u32;
        let mut week_recent = 0u32;
        let mut week_completed = 0u32;

        for member in &members {
            let records = match self.accessor.member_task_history(&member.id) {
                Ok(records) => records,
                Err(error) => {
                    warn!(
                        member = %member.display_name,
                        %error,
                        "history unavailable, excluding member from scoring"
                    );
                    continue;
                }
            };

            for record in &records {
                let done = record.status == TaskStatus::Completed;

                if record.created_at >= window_start {
                    recent += 1;
                    if done {
                        recent_completed += 1;
                        let before_due = record
                            .due_date
                            .map_or(false, |due| record.updated_at < due);
                        if before_due {
                            early_finishes += 1;
                        }
                    }
                }

                if record.created_at >= week_start {
                    week_recent += 1;
                    if done {
                        week_completed += 1;
                    }
                }
            }
        }

        let completion_base = if recent > 0 {
            (f64::from(recent_completed) / f64::from(recent) * 100.0).floor() as u32
        } else {
            0
        };
        let perfect_week = week_recent > 0 && week_completed == week_recent;
        let chore_completion = completion_base
            + early_finishes * EARLY_FINISH_BONUS
            + if perfect_week { PERFECT_WEEK_BONUS } else { 0 };

        let events = self
            .accessor
            .events_in_range(window_start, now)
            .map_err(wrap)?;
        let attended = events.iter().filter(|event| event.involves(house)).count() as u32;
        let punctuality = attended * EVENT_ATTENDANCE_BONUS;

        let (teamwork, cleanliness, participation) = self.placeholders.sample(house_index);

        Ok(CategoryPoints {
            chore_completion,
            punctuality,
            teamwork,
            cleanliness,
            participation,
        })
    }

    /// Build the activity record for a manual point grant. The caller owns
    /// persistence; the engine never writes.
    pub fn award_points(
        &self,
        house: &str,
        category: ScoreCategory,
        points: u32,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> PointAward {
        PointAward {
            house: house.to_string(),
            category,
            points,
            reason: reason.into(),
            awarded_at: now,
        }
    }
}
