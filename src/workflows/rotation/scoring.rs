use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ChoreHistory, NEVER_ASSIGNED_STALENESS_DAYS};

pub const DEFAULT_FAIRNESS_WEIGHT: f64 = 0.6;
pub const DEFAULT_SKILL_WEIGHT: f64 = 0.2;
pub const DEFAULT_AVAILABILITY_WEIGHT: f64 = 0.2;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weighting of the three assignability components. The weights must sum to
/// 1.0; [`RotationWeights::new`] rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationWeights {
    pub fairness: f64,
    pub skill: f64,
    pub availability: f64,
}

impl RotationWeights {
    pub fn new(fairness: f64, skill: f64, availability: f64) -> Result<Self, WeightError> {
        let sum = fairness + skill + availability;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightError::InvalidSum { sum });
        }
        Ok(Self {
            fairness,
            skill,
            availability,
        })
    }
}

impl Default for RotationWeights {
    fn default() -> Self {
        Self {
            fairness: DEFAULT_FAIRNESS_WEIGHT,
            skill: DEFAULT_SKILL_WEIGHT,
            availability: DEFAULT_AVAILABILITY_WEIGHT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WeightError {
    #[error("rotation weights must sum to 1.0, got {sum}")]
    InvalidSum { sum: f64 },
}

/// Component breakdown for one (member, task type) pair. Lower total means
/// more eligible; the assigner minimizes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssignabilityScore {
    pub fairness: f64,
    pub skill: f64,
    pub availability: f64,
    pub total: f64,
}

/// Stateless scorer producing a single comparable cost per candidate.
pub struct FairnessScorer {
    weights: RotationWeights,
}

impl FairnessScorer {
    pub fn new(weights: RotationWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> RotationWeights {
        self.weights
    }

    /// Score one member for one task type against the house-wide average
    /// workload. `now` is supplied by the caller so a cycle is reproducible.
    pub fn score(
        &self,
        history: &ChoreHistory,
        house_average: f64,
        task_type: &str,
        now: DateTime<Utc>,
    ) -> AssignabilityScore {
        let fairness = self.fairness_component(history, house_average, now);
        let skill = skill_component(history, task_type);
        // Availability has no tracked signal yet; every member counts as
        // fully available until scheduling data is wired in.
        let availability = 1.0;

        let total = fairness * self.weights.fairness
            + (-skill) * self.weights.skill
            + (-availability) * self.weights.availability;

        AssignabilityScore {
            fairness,
            skill,
            availability,
            total,
        }
    }

    fn fairness_component(
        &self,
        history: &ChoreHistory,
        house_average: f64,
        now: DateTime<Utc>,
    ) -> f64 {
        let workload_gap = f64::from(history.total_assigned) - house_average;

        let days_since_last = match history.last_assignment {
            Some(last) => ((now - last).num_seconds() as f64 / 86_400.0).max(0.0),
            None => NEVER_ASSIGNED_STALENESS_DAYS,
        };
        let recency_factor = (days_since_last / 7.0).min(1.0);

        workload_gap - recency_factor * 2.0
    }
}

fn skill_component(history: &ChoreHistory, task_type: &str) -> f64 {
    let type_exp = f64::from(history.experience_with(task_type));
    let total_exp = f64::from(history.total_completed.max(1));

    (type_exp / total_exp) * history.completion_rate() * history.average_rating()
}
