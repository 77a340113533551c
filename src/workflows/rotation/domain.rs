use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::roster::{MemberId, TaskRecord, TaskStatus};

/// The recurring chores every house rotates through each week, in the order
/// they are assigned.
pub const STANDARD_CHORES: [&str; 6] = [
    "Kitchen Cleaning",
    "Bathroom Cleaning",
    "Common Area Tidy",
    "Trash & Recycling",
    "Laundry Room",
    "Equipment Storage",
];

/// Days of silence after which a member counts as maximally stale.
pub const NEVER_ASSIGNED_STALENESS_DAYS: f64 = 30.0;

/// Per-member chore history, derived fresh from raw task records on every
/// call. Nothing here is persisted or written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoreHistory {
    pub total_assigned: u32,
    pub total_completed: u32,
    pub last_assignment: Option<DateTime<Utc>>,
    /// Past assignment counts per task type, keyed by the case-normalized
    /// task label.
    pub type_experience: BTreeMap<String, u32>,
}

impl ChoreHistory {
    pub fn from_records(records: &[TaskRecord]) -> Self {
        let mut history = ChoreHistory::default();

        for record in records {
            history.total_assigned += 1;
            if record.status == TaskStatus::Completed {
                history.total_completed += 1;
            }

            let newer = history
                .last_assignment
                .map_or(true, |latest| record.created_at > latest);
            if newer {
                history.last_assignment = Some(record.created_at);
            }

            *history
                .type_experience
                .entry(normalize_task_type(&record.title))
                .or_insert(0) += 1;
        }

        history
    }

    /// Fraction of assigned chores that were completed; 0 when nothing has
    /// been assigned yet.
    pub fn completion_rate(&self) -> f64 {
        if self.total_assigned == 0 {
            return 0.0;
        }
        f64::from(self.total_completed) / f64::from(self.total_assigned)
    }

    /// Reliability proxy in [2,5], a step function of the completion rate.
    /// Keeps scoring bounded without a separate rating subsystem.
    pub fn average_rating(&self) -> f64 {
        let rate = self.completion_rate();
        if rate > 0.8 {
            5.0
        } else if rate > 0.6 {
            4.0
        } else if rate > 0.4 {
            3.0
        } else {
            2.0
        }
    }

    /// Past assignments of the given task type.
    pub fn experience_with(&self, task_type: &str) -> u32 {
        self.type_experience
            .get(&normalize_task_type(task_type))
            .copied()
            .unwrap_or(0)
    }
}

pub(crate) fn normalize_task_type(label: &str) -> String {
    label.trim().to_lowercase()
}

/// One chore handed to one member for the current cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub task_type: String,
    pub member_id: MemberId,
    pub member_name: String,
    pub score: f64,
}

/// Result of a single rotation cycle for one house.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationOutcome {
    pub assignments: Vec<Assignment>,
    pub explanation: Vec<String>,
}

/// One house's entry in the weekly batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseRotation {
    pub house: String,
    #[serde(flatten)]
    pub outcome: RotationOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(title: &str, status: TaskStatus, day: u32) -> TaskRecord {
        let created_at = Utc.with_ymd_and_hms(2025, 9, day, 9, 0, 0).unwrap();
        TaskRecord {
            title: title.to_string(),
            status,
            created_at,
            updated_at: created_at,
            due_date: None,
        }
    }

    #[test]
    fn history_derives_counts_and_latest_assignment() {
        let records = vec![
            record("Kitchen Cleaning", TaskStatus::Completed, 1),
            record("kitchen cleaning ", TaskStatus::Completed, 8),
            record("Laundry Room", TaskStatus::Pending, 15),
        ];

        let history = ChoreHistory::from_records(&records);

        assert_eq!(history.total_assigned, 3);
        assert_eq!(history.total_completed, 2);
        assert_eq!(
            history.last_assignment,
            Some(Utc.with_ymd_and_hms(2025, 9, 15, 9, 0, 0).unwrap())
        );
        assert_eq!(history.experience_with("Kitchen Cleaning"), 2);
        assert_eq!(history.experience_with("LAUNDRY ROOM"), 1);
        assert_eq!(history.experience_with("Equipment Storage"), 0);
    }

    #[test]
    fn empty_history_uses_documented_defaults() {
        let history = ChoreHistory::from_records(&[]);

        assert_eq!(history.total_assigned, 0);
        assert_eq!(history.completion_rate(), 0.0);
        assert_eq!(history.average_rating(), 2.0);
        assert!(history.last_assignment.is_none());
    }

    #[test]
    fn average_rating_steps_at_documented_boundaries() {
        let cases = [
            (10, 9, 5.0),  // 0.9  > 0.8
            (10, 8, 4.0),  // 0.8 is not > 0.8
            (10, 7, 4.0),  // 0.7  > 0.6
            (10, 5, 3.0),  // 0.5  > 0.4
            (10, 4, 2.0),  // 0.4 is not > 0.4
            (10, 0, 2.0),
        ];

        for (assigned, completed, expected) in cases {
            let history = ChoreHistory {
                total_assigned: assigned,
                total_completed: completed,
                ..ChoreHistory::default()
            };
            assert_eq!(
                history.average_rating(),
                expected,
                "rating for {completed}/{assigned}"
            );
        }
    }
}
