use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::workflows::roster::{
    AccessorError, HistoryAccessor, InMemoryHistory, Member, MemberId, ScheduledEvent, TaskRecord,
    TaskStatus,
};
use crate::workflows::rotation::{FairnessScorer, RotationAssigner, RotationWeights};

/// Fixed evaluation instant so score arithmetic is reproducible.
pub(super) fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 6, 12, 0, 0).single().expect("valid reference time")
}

pub(super) fn member(id: &str, name: &str, house: &str) -> Member {
    Member {
        id: MemberId(id.to_string()),
        display_name: name.to_string(),
        house: house.to_string(),
    }
}

pub(super) fn task(title: &str, status: TaskStatus, days_ago: i64) -> TaskRecord {
    let created_at = reference_time() - Duration::days(days_ago);
    TaskRecord {
        title: title.to_string(),
        status,
        created_at,
        updated_at: created_at,
        due_date: None,
    }
}

pub(super) fn completed(title: &str, days_ago: i64) -> TaskRecord {
    task(title, TaskStatus::Completed, days_ago)
}

/// `count` completed filler chores spread one per day into the past.
pub(super) fn filler_history(count: u32) -> Vec<TaskRecord> {
    (0..count)
        .map(|offset| completed("Common Area Tidy", i64::from(offset) + 1))
        .collect()
}

pub(super) fn assigner(history: InMemoryHistory) -> RotationAssigner<InMemoryHistory> {
    RotationAssigner::new(Arc::new(history), FairnessScorer::new(RotationWeights::default()))
}

pub(super) fn chores(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Accessor that cannot even enumerate members.
pub(super) struct UnavailableHistory;

impl HistoryAccessor for UnavailableHistory {
    fn house_members(&self, _house: &str) -> Result<Vec<Member>, AccessorError> {
        Err(AccessorError::Unavailable("roster store offline".to_string()))
    }

    fn member_task_history(&self, _member: &MemberId) -> Result<Vec<TaskRecord>, AccessorError> {
        Err(AccessorError::Unavailable("roster store offline".to_string()))
    }

    fn events_in_range(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<ScheduledEvent>, AccessorError> {
        Err(AccessorError::Unavailable("roster store offline".to_string()))
    }
}

/// Wraps an inner accessor and fails task-history lookups for one member.
pub(super) struct FlakyMemberHistory {
    pub(super) inner: InMemoryHistory,
    pub(super) failing_member: MemberId,
}

impl HistoryAccessor for FlakyMemberHistory {
    fn house_members(&self, house: &str) -> Result<Vec<Member>, AccessorError> {
        self.inner.house_members(house)
    }

    fn member_task_history(&self, member: &MemberId) -> Result<Vec<TaskRecord>, AccessorError> {
        if member == &self.failing_member {
            return Err(AccessorError::Unavailable("record corrupted".to_string()));
        }
        self.inner.member_task_history(member)
    }

    fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ScheduledEvent>, AccessorError> {
        self.inner.events_in_range(start, end)
    }
}

/// Wraps an inner accessor and fails roster lookups for one house.
pub(super) struct FlakyHouseHistory {
    pub(super) inner: InMemoryHistory,
    pub(super) failing_house: String,
}

impl HistoryAccessor for FlakyHouseHistory {
    fn house_members(&self, house: &str) -> Result<Vec<Member>, AccessorError> {
        if house.eq_ignore_ascii_case(&self.failing_house) {
            return Err(AccessorError::Unavailable("shard offline".to_string()));
        }
        self.inner.house_members(house)
    }

    fn member_task_history(&self, member: &MemberId) -> Result<Vec<TaskRecord>, AccessorError> {
        self.inner.member_task_history(member)
    }

    fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ScheduledEvent>, AccessorError> {
        self.inner.events_in_range(start, end)
    }
}

/// Three-member North House roster with distinct workloads: Avery carries 8
/// chores, Blake 4, and Casey none.
pub(super) fn north_house() -> InMemoryHistory {
    let mut history = InMemoryHistory::new();
    history.add_member(member("m-avery", "Avery", "North House"));
    history.add_member(member("m-blake", "Blake", "North House"));
    history.add_member(member("m-casey", "Casey", "North House"));

    for record in filler_history(8) {
        history.add_task(&MemberId("m-avery".to_string()), record);
    }
    for record in filler_history(4) {
        history.add_task(&MemberId("m-blake".to_string()), record);
    }

    history
}
