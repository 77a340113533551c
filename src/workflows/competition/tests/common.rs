use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::workflows::competition::{CompetitionScorer, PlaceholderSignals};
use crate::workflows::roster::{
    AccessorError, HistoryAccessor, InMemoryHistory, Member, MemberId, ScheduledEvent, TaskRecord,
    TaskStatus,
};

/// Fixed evaluation instant inside the season.
pub(super) fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0).single().expect("valid reference time")
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

pub(super) fn event(title: &str, participants: &str, days_ago: i64) -> ScheduledEvent {
    ScheduledEvent {
        title: title.to_string(),
        participants: participants.to_string(),
        date: reference_time() - Duration::days(days_ago),
    }
}

/// Give one member of `house` a weekly chore sheet: `total` chores opened
/// over the past week, of which `completed` are done.
pub(super) fn add_weekly_sheet(
    history: &mut InMemoryHistory,
    house: &str,
    member_id: &str,
    total: u32,
    completed: u32,
) {
    history.add_member(member(member_id, member_id, house));
    let id = MemberId(member_id.to_string());
    for index in 0..total {
        let status = if index < completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        };
        history.add_task(&id, task("Kitchen Cleaning", status, i64::from(index) + 1));
    }
}

/// Houses at 100% / 75% / 50% weekly completion, no events.
pub(super) fn scenario_history() -> InMemoryHistory {
    let mut history = InMemoryHistory::new();
    add_weekly_sheet(&mut history, "North House", "north-1", 4, 4);
    add_weekly_sheet(&mut history, "South House", "south-1", 4, 3);
    add_weekly_sheet(&mut history, "West House", "west-1", 4, 2);
    history
}

pub(super) fn quiet_scorer(history: InMemoryHistory) -> CompetitionScorer<InMemoryHistory> {
    CompetitionScorer::with_placeholders(Arc::new(history), PlaceholderSignals::disabled())
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

/// Wraps an inner accessor and fails selected `events_in_range` calls,
/// counted from 1 in call order. The scorer queries events once per house in
/// fixed house order, so call numbers map directly onto houses.
pub(super) struct EventOutageHistory {
    pub(super) inner: InMemoryHistory,
    pub(super) failing_calls: Vec<usize>,
    counter: AtomicUsize,
}

impl EventOutageHistory {
    pub(super) fn new(inner: InMemoryHistory, failing_calls: Vec<usize>) -> Self {
        Self {
            inner,
            failing_calls,
            counter: AtomicUsize::new(0),
        }
    }
}

impl HistoryAccessor for EventOutageHistory {
    fn house_members(&self, house: &str) -> Result<Vec<Member>, AccessorError> {
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
        let call = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing_calls.contains(&call) {
            return Err(AccessorError::Unavailable("calendar offline".to_string()));
        }
        self.inner.events_in_range(start, end)
    }
}
