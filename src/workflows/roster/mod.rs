//! Roster and history access for the residency program.
//!
//! The engines never own chore, event, or member records; everything is read
//! through the [`HistoryAccessor`] trait so the production storage layer and
//! the in-memory test/demo implementation are interchangeable.

pub mod demo;
pub mod import;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three residency houses. Order is fixed: batch operations process
/// houses in this order and leaderboard ties resolve by it.
pub const STANDARD_HOUSES: [&str; 3] = ["North House", "South House", "West House"];

/// Identifier wrapper for residency members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub String);

/// A person belonging to exactly one house at a time. Owned by the external
/// roster store; the engines only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
    pub house: String,
}

/// Lifecycle state of a tracked chore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" | "in progress" => Some(TaskStatus::InProgress),
            "completed" | "complete" | "done" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Raw chore record as supplied by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub title: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Calendar entry used for punctuality scoring. `participants` names a house
/// or the literal "all".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub title: String,
    pub participants: String,
    pub date: DateTime<Utc>,
}

impl ScheduledEvent {
    /// Whether the event counts toward the given house.
    pub fn involves(&self, house: &str) -> bool {
        let participants = self.participants.trim();
        participants.eq_ignore_ascii_case("all") || participants.eq_ignore_ascii_case(house)
    }
}

/// Error enumeration for history-source failures.
#[derive(Debug, thiserror::Error)]
pub enum AccessorError {
    #[error("house '{0}' is not part of the residency roster")]
    UnknownHouse(String),
    #[error("history source unavailable: {0}")]
    Unavailable(String),
}

/// Read-only data source the engines depend on. The order of
/// `house_members` results is significant: assignment tie-breaking follows
/// it, so implementations must return a stable roster order.
pub trait HistoryAccessor: Send + Sync {
    fn house_members(&self, house: &str) -> Result<Vec<Member>, AccessorError>;

    fn member_task_history(&self, member: &MemberId) -> Result<Vec<TaskRecord>, AccessorError>;

    fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ScheduledEvent>, AccessorError>;
}

/// In-memory accessor backing the CLI, the demo server, and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryHistory {
    members: Vec<Member>,
    tasks: HashMap<MemberId, Vec<TaskRecord>>,
    events: Vec<ScheduledEvent>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, member: Member) {
        self.members.push(member);
    }

    pub fn add_task(&mut self, member: &MemberId, record: TaskRecord) {
        self.tasks.entry(member.clone()).or_default().push(record);
    }

    pub fn add_event(&mut self, event: ScheduledEvent) {
        self.events.push(event);
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

impl HistoryAccessor for InMemoryHistory {
    fn house_members(&self, house: &str) -> Result<Vec<Member>, AccessorError> {
        let members: Vec<Member> = self
            .members
            .iter()
            .filter(|member| member.house.eq_ignore_ascii_case(house))
            .cloned()
            .collect();
        Ok(members)
    }

    fn member_task_history(&self, member: &MemberId) -> Result<Vec<TaskRecord>, AccessorError> {
        Ok(self.tasks.get(member).cloned().unwrap_or_default())
    }

    fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ScheduledEvent>, AccessorError> {
        Ok(self
            .events
            .iter()
            .filter(|event| event.date >= start && event.date <= end)
            .cloned()
            .collect())
    }
}
