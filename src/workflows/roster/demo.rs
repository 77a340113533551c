//! Deterministic demo dataset for the CLI and the development server.
//!
//! Three houses with uneven workloads and completion habits, built relative
//! to a caller-supplied reference time so demo output is stable.

use chrono::{DateTime, Duration, Utc};

use super::{InMemoryHistory, Member, MemberId, ScheduledEvent, TaskRecord, TaskStatus};

struct DemoMember {
    id: &'static str,
    name: &'static str,
    house: &'static str,
    /// (task title, status, created days ago, due in days relative to creation)
    chores: &'static [(&'static str, TaskStatus, i64, Option<i64>)],
}

const ROSTER: &[DemoMember] = &[
    DemoMember {
        id: "nh-01",
        name: "Jordan Avery",
        house: "North House",
        chores: &[
            ("Kitchen Cleaning", TaskStatus::Completed, 2, Some(1)),
            ("Kitchen Cleaning", TaskStatus::Completed, 9, Some(2)),
            ("Trash & Recycling", TaskStatus::Completed, 16, None),
            ("Kitchen Cleaning", TaskStatus::Completed, 23, Some(1)),
        ],
    },
    DemoMember {
        id: "nh-02",
        name: "Sam Rios",
        house: "North House",
        chores: &[
            ("Bathroom Cleaning", TaskStatus::Completed, 3, Some(2)),
            ("Laundry Room", TaskStatus::Completed, 10, None),
        ],
    },
    DemoMember {
        id: "nh-03",
        name: "Alex Okafor",
        house: "North House",
        chores: &[],
    },
    DemoMember {
        id: "sh-01",
        name: "Riley Chen",
        house: "South House",
        chores: &[
            ("Common Area Tidy", TaskStatus::Completed, 4, None),
            ("Equipment Storage", TaskStatus::Pending, 1, Some(3)),
            ("Common Area Tidy", TaskStatus::Completed, 11, None),
            ("Kitchen Cleaning", TaskStatus::Completed, 18, Some(2)),
            ("Trash & Recycling", TaskStatus::Completed, 25, None),
        ],
    },
    DemoMember {
        id: "sh-02",
        name: "Morgan Diallo",
        house: "South House",
        chores: &[
            ("Laundry Room", TaskStatus::Pending, 2, Some(2)),
            ("Bathroom Cleaning", TaskStatus::InProgress, 6, None),
            ("Laundry Room", TaskStatus::Completed, 13, None),
        ],
    },
    DemoMember {
        id: "sh-03",
        name: "Casey Lindqvist",
        house: "South House",
        chores: &[
            ("Equipment Storage", TaskStatus::Completed, 5, Some(1)),
        ],
    },
    DemoMember {
        id: "wh-01",
        name: "Dakota Reyes",
        house: "West House",
        chores: &[
            ("Kitchen Cleaning", TaskStatus::Pending, 1, Some(2)),
            ("Common Area Tidy", TaskStatus::Pending, 8, None),
            ("Trash & Recycling", TaskStatus::Completed, 15, None),
        ],
    },
    DemoMember {
        id: "wh-02",
        name: "Quinn Marsh",
        house: "West House",
        chores: &[
            ("Bathroom Cleaning", TaskStatus::Completed, 4, Some(1)),
            ("Laundry Room", TaskStatus::Completed, 12, None),
            ("Equipment Storage", TaskStatus::Completed, 20, None),
        ],
    },
];

const EVENTS: &[(&str, &str, i64)] = &[
    ("All-Residency Training", "all", 2),
    ("North House Film Night", "North House", 4),
    ("South House Study Hall", "South House", 5),
    ("Facility Deep Clean", "all", 12),
    ("West House Scrimmage", "West House", 20),
];

/// Build the demo accessor relative to `reference`.
pub fn demo_history(reference: DateTime<Utc>) -> InMemoryHistory {
    let mut history = InMemoryHistory::new();

    for entry in ROSTER {
        let member_id = MemberId(entry.id.to_string());
        history.add_member(Member {
            id: member_id.clone(),
            display_name: entry.name.to_string(),
            house: entry.house.to_string(),
        });

        for (title, status, days_ago, due_offset) in entry.chores {
            let created_at = reference - Duration::days(*days_ago);
            let updated_at = match status {
                TaskStatus::Completed => created_at + Duration::hours(20),
                _ => created_at,
            };
            history.add_task(
                &member_id,
                TaskRecord {
                    title: title.to_string(),
                    status: *status,
                    created_at,
                    updated_at,
                    due_date: due_offset.map(|days| created_at + Duration::days(days)),
                },
            );
        }
    }

    for (title, participants, days_ago) in EVENTS {
        history.add_event(ScheduledEvent {
            title: title.to_string(),
            participants: participants.to_string(),
            date: reference - Duration::days(*days_ago),
        });
    }

    history
}
