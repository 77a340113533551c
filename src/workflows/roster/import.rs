//! Chore-tracker CSV import.
//!
//! Hydrates an [`InMemoryHistory`] from the tracker's export so the CLI and
//! the demo server can run the engines against real data. Expected columns:
//! `Member ID`, `Member Name`, `House`, `Task`, `Status`, `Created At`,
//! `Updated At`, `Due Date`. Timestamps are RFC 3339 or bare `YYYY-MM-DD`
//! dates (taken as midnight UTC); `Due Date` may be empty.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use super::{InMemoryHistory, Member, MemberId, ScheduledEvent, TaskRecord, TaskStatus};

#[derive(Debug, thiserror::Error)]
pub enum HistoryImportError {
    #[error("failed to read history export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse history export: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

pub struct HistoryImporter;

impl HistoryImporter {
    pub fn from_path(path: impl AsRef<Path>) -> Result<InMemoryHistory, HistoryImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<InMemoryHistory, HistoryImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut history = InMemoryHistory::new();
        let mut known_members: Vec<MemberId> = Vec::new();

        for (index, record) in csv_reader.deserialize::<HistoryRow>().enumerate() {
            let row_number = index + 2; // header is row 1
            let row = record?;

            let member_id = MemberId(row.member_id.clone());
            if !known_members.contains(&member_id) {
                history.add_member(Member {
                    id: member_id.clone(),
                    display_name: row.member_name.clone(),
                    house: row.house.clone(),
                });
                known_members.push(member_id.clone());
            }

            let status = TaskStatus::from_label(&row.status).ok_or_else(|| {
                HistoryImportError::InvalidRow {
                    row: row_number,
                    message: format!("unrecognized status '{}'", row.status),
                }
            })?;

            let created_at = parse_timestamp(&row.created_at).ok_or_else(|| {
                HistoryImportError::InvalidRow {
                    row: row_number,
                    message: format!("unparseable Created At '{}'", row.created_at),
                }
            })?;

            let updated_at = match row.updated_at.as_deref() {
                Some(raw) => parse_timestamp(raw).ok_or_else(|| HistoryImportError::InvalidRow {
                    row: row_number,
                    message: format!("unparseable Updated At '{raw}'"),
                })?,
                None => created_at,
            };

            let due_date = match row.due_date.as_deref() {
                Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| {
                    HistoryImportError::InvalidRow {
                        row: row_number,
                        message: format!("unparseable Due Date '{raw}'"),
                    }
                })?),
                None => None,
            };

            history.add_task(
                &member_id,
                TaskRecord {
                    title: row.task,
                    status,
                    created_at,
                    updated_at,
                    due_date,
                },
            );
        }

        Ok(history)
    }
}

/// Optional companion export for the events calendar. Columns: `Title`,
/// `Participants`, `Date`.
pub fn import_events<R: Read>(
    reader: R,
    history: &mut InMemoryHistory,
) -> Result<usize, HistoryImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut imported = 0;
    for (index, record) in csv_reader.deserialize::<EventRow>().enumerate() {
        let row_number = index + 2;
        let row = record?;
        let date =
            parse_timestamp(&row.date).ok_or_else(|| HistoryImportError::InvalidRow {
                row: row_number,
                message: format!("unparseable Date '{}'", row.date),
            })?;

        history.add_event(ScheduledEvent {
            title: row.title,
            participants: row.participants,
            date,
        });
        imported += 1;
    }

    Ok(imported)
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    #[serde(rename = "Member ID")]
    member_id: String,
    #[serde(rename = "Member Name")]
    member_name: String,
    #[serde(rename = "House")]
    house: String,
    #[serde(rename = "Task")]
    task: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Created At")]
    created_at: String,
    #[serde(rename = "Updated At", default, deserialize_with = "empty_string_as_none")]
    updated_at: Option<String>,
    #[serde(rename = "Due Date", default, deserialize_with = "empty_string_as_none")]
    due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Participants")]
    participants: String,
    #[serde(rename = "Date")]
    date: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::roster::HistoryAccessor;
    use std::io::Cursor;

    const EXPORT: &str = "\
Member ID,Member Name,House,Task,Status,Created At,Updated At,Due Date
m-01,Jordan Avery,North House,Kitchen Cleaning,completed,2025-09-29T08:00:00Z,2025-09-30T18:00:00Z,2025-10-01T08:00:00Z
m-01,Jordan Avery,North House,Laundry Room,pending,2025-10-02,,
m-02,Sam Rios,South House,Bathroom Cleaning,in_progress,2025-10-01T07:30:00Z,2025-10-01T07:30:00Z,
";

    #[test]
    fn import_builds_members_and_tasks() {
        let history = HistoryImporter::from_reader(Cursor::new(EXPORT)).expect("import succeeds");

        assert_eq!(history.member_count(), 2);

        let north = history
            .house_members("North House")
            .expect("roster available");
        assert_eq!(north.len(), 1);
        assert_eq!(north[0].display_name, "Jordan Avery");

        let tasks = history
            .member_task_history(&MemberId("m-01".to_string()))
            .expect("history available");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].status, TaskStatus::Completed);
        assert!(tasks[0].due_date.is_some());
        assert_eq!(tasks[1].status, TaskStatus::Pending);
        assert_eq!(tasks[1].updated_at, tasks[1].created_at);
    }

    #[test]
    fn import_rejects_unknown_status() {
        let export = "\
Member ID,Member Name,House,Task,Status,Created At,Updated At,Due Date
m-01,Jordan Avery,North House,Kitchen Cleaning,abandoned,2025-09-29T08:00:00Z,,
";
        let error = HistoryImporter::from_reader(Cursor::new(export))
            .expect_err("unknown status rejected");
        match error {
            HistoryImportError::InvalidRow { row, message } => {
                assert_eq!(row, 2);
                assert!(message.contains("abandoned"));
            }
            other => panic!("expected invalid row error, got {other:?}"),
        }
    }

    #[test]
    fn bare_dates_parse_as_midnight_utc() {
        let parsed = parse_timestamp("2025-10-02").expect("date parses");
        assert_eq!(parsed.to_rfc3339(), "2025-10-02T00:00:00+00:00");
    }
}
