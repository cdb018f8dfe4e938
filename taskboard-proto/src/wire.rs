//! JSON wire representation of tasks and API envelopes.
//!
//! The HTTP API speaks [`WireTask`]: the identifier lives under `_id`,
//! field names are camelCase, and timestamps are RFC 3339 strings with
//! millisecond precision. [`to_wire`] and [`from_wire`] are the only
//! conversions between this shape and [`Task`].

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task, TaskId, TaskStatus, truncate_to_millis};

/// Errors turning a [`WireTask`] back into a [`Task`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// `_id` is not a task identifier.
    #[error("invalid task id: {0:?}")]
    InvalidId(String),
    /// A timestamp field could not be parsed.
    #[error("invalid {field}: {value:?}")]
    InvalidTimestamp {
        /// Wire name of the field.
        field: &'static str,
        /// Rejected input.
        value: String,
    },
    /// The server sent a blank title.
    #[error("task {0} has an empty title")]
    EmptyTitle(String),
}

/// A task as exchanged over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTask {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub created_at: String,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Body of `POST /api/tasks/seed`. `tasks` is empty when nothing was seeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedResponse {
    pub message: String,
    #[serde(default)]
    pub tasks: Vec<WireTask>,
}

/// Body of `DELETE /api/tasks/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub task: WireTask,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable code (`NOT_FOUND`, `VALIDATION_FAILED`, `INTERNAL`).
    #[serde(default)]
    pub code: String,
    pub message: String,
}

/// Converts a task into its wire form.
#[must_use]
pub fn to_wire(task: &Task) -> WireTask {
    WireTask {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        status: task.status,
        priority: task.priority,
        due_date: task.due_date.map(format_timestamp),
        created_at: format_timestamp(task.created_at),
    }
}

/// Converts a wire task back into a [`Task`].
///
/// # Errors
///
/// Returns [`WireError`] if the id or a timestamp is malformed, or the
/// title is blank.
pub fn from_wire(wire: WireTask) -> Result<Task, WireError> {
    let id: TaskId = wire
        .id
        .parse()
        .map_err(|_| WireError::InvalidId(wire.id.clone()))?;
    if wire.title.trim().is_empty() {
        return Err(WireError::EmptyTitle(wire.id));
    }
    let created_at =
        parse_timestamp(&wire.created_at).ok_or_else(|| WireError::InvalidTimestamp {
            field: "createdAt",
            value: wire.created_at.clone(),
        })?;
    let due_date = wire
        .due_date
        .as_deref()
        .map(|v| {
            parse_timestamp(v).ok_or_else(|| WireError::InvalidTimestamp {
                field: "dueDate",
                value: v.to_string(),
            })
        })
        .transpose()?;

    Ok(Task {
        id,
        title: wire.title,
        description: wire.description,
        status: wire.status,
        priority: wire.priority,
        due_date,
        created_at,
    })
}

/// Formats a timestamp as RFC 3339 in UTC with millisecond precision,
/// e.g. `2024-05-01T09:30:00.000Z`.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
///
/// The result is truncated to millisecond precision.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(truncate_to_millis(at.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
