//! Request schema and the single validator applied at the service boundary.
//!
//! Request bodies arrive loosely typed ([`TaskDraft`], [`TaskPatch`]): every
//! field optional, enums and dates as strings. [`validate_draft`] and
//! [`validate_patch`] turn them into typed values ([`NewTask`],
//! [`TaskChanges`]) with every default applied, or reject them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::task::{Priority, Task, TaskStatus};
use crate::wire::{format_timestamp, parse_timestamp};

/// Reasons a request body is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Title missing or blank.
    #[error("Title is required")]
    TitleRequired,
    /// Status outside `pending | in-progress | completed`.
    #[error("invalid status: {0:?}")]
    UnknownStatus(String),
    /// Priority outside `low | medium | high`.
    #[error("invalid priority: {0:?}")]
    UnknownPriority(String),
    /// A date field that is not an ISO-8601 timestamp or calendar date.
    #[error("invalid {field}: {value:?}")]
    InvalidDate {
        /// Wire name of the field.
        field: &'static str,
        /// Rejected input.
        value: String,
    },
    /// The body is not a JSON object of the expected shape.
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Required; rejected when absent or blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Body of `PUT /api/tasks/:id`.
///
/// `dueDate` distinguishes "absent" (leave alone) from `null` (clear).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<String>>,
}

/// A validated, fully defaulted task ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    /// A pending, medium-priority task with only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: TaskStatus::default(),
            priority: Priority::default(),
            due_date: None,
        }
    }
}

/// A validated partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskChanges {
    /// Returns `true` if applying these changes would modify nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    /// Merges the provided fields into `task`.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

impl From<&NewTask> for TaskDraft {
    fn from(task: &NewTask) -> Self {
        Self {
            title: Some(task.title.clone()),
            description: Some(task.description.clone()),
            status: Some(task.status.to_string()),
            priority: Some(task.priority.to_string()),
            due_date: task.due_date.map(format_timestamp),
        }
    }
}

impl From<&TaskChanges> for TaskPatch {
    fn from(changes: &TaskChanges) -> Self {
        Self {
            title: changes.title.clone(),
            description: changes.description.clone(),
            status: changes.status.map(|s| s.to_string()),
            priority: changes.priority.map(|p| p.to_string()),
            due_date: changes.due_date.map(|d| d.map(format_timestamp)),
        }
    }
}

/// Validates a create body, applying defaults for omitted fields.
///
/// Empty strings for `status`, `priority`, and `dueDate` count as omitted.
///
/// # Errors
///
/// Returns [`ValidationError`] if the title is missing or blank, or any
/// enum or date field is unrecognized.
pub fn validate_draft(draft: &TaskDraft) -> Result<NewTask, ValidationError> {
    let title = required_title(draft.title.as_deref())?;
    let status = non_blank(draft.status.as_deref())
        .map(str::parse::<TaskStatus>)
        .transpose()?
        .unwrap_or_default();
    let priority = non_blank(draft.priority.as_deref())
        .map(str::parse::<Priority>)
        .transpose()?
        .unwrap_or_default();
    let due_date = non_blank(draft.due_date.as_deref())
        .map(|v| date_field("dueDate", v))
        .transpose()?;

    Ok(NewTask {
        title,
        description: draft
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        status,
        priority,
        due_date,
    })
}

/// Validates an update body. Only provided fields are checked.
///
/// # Errors
///
/// Returns [`ValidationError`] if a provided title is blank, or any
/// provided enum or date field is unrecognized.
pub fn validate_patch(patch: &TaskPatch) -> Result<TaskChanges, ValidationError> {
    let title = patch
        .title
        .as_deref()
        .map(|t| required_title(Some(t)))
        .transpose()?;
    let status = patch
        .status
        .as_deref()
        .map(str::parse::<TaskStatus>)
        .transpose()?;
    let priority = patch
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()?;
    let due_date = match &patch.due_date {
        None => None,
        Some(None) => Some(None),
        Some(Some(v)) if v.trim().is_empty() => Some(None),
        Some(Some(v)) => Some(Some(date_field("dueDate", v)?)),
    };

    Ok(TaskChanges {
        title,
        description: patch.description.as_deref().map(|d| d.trim().to_string()),
        status,
        priority,
        due_date,
    })
}

fn required_title(title: Option<&str>) -> Result<String, ValidationError> {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(ValidationError::TitleRequired),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn date_field(field: &'static str, value: &str) -> Result<DateTime<Utc>, ValidationError> {
    parse_timestamp(value).ok_or_else(|| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Deserializes a present field (including `null`) as `Some(..)`; absent
/// fields fall back to `Default`, i.e. `None`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
