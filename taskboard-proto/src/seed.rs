//! Sample tasks inserted into an empty store on first run.

use chrono::{DateTime, Duration, Utc};

use crate::schema::NewTask;
use crate::task::{Priority, TaskStatus, truncate_to_millis};

/// Number of tasks in the sample set.
pub const SAMPLE_TASK_COUNT: usize = 4;

/// Builds the sample set with due dates relative to `now`.
#[must_use]
pub fn sample_tasks(now: DateTime<Utc>) -> Vec<NewTask> {
    let day = Duration::days(1);
    let sample = |title: &str, description: &str, status, priority, offset_days: i32| NewTask {
        title: title.to_string(),
        description: description.to_string(),
        status,
        priority,
        due_date: Some(truncate_to_millis(now + day * offset_days)),
    };

    vec![
        sample(
            "Setup Development Environment",
            "Install the toolchain, editor, and extensions needed for the project.",
            TaskStatus::Completed,
            Priority::High,
            -1,
        ),
        sample(
            "Database Schema Design",
            "Design the document layout for the tasks collection.",
            TaskStatus::InProgress,
            Priority::High,
            2,
        ),
        sample(
            "Frontend UI Components",
            "Build the list, filter tabs, and task form for the client.",
            TaskStatus::Pending,
            Priority::Medium,
            5,
        ),
        sample(
            "Unit Testing",
            "Write tests for the API endpoints.",
            TaskStatus::Pending,
            Priority::Low,
            7,
        ),
    ]
}
