//! Filtering and ordering policy for the displayed task list.

use crate::task::{Task, TaskStatus};

/// Status filter selected in the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Every task.
    #[default]
    All,
    Pending,
    InProgress,
    Completed,
}

impl Filter {
    /// Filters in tab order.
    pub const ALL: [Self; 4] = [Self::All, Self::Pending, Self::InProgress, Self::Completed];

    /// Tab label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// The status this filter narrows to, or `None` for [`Filter::All`].
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        match self {
            Self::All => None,
            Self::Pending => Some(TaskStatus::Pending),
            Self::InProgress => Some(TaskStatus::InProgress),
            Self::Completed => Some(TaskStatus::Completed),
        }
    }

    /// Returns `true` if `task` belongs in this filter's view.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status().is_none_or(|s| task.status == s)
    }

    /// Next tab, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Pending,
            Self::Pending => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    /// Previous tab, wrapping around.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::All => Self::Completed,
            Self::Pending => Self::All,
            Self::InProgress => Self::Pending,
            Self::Completed => Self::InProgress,
        }
    }
}

/// Per-filter task totals shown next to each tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub all: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl FilterCounts {
    /// Counts `tasks` by status.
    #[must_use]
    pub fn of(tasks: &[Task]) -> Self {
        tasks.iter().fold(
            Self {
                all: tasks.len(),
                ..Self::default()
            },
            |mut counts, task| {
                match task.status {
                    TaskStatus::Pending => counts.pending += 1,
                    TaskStatus::InProgress => counts.in_progress += 1,
                    TaskStatus::Completed => counts.completed += 1,
                }
                counts
            },
        )
    }

    /// Total for a single filter.
    #[must_use]
    pub const fn get(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.all,
            Filter::Pending => self.pending,
            Filter::InProgress => self.in_progress,
            Filter::Completed => self.completed,
        }
    }
}

/// Returns the tasks matching `filter`, ordered by due date ascending.
///
/// Undated tasks come after every dated task. The sort is stable, so tasks
/// with equal due dates (or no due date) keep their relative input order.
#[must_use]
pub fn visible_tasks(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    let mut view: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    view.sort_by_key(|t| (t.due_date.is_none(), t.due_date));
    view
}
