//! Task service: request-level operations over the injected [`TaskStore`].
//!
//! Request bodies pass through the schema validator exactly once here, so
//! the store only ever sees typed, fully defaulted values.

use chrono::Utc;
use taskboard_proto::schema::{TaskDraft, TaskPatch, validate_draft, validate_patch};
use taskboard_proto::seed;
use taskboard_proto::task::{Task, TaskId};

use crate::error::ServiceError;
use crate::store::TaskStore;

/// Result of [`TaskService::seed_if_empty`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty; these tasks were inserted.
    Seeded(Vec<Task>),
    /// The store already had tasks; nothing changed.
    AlreadyPopulated,
}

/// Stateless request handlers over a store.
pub struct TaskService {
    store: TaskStore,
}

impl TaskService {
    /// Wraps an opened store.
    #[must_use]
    pub const fn new(store: TaskStore) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Releases the store for teardown.
    #[must_use]
    pub fn into_store(self) -> TaskStore {
        self.store
    }

    /// All tasks, newest first.
    pub async fn list(&self) -> Vec<Task> {
        self.store.list().await
    }

    /// One task by its wire id.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] if the id is malformed or unknown.
    pub async fn get(&self, id: &str) -> Result<Task, ServiceError> {
        let id = parse_id(id)?;
        self.store
            .get(&id)
            .await
            .map_err(|e| ServiceError::from_store("fetching task", e))
    }

    /// Validates and inserts a new task.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Validation`] if the body is invalid (nothing is
    /// stored), or [`ServiceError::Internal`] on store failure.
    pub async fn create(&self, draft: &TaskDraft) -> Result<Task, ServiceError> {
        let new = validate_draft(draft)?;
        let task = self
            .store
            .insert(new)
            .await
            .map_err(|e| ServiceError::from_store("creating task", e))?;
        tracing::info!(id = %task.id, title = %task.title, "task created");
        Ok(task)
    }

    /// Validates and applies a partial update.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] for an unknown id,
    /// [`ServiceError::Validation`] for an invalid body, or
    /// [`ServiceError::Internal`] on store failure.
    pub async fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task, ServiceError> {
        let id = parse_id(id)?;
        let changes = validate_patch(patch)?;
        let task = self
            .store
            .update(&id, &changes)
            .await
            .map_err(|e| ServiceError::from_store("updating task", e))?;
        tracing::info!(id = %task.id, status = %task.status, "task updated");
        Ok(task)
    }

    /// Deletes a task, returning it.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] for an unknown id, or
    /// [`ServiceError::Internal`] on store failure.
    pub async fn delete(&self, id: &str) -> Result<Task, ServiceError> {
        let id = parse_id(id)?;
        let task = self
            .store
            .delete(&id)
            .await
            .map_err(|e| ServiceError::from_store("deleting task", e))?;
        tracing::info!(id = %task.id, "task deleted");
        Ok(task)
    }

    /// Inserts the sample tasks if, and only if, the store is empty.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Internal`] on store failure.
    pub async fn seed_if_empty(&self) -> Result<SeedOutcome, ServiceError> {
        let inserted = self
            .store
            .insert_if_empty(seed::sample_tasks(Utc::now()))
            .await
            .map_err(|e| ServiceError::from_store("seeding tasks", e))?;
        Ok(match inserted {
            Some(tasks) => {
                tracing::info!(count = tasks.len(), "seeded sample tasks");
                SeedOutcome::Seeded(tasks)
            }
            None => {
                tracing::debug!("seed skipped, store not empty");
                SeedOutcome::AlreadyPopulated
            }
        })
    }
}

/// Malformed ids cannot name a stored task, so they are reported as missing.
fn parse_id(id: &str) -> Result<TaskId, ServiceError> {
    id.parse()
        .map_err(|_| ServiceError::NotFound(id.to_string()))
}
