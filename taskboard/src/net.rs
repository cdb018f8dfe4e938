//! Network bridge between the synchronous TUI loop and the async API client.
//!
//! A single background tokio task owns the [`ApiClient`] and executes one
//! [`NetCommand`] at a time, reporting each outcome as a [`NetEvent`].
//!
//! ```text
//! TUI (main thread)  <-- NetEvent ---  tokio background task --> REST API
//!                    --- NetCommand ->
//! ```
//!
//! There are no retries: a failed request produces exactly one
//! [`NetEvent::OperationFailed`].

use std::time::Duration;

use taskboard_proto::schema::{NewTask, TaskChanges};
use taskboard_proto::task::{Task, TaskId};
use tokio::sync::mpsc;

use crate::api::{ApiClient, ApiError};

/// The user-visible operation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Seed,
    Create,
    Update,
    Delete,
}

impl Action {
    /// Phrase used in notifications, e.g. "Failed to create task".
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Load => "load tasks",
            Self::Seed => "seed tasks",
            Self::Create => "create task",
            Self::Update => "update task",
            Self::Delete => "delete task",
        }
    }
}

/// Commands sent from the TUI main loop to the network task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetCommand {
    /// Fetch the full task list.
    Load,
    /// Ask the server to insert sample tasks if it has none.
    Seed,
    /// Create a task.
    Create(NewTask),
    /// Apply a partial update.
    Update {
        /// Task to change.
        id: TaskId,
        /// Fields to change.
        changes: TaskChanges,
    },
    /// Delete a task.
    Delete(TaskId),
    /// Stop the network task.
    Shutdown,
}

impl NetCommand {
    /// The action this command performs, or `None` for [`NetCommand::Shutdown`].
    #[must_use]
    pub const fn action(&self) -> Option<Action> {
        match self {
            Self::Load => Some(Action::Load),
            Self::Seed => Some(Action::Seed),
            Self::Create(_) => Some(Action::Create),
            Self::Update { .. } => Some(Action::Update),
            Self::Delete(_) => Some(Action::Delete),
            Self::Shutdown => None,
        }
    }
}

/// Events sent from the network task back to the TUI main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetEvent {
    /// Response to [`NetCommand::Load`].
    TasksLoaded(Vec<Task>),
    /// Response to [`NetCommand::Seed`]; empty when nothing was seeded.
    Seeded(Vec<Task>),
    /// The server created this task.
    TaskCreated(Task),
    /// The server's copy after an update.
    TaskUpdated(Task),
    /// The server deleted this task.
    TaskDeleted(Task),
    /// A request failed; local state must not change.
    OperationFailed {
        /// What was attempted.
        action: Action,
        /// Human-readable reason.
        message: String,
    },
}

/// Default channel capacity for commands and events.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Configuration for the network task.
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// Base URL of the REST API (e.g., `http://localhost:3001`).
    pub api_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Cosmetic delay before the first command is executed.
    pub startup_delay: Duration,
    /// Channel capacity for command/event mpsc channels.
    pub channel_capacity: usize,
}

impl NetConfig {
    /// Creates a `NetConfig` with no startup delay and default capacities.
    #[must_use]
    pub const fn new(api_url: String, request_timeout: Duration) -> Self {
        Self {
            api_url,
            request_timeout,
            startup_delay: Duration::ZERO,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Spawn the network task and return its channel handles.
///
/// Must be called from within a tokio runtime. The task runs until it
/// receives [`NetCommand::Shutdown`], the command sender is dropped, or the
/// event receiver is dropped.
///
/// # Errors
///
/// Returns [`ApiError`] if the API client cannot be built from `config`.
pub fn spawn_net(
    config: NetConfig,
) -> Result<(mpsc::Sender<NetCommand>, mpsc::Receiver<NetEvent>), ApiError> {
    let client = ApiClient::new(&config.api_url, config.request_timeout)?;
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<NetCommand>(config.channel_capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<NetEvent>(config.channel_capacity);

    tracing::info!(url = %client.base_url(), "network task starting");

    tokio::spawn(async move {
        if !config.startup_delay.is_zero() {
            tokio::time::sleep(config.startup_delay).await;
        }
        while let Some(cmd) = cmd_rx.recv().await {
            let Some(event) = execute(&client, cmd).await else {
                tracing::info!("network task shutting down");
                break;
            };
            if evt_tx.send(event).await.is_err() {
                tracing::debug!("event receiver dropped, stopping network task");
                break;
            }
        }
    });

    Ok((cmd_tx, evt_rx))
}

/// Executes one command against the API and converts the outcome into an
/// event. Returns `None` for [`NetCommand::Shutdown`].
pub async fn execute(client: &ApiClient, cmd: NetCommand) -> Option<NetEvent> {
    let action = cmd.action()?;
    tracing::debug!(action = action.describe(), "executing request");

    let result = match cmd {
        NetCommand::Load => client.fetch_tasks().await.map(NetEvent::TasksLoaded),
        NetCommand::Seed => Ok(NetEvent::Seeded(client.seed_tasks().await)),
        NetCommand::Create(new) => client.create_task(&new).await.map(NetEvent::TaskCreated),
        NetCommand::Update { id, changes } => client
            .update_task(&id, &changes)
            .await
            .map(NetEvent::TaskUpdated),
        NetCommand::Delete(id) => client.delete_task(&id).await.map(NetEvent::TaskDeleted),
        NetCommand::Shutdown => return None,
    };

    Some(result.unwrap_or_else(|e| {
        tracing::warn!(action = action.describe(), error = %e, "request failed");
        NetEvent::OperationFailed {
            action,
            message: e.to_string(),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_actions() {
        assert_eq!(NetCommand::Load.action(), Some(Action::Load));
        assert_eq!(
            NetCommand::Delete(TaskId::new()).action(),
            Some(Action::Delete)
        );
        assert_eq!(NetCommand::Shutdown.action(), None);
    }

    #[test]
    fn action_phrases() {
        assert_eq!(Action::Create.describe(), "create task");
        assert_eq!(Action::Load.describe(), "load tasks");
    }

    #[test]
    fn spawn_net_rejects_bad_url() {
        let result = spawn_net(NetConfig::new("::".to_string(), Duration::from_secs(1)));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn failed_request_becomes_operation_failed() {
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let event = execute(&client, NetCommand::Delete(TaskId::new()))
            .await
            .unwrap();
        assert!(matches!(
            event,
            NetEvent::OperationFailed {
                action: Action::Delete,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn shutdown_yields_no_event() {
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        assert!(execute(&client, NetCommand::Shutdown).await.is_none());
    }
}
