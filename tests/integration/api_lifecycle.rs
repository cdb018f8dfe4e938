//! Integration tests for the REST API as seen through `ApiClient`.
//!
//! Each test starts a real server on an OS-assigned port over an empty
//! in-memory store and drives it with the same client the TUI uses.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use chrono::{TimeZone, Utc};
use taskboard::api::{ApiClient, ApiError};
use taskboard_proto::schema::{NewTask, TaskChanges};
use taskboard_proto::seed::SAMPLE_TASK_COUNT;
use taskboard_proto::task::{Priority, TaskId, TaskStatus};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Starts a fresh server and returns a client pointed at it.
async fn client_for_new_server() -> ApiClient {
    let (addr, _handle) = taskboard_server::routes::start_server("127.0.0.1:0")
        .await
        .expect("failed to start server");
    ApiClient::new(&format!("http://{addr}"), Duration::from_secs(5)).expect("client")
}

// ===========================================================================
// Health
// ===========================================================================

#[tokio::test]
async fn health_reports_ok() {
    let client = client_for_new_server().await;
    let health = client.health().await.expect("health");
    assert_eq!(health.status, "OK");
    assert_eq!(health.message, "Server is running");
}

// ===========================================================================
// CRUD lifecycle
// ===========================================================================

#[tokio::test]
async fn create_fetch_update_delete() {
    let client = client_for_new_server().await;

    let created = client
        .create_task(&NewTask {
            description: "Quarterly numbers".to_string(),
            priority: Priority::High,
            ..NewTask::titled("Write report")
        })
        .await
        .expect("create");
    assert_eq!(created.title, "Write report");
    assert_eq!(created.status, TaskStatus::Pending);
    assert_eq!(created.priority, Priority::High);
    assert!(created.due_date.is_none());

    let fetched = client.fetch_task(&created.id).await.expect("fetch");
    assert_eq!(fetched, created);

    let updated = client
        .update_task(
            &created.id,
            &TaskChanges {
                status: Some(TaskStatus::Completed),
                ..TaskChanges::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.title, "Write report");
    assert_eq!(updated.created_at, created.created_at);

    let deleted = client.delete_task(&created.id).await.expect("delete");
    assert_eq!(deleted.id, created.id);

    let err = client.fetch_task(&created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref m) if m == "Task not found"));
    assert!(client.fetch_tasks().await.expect("list").is_empty());
}

#[tokio::test]
async fn list_is_newest_first() {
    let client = client_for_new_server().await;
    for title in ["first", "second", "third"] {
        client.create_task(&NewTask::titled(title)).await.expect("create");
    }
    let titles: Vec<String> = client
        .fetch_tasks()
        .await
        .expect("list")
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, ["third", "second", "first"]);
}

#[tokio::test]
async fn due_date_round_trips_and_clears() {
    let client = client_for_new_server().await;
    let due = Utc.with_ymd_and_hms(2031, 3, 9, 0, 0, 0).unwrap();

    let created = client
        .create_task(&NewTask {
            due_date: Some(due),
            ..NewTask::titled("Dated")
        })
        .await
        .expect("create");
    assert_eq!(created.due_date, Some(due));

    let cleared = client
        .update_task(
            &created.id,
            &TaskChanges {
                due_date: Some(None),
                ..TaskChanges::default()
            },
        )
        .await
        .expect("update");
    assert!(cleared.due_date.is_none());
}

// ===========================================================================
// Error classification
// ===========================================================================

#[tokio::test]
async fn blank_title_is_a_validation_error() {
    let client = client_for_new_server().await;
    let err = client
        .create_task(&NewTask::titled("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(ref m) if m == "Title is required"));
    assert!(client.fetch_tasks().await.expect("list").is_empty());
}

#[tokio::test]
async fn unknown_task_is_not_found() {
    let client = client_for_new_server().await;
    let missing = TaskId::new();

    let err = client
        .update_task(
            &missing,
            &TaskChanges {
                title: Some("x".to_string()),
                ..TaskChanges::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = client.delete_task(&missing).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).expect("client");
    let err = client.fetch_tasks().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

// ===========================================================================
// Seeding
// ===========================================================================

#[tokio::test]
async fn seed_only_populates_empty_store() {
    let client = client_for_new_server().await;

    let seeded = client.seed_tasks().await;
    assert_eq!(seeded.len(), SAMPLE_TASK_COUNT);
    assert!(seeded.iter().all(|t| t.due_date.is_some()));

    let again = client.seed_tasks().await;
    assert!(again.is_empty(), "second seed must not insert");
    assert_eq!(
        client.fetch_tasks().await.expect("list").len(),
        SAMPLE_TASK_COUNT
    );
}

#[tokio::test]
async fn seed_skips_store_with_user_tasks() {
    let client = client_for_new_server().await;
    client.create_task(&NewTask::titled("mine")).await.expect("create");

    assert!(client.seed_tasks().await.is_empty());
    let tasks = client.fetch_tasks().await.expect("list");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "mine");
}

#[tokio::test]
async fn seed_against_unreachable_server_yields_nothing() {
    let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).expect("client");
    assert!(client.seed_tasks().await.is_empty());
}
