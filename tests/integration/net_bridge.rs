//! Integration tests for the network task that bridges the TUI loop and
//! the REST API.
//!
//! Spawns the real server and the real network task, then talks to it
//! through the command/event channels exactly as `main` does.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use taskboard::net::{Action, NetCommand, NetConfig, NetEvent, spawn_net};
use taskboard_proto::schema::{NewTask, TaskChanges};
use taskboard_proto::seed::SAMPLE_TASK_COUNT;
use taskboard_proto::task::TaskStatus;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Starts a server and a network task pointed at it.
async fn bridge() -> (mpsc::Sender<NetCommand>, mpsc::Receiver<NetEvent>) {
    let (addr, _handle) = taskboard_server::routes::start_server("127.0.0.1:0")
        .await
        .expect("failed to start server");
    spawn_net(NetConfig::new(
        format!("http://{addr}"),
        Duration::from_secs(5),
    ))
    .expect("spawn network task")
}

/// Sends `cmd` and waits for the matching event.
async fn round_trip(
    tx: &mpsc::Sender<NetCommand>,
    rx: &mut mpsc::Receiver<NetEvent>,
    cmd: NetCommand,
) -> NetEvent {
    tx.send(cmd).await.expect("send command");
    tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("network task stopped")
}

// ===========================================================================
// Happy path
// ===========================================================================

#[tokio::test]
async fn load_seed_and_reload() {
    let (tx, mut rx) = bridge().await;

    let event = round_trip(&tx, &mut rx, NetCommand::Load).await;
    assert_eq!(event, NetEvent::TasksLoaded(Vec::new()));

    let NetEvent::Seeded(seeded) = round_trip(&tx, &mut rx, NetCommand::Seed).await else {
        panic!("expected Seeded");
    };
    assert_eq!(seeded.len(), SAMPLE_TASK_COUNT);

    let NetEvent::TasksLoaded(loaded) = round_trip(&tx, &mut rx, NetCommand::Load).await else {
        panic!("expected TasksLoaded");
    };
    assert_eq!(loaded.len(), SAMPLE_TASK_COUNT);

    // Seeding a populated store reports nothing new.
    assert_eq!(
        round_trip(&tx, &mut rx, NetCommand::Seed).await,
        NetEvent::Seeded(Vec::new())
    );
}

#[tokio::test]
async fn create_update_delete() {
    let (tx, mut rx) = bridge().await;

    let NetEvent::TaskCreated(task) =
        round_trip(&tx, &mut rx, NetCommand::Create(NewTask::titled("Bridge"))).await
    else {
        panic!("expected TaskCreated");
    };
    assert_eq!(task.title, "Bridge");

    let update = NetCommand::Update {
        id: task.id.clone(),
        changes: TaskChanges {
            status: Some(TaskStatus::Completed),
            ..TaskChanges::default()
        },
    };
    let NetEvent::TaskUpdated(updated) = round_trip(&tx, &mut rx, update).await else {
        panic!("expected TaskUpdated");
    };
    assert!(updated.is_completed());

    let NetEvent::TaskDeleted(deleted) =
        round_trip(&tx, &mut rx, NetCommand::Delete(task.id.clone())).await
    else {
        panic!("expected TaskDeleted");
    };
    assert_eq!(deleted.id, task.id);
}

// ===========================================================================
// Failures
// ===========================================================================

#[tokio::test]
async fn server_rejection_becomes_operation_failed() {
    let (tx, mut rx) = bridge().await;
    let event = round_trip(&tx, &mut rx, NetCommand::Create(NewTask::titled("  "))).await;
    assert_eq!(
        event,
        NetEvent::OperationFailed {
            action: Action::Create,
            message: "Title is required".to_string(),
        }
    );
}

#[tokio::test]
async fn unreachable_server_becomes_operation_failed() {
    let (tx, mut rx) = spawn_net(NetConfig::new(
        "http://127.0.0.1:9".to_string(),
        Duration::from_secs(2),
    ))
    .expect("spawn network task");

    let event = round_trip(&tx, &mut rx, NetCommand::Load).await;
    assert!(
        matches!(event, NetEvent::OperationFailed { action: Action::Load, .. }),
        "got {event:?}"
    );
}

// ===========================================================================
// Lifecycle
// ===========================================================================

#[tokio::test]
async fn shutdown_stops_the_task() {
    let (tx, mut rx) = bridge().await;
    tx.send(NetCommand::Shutdown).await.expect("send shutdown");

    let closed = tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for close");
    assert!(closed.is_none(), "event channel closes after shutdown");
}

#[tokio::test]
async fn startup_delay_postpones_first_request() {
    let (addr, _handle) = taskboard_server::routes::start_server("127.0.0.1:0")
        .await
        .expect("failed to start server");
    let mut config = NetConfig::new(format!("http://{addr}"), Duration::from_secs(5));
    config.startup_delay = Duration::from_millis(200);
    let (tx, mut rx) = spawn_net(config).expect("spawn network task");

    let started = tokio::time::Instant::now();
    let event = round_trip(&tx, &mut rx, NetCommand::Load).await;
    assert_eq!(event, NetEvent::TasksLoaded(Vec::new()));
    assert!(started.elapsed() >= Duration::from_millis(200));
}
