//! Integration tests for how the TUI state reacts to server responses.
//!
//! # Verification Focus
//!
//! - The list only changes after the server confirms a mutation
//! - An empty first load triggers exactly one seed request
//! - Empty state and "no results" are distinct
//! - The completion notice fires once per transition into `completed`
//! - Failures leave the list untouched and keep the form open

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskboard::app::{App, FormMode, Mode, Notification, RequestState};
use taskboard::net::{Action, NetCommand, NetEvent};
use taskboard_proto::task::{Priority, Task, TaskId, TaskStatus};
use taskboard_proto::view::Filter;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_task(title: &str, status: TaskStatus) -> Task {
    Task {
        id: TaskId::new(),
        title: title.to_string(),
        description: String::new(),
        status,
        priority: Priority::Medium,
        due_date: None,
        created_at: Utc.with_ymd_and_hms(2025, 1, 5, 12, 0, 0).unwrap(),
    }
}

fn press(app: &mut App, code: KeyCode) -> Option<NetCommand> {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

/// An app whose initial load returned `tasks` (non-empty).
fn app_with(tasks: Vec<Task>) -> App {
    let mut app = App::new();
    app.start();
    assert!(app.apply_event(NetEvent::TasksLoaded(tasks)).is_none());
    app
}

fn completion_notices(app: &App) -> usize {
    app.toasts
        .iter()
        .filter(|t| matches!(t.notification, Notification::TaskCompleted { .. }))
        .count()
}

// ===========================================================================
// Initial load and seeding
// ===========================================================================

#[test]
fn empty_first_load_requests_seed_once() {
    let mut app = App::new();
    assert_eq!(app.start(), NetCommand::Load);
    assert!(app.is_loading());

    let follow_up = app.apply_event(NetEvent::TasksLoaded(Vec::new()));
    assert_eq!(follow_up, Some(NetCommand::Seed));
    assert!(app.is_loading(), "seeding still counts as loading");
    assert!(!app.shows_empty_state());

    app.apply_event(NetEvent::Seeded(vec![make_task("sample", TaskStatus::Pending)]));
    assert_eq!(app.tasks.len(), 1);
    assert_eq!(app.request, RequestState::Idle);

    // A later reload that comes back empty does not seed again.
    let reload = press(&mut app, KeyCode::Char('r'));
    assert_eq!(reload, Some(NetCommand::Load));
    assert!(app.apply_event(NetEvent::TasksLoaded(Vec::new())).is_none());
    assert!(app.shows_empty_state());
}

#[test]
fn non_empty_first_load_does_not_seed() {
    let app = app_with(vec![make_task("existing", TaskStatus::Pending)]);
    assert_eq!(app.tasks.len(), 1);
    assert!(!app.shows_empty_state());
}

#[test]
fn failed_seed_falls_back_to_empty_state() {
    let mut app = App::new();
    app.start();
    app.apply_event(NetEvent::TasksLoaded(Vec::new()));
    app.apply_event(NetEvent::OperationFailed {
        action: Action::Seed,
        message: "connection refused".to_string(),
    });
    assert!(app.shows_empty_state());
    assert!(app.toasts.is_empty(), "seed failures are silent");
}

// ===========================================================================
// Empty state vs no results
// ===========================================================================

#[test]
fn filter_without_matches_is_not_the_empty_state() {
    let mut app = app_with(vec![make_task("open", TaskStatus::Pending)]);
    press(&mut app, KeyCode::Char('4'));
    assert_eq!(app.filter, Filter::Completed);
    assert!(app.shows_no_results());
    assert!(!app.shows_empty_state());

    press(&mut app, KeyCode::Char('1'));
    assert!(!app.shows_no_results());
}

// ===========================================================================
// No speculative mutation
// ===========================================================================

#[test]
fn create_waits_for_server_confirmation() {
    let mut app = app_with(vec![make_task("old", TaskStatus::Pending)]);

    press(&mut app, KeyCode::Char('n'));
    type_text(&mut app, "Fresh");
    let cmd = press(&mut app, KeyCode::Enter).expect("submit produces a command");
    let NetCommand::Create(new) = cmd else {
        panic!("expected create, got {cmd:?}");
    };
    assert_eq!(new.title, "Fresh");
    assert_eq!(app.tasks.len(), 1, "nothing is inserted before the response");
    assert!(matches!(app.mode, Mode::Form(_)));

    let mut confirmed = make_task("Fresh", TaskStatus::Pending);
    confirmed.created_at = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
    app.apply_event(NetEvent::TaskCreated(confirmed.clone()));
    assert_eq!(app.tasks.len(), 2);
    assert_eq!(app.tasks[0], confirmed, "new tasks go to the front");
    assert!(matches!(app.mode, Mode::Browse));
}

#[test]
fn status_advance_waits_for_server_confirmation() {
    let task = make_task("step", TaskStatus::Pending);
    let mut app = app_with(vec![task.clone()]);

    let cmd = press(&mut app, KeyCode::Char('s')).expect("update command");
    let NetCommand::Update { id, changes } = cmd else {
        panic!("expected update, got {cmd:?}");
    };
    assert_eq!(id, task.id);
    assert_eq!(changes.status, Some(TaskStatus::InProgress));
    assert_eq!(app.tasks[0].status, TaskStatus::Pending);

    let mut confirmed = task;
    confirmed.status = TaskStatus::InProgress;
    app.apply_event(NetEvent::TaskUpdated(confirmed));
    assert_eq!(app.tasks[0].status, TaskStatus::InProgress);
}

#[test]
fn delete_needs_confirmation_and_response() {
    let task = make_task("doomed", TaskStatus::Pending);
    let mut app = app_with(vec![task.clone()]);

    assert!(press(&mut app, KeyCode::Char('d')).is_none());
    assert!(matches!(app.mode, Mode::ConfirmDelete(ref id) if *id == task.id));

    assert!(press(&mut app, KeyCode::Char('n')).is_none());
    assert!(matches!(app.mode, Mode::Browse));
    assert_eq!(app.tasks.len(), 1);

    press(&mut app, KeyCode::Char('d'));
    let cmd = press(&mut app, KeyCode::Char('y'));
    assert_eq!(cmd, Some(NetCommand::Delete(task.id.clone())));
    assert_eq!(app.tasks.len(), 1);

    app.apply_event(NetEvent::TaskDeleted(task));
    assert!(app.tasks.is_empty());
    assert!(app.shows_empty_state());
}

#[test]
fn second_request_is_refused_while_busy() {
    let mut app = app_with(vec![make_task("a", TaskStatus::Pending)]);
    assert!(press(&mut app, KeyCode::Char('s')).is_some());
    assert!(press(&mut app, KeyCode::Char('r')).is_none());
    assert!(
        app.toasts
            .iter()
            .any(|t| t.notification.message() == "Please wait for the current request")
    );
}

// ===========================================================================
// Completion notification
// ===========================================================================

#[test]
fn completion_notice_fires_once_per_transition() {
    let task = make_task("ship it", TaskStatus::InProgress);
    let mut app = app_with(vec![task.clone()]);

    let mut done = task;
    done.status = TaskStatus::Completed;
    app.apply_event(NetEvent::TaskUpdated(done.clone()));
    assert_eq!(completion_notices(&app), 1);

    // Editing an already completed task does not repeat the notice.
    let mut renamed = done;
    renamed.title = "shipped".to_string();
    app.apply_event(NetEvent::TaskUpdated(renamed));
    assert_eq!(completion_notices(&app), 1);
}

#[test]
fn creating_a_completed_task_notifies() {
    let mut app = app_with(vec![make_task("a", TaskStatus::Pending)]);
    app.apply_event(NetEvent::TaskCreated(make_task("already done", TaskStatus::Completed)));
    assert_eq!(completion_notices(&app), 1);
    assert!(
        app.toasts
            .iter()
            .any(|t| t.notification.message() == "Completed: already done")
    );
}

// ===========================================================================
// Failures
// ===========================================================================

#[test]
fn failed_update_keeps_form_and_list() {
    let task = make_task("keep me", TaskStatus::Pending);
    let mut app = app_with(vec![task.clone()]);

    press(&mut app, KeyCode::Char('e'));
    assert!(matches!(&app.mode, Mode::Form(f) if f.mode == FormMode::Edit(task.id.clone())));
    type_text(&mut app, " now");
    assert!(press(&mut app, KeyCode::Enter).is_some());

    app.apply_event(NetEvent::OperationFailed {
        action: Action::Update,
        message: "Error updating task".to_string(),
    });

    assert_eq!(app.tasks, vec![task]);
    let Mode::Form(form) = &app.mode else {
        panic!("form should stay open");
    };
    assert_eq!(form.title, "keep me now");
    assert_eq!(form.error.as_deref(), Some("Error updating task"));
    assert!(!form.submitting);
    assert!(
        app.toasts
            .iter()
            .any(|t| t.notification.message() == "Failed to update task: Error updating task")
    );
    assert!(!app.is_busy(), "a failed request frees the client for a retry");
}

#[test]
fn blank_title_never_leaves_the_form() {
    let mut app = app_with(vec![make_task("a", TaskStatus::Pending)]);
    press(&mut app, KeyCode::Char('n'));
    type_text(&mut app, "   ");
    assert!(press(&mut app, KeyCode::Enter).is_none());
    let Mode::Form(form) = &app.mode else {
        panic!("form should stay open");
    };
    assert!(form.error.is_some());
    assert!(!app.is_busy());
}
