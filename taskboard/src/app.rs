//! Application state, key handling, and the client sync policy.
//!
//! The task list only ever changes in response to a [`NetEvent`]: key
//! handlers build a [`NetCommand`] and hand it back to the main loop, and
//! [`App::apply_event`] folds the server's answer into state.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskboard_proto::schema::{NewTask, TaskChanges};
use taskboard_proto::task::{Priority, Task, TaskId, TaskStatus};
use taskboard_proto::view::{Filter, FilterCounts, visible_tasks};
use taskboard_proto::wire::parse_timestamp;

use crate::net::{Action, NetCommand, NetEvent};

/// Default lifetime of a toast notification.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Status of the request currently (or most recently) in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    /// Nothing in flight.
    Idle,
    /// Waiting for the response to this action.
    Pending(Action),
    /// The last request failed with this message.
    Failed(String),
}

/// A transient message shown as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// An operation succeeded.
    Success(String),
    /// An operation failed.
    Error(String),
    /// A task transitioned into `completed`.
    TaskCompleted {
        /// Title of the completed task.
        title: String,
    },
}

impl Notification {
    /// Text shown in the toast.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Success(msg) | Self::Error(msg) => msg.clone(),
            Self::TaskCompleted { title } => format!("Completed: {title}"),
        }
    }
}

/// A notification together with its expiry.
#[derive(Debug, Clone)]
pub struct Toast {
    /// What to show.
    pub notification: Notification,
    /// When it disappears.
    pub expires_at: Instant,
}

/// Which form field receives input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
}

impl FormField {
    /// Fields in tab order.
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::Description,
        Self::Status,
        Self::Priority,
        Self::DueDate,
    ];

    /// Field label as rendered in the modal.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title *",
            Self::Description => "Description",
            Self::Status => "Status",
            Self::Priority => "Priority",
            Self::DueDate => "Due date",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Title => 0,
            Self::Description => 1,
            Self::Status => 2,
            Self::Priority => 3,
            Self::DueDate => 4,
        }
    }

    const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    const fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Create vs. edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TaskId),
}

/// State of the add/edit modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub mode: FormMode,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Free text; parsed on submit (`YYYY-MM-DD` or RFC 3339).
    pub due_date: String,
    pub focus: FormField,
    /// Local validation or server error shown under the form.
    pub error: Option<String>,
    /// Set while the save request is in flight.
    pub submitting: bool,
    /// Due date text the form opened with; unchanged text leaves the
    /// stored instant alone on save.
    prefilled_due_date: String,
}

impl TaskForm {
    /// An empty form for a new task.
    #[must_use]
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            title: String::new(),
            description: String::new(),
            status: TaskStatus::default(),
            priority: Priority::default(),
            due_date: String::new(),
            focus: FormField::Title,
            error: None,
            submitting: false,
            prefilled_due_date: String::new(),
        }
    }

    /// A form prefilled from an existing task.
    #[must_use]
    pub fn edit(task: &Task) -> Self {
        let due_date = task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        Self {
            mode: FormMode::Edit(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            prefilled_due_date: due_date.clone(),
            due_date,
            focus: FormField::Title,
            error: None,
            submitting: false,
        }
    }

    /// Modal title.
    #[must_use]
    pub const fn heading(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add New Task",
            FormMode::Edit(_) => "Edit Task",
        }
    }

    /// Label of the submit action.
    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create Task",
            FormMode::Edit(_) => "Save Changes",
        }
    }

    /// Builds the request for this form, or a message explaining why the
    /// form cannot be submitted.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message for a blank title or an unparseable
    /// due date.
    pub fn to_command(&self) -> Result<NetCommand, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title is required".to_string());
        }
        let due_text = self.due_date.trim();
        let due_date = if due_text.is_empty() {
            None
        } else {
            Some(
                parse_timestamp(due_text)
                    .ok_or_else(|| "Due date must look like YYYY-MM-DD".to_string())?,
            )
        };
        let description = self.description.trim().to_string();

        Ok(match &self.mode {
            FormMode::Create => NetCommand::Create(NewTask {
                title: title.to_string(),
                description,
                status: self.status,
                priority: self.priority,
                due_date,
            }),
            FormMode::Edit(id) => NetCommand::Update {
                id: id.clone(),
                changes: TaskChanges {
                    title: Some(title.to_string()),
                    description: Some(description),
                    status: Some(self.status),
                    priority: Some(self.priority),
                    // The form shows dates only; resending would drop the time.
                    due_date: (due_text != self.prefilled_due_date).then_some(due_date),
                },
            },
        })
    }

    fn text_field(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Status | FormField::Priority => None,
        }
    }

    fn cycle_choice(&mut self) {
        match self.focus {
            FormField::Status => self.status = self.status.next(),
            FormField::Priority => self.priority = self.priority.next(),
            _ => {}
        }
    }
}

/// What the screen is showing on top of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Browsing the list.
    Browse,
    /// The add/edit modal is open.
    Form(TaskForm),
    /// Waiting for the user to confirm deleting this task.
    ConfirmDelete(TaskId),
}

/// Main application state.
pub struct App {
    /// Server-confirmed tasks in server order (newest first).
    pub tasks: Vec<Task>,
    /// Active status filter.
    pub filter: Filter,
    /// Index of the highlighted task within the visible list.
    pub selected: usize,
    /// Modal state.
    pub mode: Mode,
    /// In-flight request state.
    pub request: RequestState,
    /// Live toasts, oldest first.
    pub toasts: Vec<Toast>,
    /// Whether the app should quit.
    pub should_quit: bool,
    notification_ttl: Duration,
    initial_load_done: bool,
}

impl App {
    /// Creates an empty application state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            filter: Filter::All,
            selected: 0,
            mode: Mode::Browse,
            request: RequestState::Idle,
            toasts: Vec::new(),
            should_quit: false,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            initial_load_done: false,
        }
    }

    /// Sets how long toasts stay visible.
    #[must_use]
    pub const fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    /// Begins the initial load. The returned command must be dispatched.
    pub fn start(&mut self) -> NetCommand {
        self.request = RequestState::Pending(Action::Load);
        NetCommand::Load
    }

    /// Whether the list is being fetched (or seeded).
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(
            self.request,
            RequestState::Pending(Action::Load | Action::Seed)
        )
    }

    /// Whether any request is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self.request, RequestState::Pending(_))
    }

    /// Tasks matching the active filter, soonest due first.
    #[must_use]
    pub fn visible(&self) -> Vec<&Task> {
        visible_tasks(&self.tasks, self.filter)
    }

    /// Per-filter totals for the tab bar.
    #[must_use]
    pub fn counts(&self) -> FilterCounts {
        FilterCounts::of(&self.tasks)
    }

    /// The highlighted task, if any.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.visible().get(self.selected).copied()
    }

    /// Show the "No tasks yet" empty state.
    #[must_use]
    pub fn shows_empty_state(&self) -> bool {
        !self.is_loading() && self.tasks.is_empty()
    }

    /// Show the "no tasks match this filter" message.
    #[must_use]
    pub fn shows_no_results(&self) -> bool {
        !self.is_loading() && !self.tasks.is_empty() && self.visible().is_empty()
    }

    /// Pushes a toast that expires after the configured TTL.
    pub fn notify(&mut self, notification: Notification) {
        self.toasts.push(Toast {
            notification,
            expires_at: Instant::now() + self.notification_ttl,
        });
    }

    /// Drops expired toasts.
    pub fn expire_notifications(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    /// Periodic housekeeping, called once per loop iteration.
    pub fn tick(&mut self) {
        self.expire_notifications(Instant::now());
    }

    // -----------------------------------------------------------------------
    // Responses
    // -----------------------------------------------------------------------

    /// Applies a network response. May return a follow-up command (the
    /// seed request after an empty initial load).
    pub fn apply_event(&mut self, event: NetEvent) -> Option<NetCommand> {
        match event {
            NetEvent::TasksLoaded(tasks) => {
                let first = !self.initial_load_done;
                self.initial_load_done = true;
                if first && tasks.is_empty() {
                    tracing::info!("no tasks on server, requesting sample data");
                    self.request = RequestState::Pending(Action::Seed);
                    return Some(NetCommand::Seed);
                }
                self.request = RequestState::Idle;
                self.tasks = tasks;
                self.clamp_selection();
            }
            NetEvent::Seeded(tasks) => {
                self.request = RequestState::Idle;
                self.tasks = tasks;
                self.clamp_selection();
            }
            NetEvent::TaskCreated(task) => {
                self.request = RequestState::Idle;
                self.close_form();
                self.notify_completion(false, &task);
                self.notify(Notification::Success("Task created".to_string()));
                self.tasks.insert(0, task);
            }
            NetEvent::TaskUpdated(task) => {
                self.request = RequestState::Idle;
                self.close_form();
                let prior = self.tasks.iter().position(|t| t.id == task.id);
                let was_completed = prior.is_some_and(|i| self.tasks[i].is_completed());
                self.notify_completion(was_completed, &task);
                self.notify(Notification::Success("Task updated".to_string()));
                match prior {
                    Some(i) => self.tasks[i] = task,
                    None => self.tasks.insert(0, task),
                }
                self.clamp_selection();
            }
            NetEvent::TaskDeleted(task) => {
                self.request = RequestState::Idle;
                self.tasks.retain(|t| t.id != task.id);
                self.clamp_selection();
                self.notify(Notification::Success("Task deleted".to_string()));
            }
            NetEvent::OperationFailed { action, message } => self.apply_failure(action, message),
        }
        None
    }

    fn apply_failure(&mut self, action: Action, message: String) {
        if action == Action::Seed {
            // Seeding is best effort; fall through to the empty state.
            tracing::warn!(error = %message, "seed request failed");
            self.request = RequestState::Idle;
            return;
        }
        let text = format!("Failed to {}: {message}", action.describe());
        if let Mode::Form(form) = &mut self.mode
            && form.submitting
        {
            form.submitting = false;
            form.error = Some(message.clone());
        }
        self.request = RequestState::Failed(text.clone());
        self.notify(Notification::Error(text));
    }

    fn notify_completion(&mut self, was_completed: bool, next: &Task) {
        if next.is_completed() && !was_completed {
            self.notify(Notification::TaskCompleted {
                title: next.title.clone(),
            });
        }
    }

    fn close_form(&mut self) {
        if matches!(self.mode, Mode::Form(_)) {
            self.mode = Mode::Browse;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    // -----------------------------------------------------------------------
    // Keys
    // -----------------------------------------------------------------------

    /// Handles a key press. Returns a command when the key requires a
    /// request; the caller dispatches it.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<NetCommand> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Form(_) => self.handle_form_key(key),
            Mode::ConfirmDelete(_) => self.handle_confirm_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                self.set_filter(self.filter.next());
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.set_filter(self.filter.prev());
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.set_filter(Filter::ALL[index]);
            }
            KeyCode::Char('n' | 'a') => self.mode = Mode::Form(TaskForm::create()),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.selected_task() {
                    self.mode = Mode::Form(TaskForm::edit(task));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(task) = self.selected_task() {
                    self.mode = Mode::ConfirmDelete(task.id.clone());
                }
            }
            KeyCode::Char('s' | ' ') => return self.advance_selected_status(),
            KeyCode::Char('r') => return self.dispatch(NetCommand::Load),
            _ => {}
        }
        None
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        let Mode::Form(form) = &mut self.mode else {
            return None;
        };
        if form.submitting {
            return None;
        }
        match key.code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
            KeyCode::Enter => return self.submit_form(),
            KeyCode::Left | KeyCode::Right => form.cycle_choice(),
            KeyCode::Backspace => {
                if let Some(field) = form.text_field() {
                    field.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = form.text_field() {
                    field.push(c);
                } else if c == ' ' {
                    form.cycle_choice();
                }
            }
            _ => {}
        }
        None
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        let Mode::ConfirmDelete(id) = &self.mode else {
            return None;
        };
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                let cmd = NetCommand::Delete(id.clone());
                self.mode = Mode::Browse;
                self.dispatch(cmd)
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                self.mode = Mode::Browse;
                None
            }
            _ => None,
        }
    }

    fn submit_form(&mut self) -> Option<NetCommand> {
        if self.is_busy() {
            self.notify(Notification::Error("Please wait for the current request".to_string()));
            return None;
        }
        let Mode::Form(form) = &mut self.mode else {
            return None;
        };
        match form.to_command() {
            Ok(cmd) => {
                form.error = None;
                form.submitting = true;
                self.dispatch(cmd)
            }
            Err(message) => {
                form.error = Some(message);
                None
            }
        }
    }

    fn advance_selected_status(&mut self) -> Option<NetCommand> {
        let task = self.selected_task()?;
        let cmd = NetCommand::Update {
            id: task.id.clone(),
            changes: TaskChanges {
                status: Some(task.status.next()),
                ..TaskChanges::default()
            },
        };
        self.dispatch(cmd)
    }

    /// Marks `cmd` as in flight, refusing if another request is pending.
    fn dispatch(&mut self, cmd: NetCommand) -> Option<NetCommand> {
        if self.is_busy() {
            self.notify(Notification::Error("Please wait for the current request".to_string()));
            return None;
        }
        if let Some(action) = cmd.action() {
            self.request = RequestState::Pending(action);
        }
        Some(cmd)
    }

    fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.selected = 0;
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.visible().len() {
            self.selected += 1;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
