//! Terminal UI rendering.
//!
//! Every function here is a pure render of [`App`]; input handling lives in
//! `App::handle_key_event`.

pub mod filters;
pub mod header;
pub mod modal;
pub mod notifications;
pub mod status_bar;
pub mod task_list;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::{App, Mode};

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    // Filters are hidden while there is nothing to filter.
    let filter_height = if app.shows_empty_state() { 0 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Length(filter_height), // Filter tabs
            Constraint::Min(3),                // Task list
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    header::render(frame, chunks[0]);
    if filter_height > 0 {
        filters::render(frame, chunks[1], app);
    }
    task_list::render(frame, chunks[2], app);
    status_bar::render(frame, chunks[3], app);

    match &app.mode {
        Mode::Browse => {}
        Mode::Form(form) => modal::render_form(frame, area, form),
        Mode::ConfirmDelete(id) => {
            let title = app
                .tasks
                .iter()
                .find(|t| &t.id == id)
                .map_or("this task", |t| t.title.as_str());
            modal::render_confirm_delete(frame, area, title);
        }
    }

    notifications::render(frame, area, app);
}
