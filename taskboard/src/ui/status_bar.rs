//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Mode, RequestState};

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match app.mode {
        Mode::Browse => {
            "n: new | e: edit | d: delete | s: advance status | \u{2190}\u{2192}/1-4: filter | r: reload | q: quit"
        }
        Mode::Form(_) => "Tab: next field | \u{2190}\u{2192}: change choice | Enter: save | Esc: cancel",
        Mode::ConfirmDelete(_) => "y: delete | n: keep",
    };

    let (dot_color, status_text) = match &app.request {
        RequestState::Idle => (theme::SUCCESS, "Ready".to_string()),
        RequestState::Pending(action) => (theme::WARNING, format!("Working: {}", action.describe())),
        RequestState::Failed(message) => (theme::ERROR, message.clone()),
    };

    let status_line = Line::from(vec![
        Span::styled(
            concat!("Taskboard v", env!("CARGO_PKG_VERSION")),
            theme::bold(),
        ),
        Span::raw(" | "),
        Span::styled("\u{25cf}", theme::normal().fg(dot_color)),
        Span::raw(format!(" {status_text}")),
        Span::raw(" | "),
        Span::styled(help_text, theme::dimmed()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
