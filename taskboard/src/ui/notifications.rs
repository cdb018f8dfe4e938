//! Toast notifications, stacked in the top-right corner.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::theme;
use crate::app::{App, Notification};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 3;

/// Render live toasts, newest on top.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width.saturating_sub(width);
    let mut y = area.y + 1;

    for toast in app.toasts.iter().rev() {
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect::new(x, y, width, TOAST_HEIGHT);
        let (icon, color) = match toast.notification {
            Notification::Success(_) => ("\u{2713}", theme::SUCCESS),
            Notification::Error(_) => ("\u{2717}", theme::ERROR),
            Notification::TaskCompleted { .. } => ("\u{2605}", theme::SUCCESS),
        };
        let line = Line::from(vec![
            Span::styled(format!("{icon} "), theme::toast(color)),
            Span::styled(toast.notification.message(), theme::toast(theme::FG_PRIMARY)),
        ]);
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(line).style(theme::toast(theme::FG_PRIMARY)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme::toast(color)),
            ),
            rect,
        );
        y += TOAST_HEIGHT;
    }
}
