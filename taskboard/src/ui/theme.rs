//! Theme and styling constants for the TUI.

use ratatui::style::{Color, Modifier, Style};
use taskboard_proto::task::{Priority, TaskStatus};

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Success indicator color.
pub const SUCCESS: Color = Color::Green;

/// Warning / in-flight indicator color.
pub const WARNING: Color = Color::Yellow;

/// Error indicator color.
pub const ERROR: Color = Color::Red;

/// Brand accent used for the header mark.
pub const BRAND: Color = Color::Rgb(99, 102, 241);

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (dates, metadata).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (focused borders, active tab).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected item style (in lists).
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .bg(Color::Rgb(40, 44, 70))
        .add_modifier(Modifier::BOLD)
}

/// Loading skeleton placeholder blocks.
#[must_use]
pub fn skeleton() -> Style {
    Style::default().fg(Color::Rgb(70, 70, 80))
}

/// Style for the status bar background (dark background with white foreground).
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Badge color for a task status.
#[must_use]
pub const fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => Color::Yellow,
        TaskStatus::InProgress => Color::LightBlue,
        TaskStatus::Completed => Color::Green,
    }
}

/// Bold badge style for a task status.
#[must_use]
pub fn status_badge(status: TaskStatus) -> Style {
    Style::default()
        .fg(status_color(status))
        .add_modifier(Modifier::BOLD)
}

/// Marker and style for a priority.
#[must_use]
pub fn priority_marker(priority: Priority) -> (&'static str, Style) {
    match priority {
        Priority::Low => ("\u{25bd} Low", dimmed()),
        Priority::Medium => ("\u{25c7} Medium", Style::default().fg(WARNING)),
        Priority::High => (
            "\u{25b2} High",
            Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
        ),
    }
}

/// Style for toast notifications of the given severity color.
#[must_use]
pub fn toast(color: Color) -> Style {
    Style::default().fg(color).bg(Color::Rgb(25, 25, 35))
}
