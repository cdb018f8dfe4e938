//! Header rendering: brand mark, page title, and the add-task hint.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;

/// Render the header bar.
pub fn render(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(theme::dimmed());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(18)])
        .split(inner);

    let title = vec![
        Line::from(vec![
            Span::styled(" T ", theme::bold().bg(theme::BRAND)),
            Span::raw(" "),
            Span::styled("Taskboard", theme::bold()),
            Span::styled("  Tasks", theme::highlighted()),
        ]),
        Line::from(Span::styled(
            "Manage and track your tasks efficiently",
            theme::dimmed(),
        )),
    ];
    frame.render_widget(Paragraph::new(title), columns[0]);

    let action = Line::from(vec![
        Span::styled("[n]", theme::highlighted()),
        Span::styled(" Add Task", theme::normal()),
    ]);
    frame.render_widget(Paragraph::new(action).alignment(Alignment::Right), columns[1]);
}
