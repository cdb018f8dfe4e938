//! Overlays: the add/edit task form and the delete confirmation.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::theme;
use crate::app::{FormField, TaskForm};

/// Render the task form centered over `area`.
pub fn render_form(frame: &mut Frame, area: Rect, form: &TaskForm) {
    let popup = centered(area, 64, 17);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::highlighted())
        .title(Span::styled(format!(" {} ", form.heading()), theme::bold()));

    let mut lines = Vec::new();
    for field in FormField::ALL {
        let focused = form.focus == field;
        let label_style = if focused {
            theme::highlighted()
        } else {
            theme::dimmed()
        };
        lines.push(Line::from(Span::styled(field.label(), label_style)));
        lines.push(field_value(form, field, focused));
    }
    lines.push(Line::default());

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            theme::normal().fg(theme::ERROR),
        )));
    }

    let footer = if form.submitting {
        Line::from(Span::styled("Saving\u{2026}", theme::normal().fg(theme::WARNING)))
    } else {
        Line::from(vec![
            Span::styled("Enter", theme::highlighted()),
            Span::raw(format!(": {}  ", form.submit_label())),
            Span::styled("Esc", theme::highlighted()),
            Span::raw(": Cancel  "),
            Span::styled("Tab", theme::highlighted()),
            Span::raw(": Next field"),
        ])
    };
    lines.push(footer);

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}

fn field_value(form: &TaskForm, field: FormField, focused: bool) -> Line<'static> {
    let style = if focused {
        theme::bold()
    } else {
        theme::normal()
    };
    match field {
        FormField::Status | FormField::Priority => {
            let value = if field == FormField::Status {
                form.status.label()
            } else {
                form.priority.label()
            };
            if focused {
                Line::from(vec![
                    Span::styled("\u{2039} ", theme::highlighted()),
                    Span::styled(value, style),
                    Span::styled(" \u{203a}", theme::highlighted()),
                ])
            } else {
                Line::from(Span::styled(format!("  {value}"), style))
            }
        }
        FormField::Title | FormField::Description | FormField::DueDate => {
            let text = match field {
                FormField::Title => form.title.clone(),
                FormField::Description => form.description.clone(),
                _ => form.due_date.clone(),
            };
            let mut spans = vec![Span::styled(format!("  {text}"), style)];
            if focused {
                spans.push(Span::styled("\u{2588}", theme::highlighted()));
            } else if text.is_empty() && field == FormField::DueDate {
                spans.push(Span::styled("YYYY-MM-DD", theme::dimmed()));
            }
            Line::from(spans)
        }
    }
}

/// Render the delete confirmation dialog for the task titled `title`.
pub fn render_confirm_delete(frame: &mut Frame, area: Rect, title: &str) {
    let popup = centered(area, 50, 6);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::normal().fg(theme::ERROR))
        .title(Span::styled(" Delete Task ", theme::bold()));
    let lines = vec![
        Line::from(vec![
            Span::raw("Delete "),
            Span::styled(format!("\u{201c}{title}\u{201d}"), theme::bold()),
            Span::raw("?"),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("y", theme::highlighted()),
            Span::raw(": Delete  "),
            Span::styled("n", theme::highlighted()),
            Span::raw(": Keep"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}

/// A `width` x `height` rectangle centered in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
