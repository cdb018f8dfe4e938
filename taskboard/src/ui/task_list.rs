//! Task list rendering: task cards, the loading skeleton, the empty state,
//! and the no-results message.

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use taskboard_proto::task::Task;

use super::theme;
use crate::app::App;

/// Maximum characters of description shown on a card.
const DESCRIPTION_PREVIEW_CHARS: usize = 90;

/// Number of placeholder cards in the loading skeleton.
const SKELETON_CARDS: usize = 3;

/// Render whichever body the current state calls for.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    if app.is_loading() {
        render_skeleton(frame, area);
    } else if app.shows_empty_state() {
        render_empty_state(frame, area);
    } else if app.shows_no_results() {
        render_no_results(frame, area);
    } else {
        render_cards(frame, area, app);
    }
}

fn render_cards(frame: &mut Frame, area: Rect, app: &App) {
    let now = Utc::now();
    let items: Vec<ListItem> = app
        .visible()
        .into_iter()
        .map(|task| ListItem::new(card_lines(task, now)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::dimmed())
                .title(Span::styled(" Tasks ", theme::bold())),
        )
        .highlight_style(theme::selected())
        .highlight_symbol("\u{258c} ");

    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// The lines of one task card.
fn card_lines(task: &Task, now: DateTime<Utc>) -> Vec<Line<'static>> {
    let (priority, priority_style) = theme::priority_marker(task.priority);
    let title_style = if task.is_completed() {
        theme::dimmed().add_modifier(ratatui::style::Modifier::CROSSED_OUT)
    } else {
        theme::bold()
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(task.title.clone(), title_style),
        Span::raw("  "),
        Span::styled(format!("[{}]", task.status.label()), theme::status_badge(task.status)),
        Span::raw("  "),
        Span::styled(priority, priority_style),
    ])];

    if !task.description.is_empty() {
        lines.push(Line::from(Span::styled(
            preview(&task.description),
            theme::normal(),
        )));
    }

    let mut meta = Vec::new();
    if let Some(due) = task.due_date {
        let overdue = due < now && !task.is_completed();
        let style = if overdue {
            theme::normal().fg(theme::ERROR)
        } else {
            theme::dimmed()
        };
        let label = if overdue { "Overdue" } else { "Due" };
        meta.push(Span::styled(format!("{label} {}", format_date(due)), style));
        meta.push(Span::styled("  \u{00b7}  ", theme::dimmed()));
    }
    meta.push(Span::styled(
        format!("Created {}", format_date(task.created_at)),
        theme::dimmed(),
    ));
    lines.push(Line::from(meta));
    lines.push(Line::default());
    lines
}

/// Formats a date the way the cards show it, e.g. `Jan 5, 2025`.
#[must_use]
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

fn preview(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() > DESCRIPTION_PREVIEW_CHARS || text.lines().nth(1).is_some() {
        let cut: String = first_line.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        format!("{}\u{2026}", cut.trim_end())
    } else {
        first_line.to_string()
    }
}

fn render_skeleton(frame: &mut Frame, area: Rect) {
    let mut lines = Vec::new();
    for i in 0..SKELETON_CARDS {
        let width = 28 + (i * 7) % 15;
        lines.push(Line::from(Span::styled("\u{2591}".repeat(width), theme::skeleton())));
        lines.push(Line::from(Span::styled("\u{2591}".repeat(width + 20), theme::skeleton())));
        lines.push(Line::from(Span::styled("\u{2591}".repeat(14), theme::skeleton())));
        lines.push(Line::default());
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::dimmed())
        .title(Span::styled(" Loading tasks\u{2026} ", theme::dimmed()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_empty_state(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled("No tasks yet", theme::bold())),
        Line::default(),
        Line::from(Span::styled(
            "Get started by creating your first task. Stay organized and boost your productivity!",
            theme::dimmed(),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("[n]", theme::highlighted()),
            Span::styled(" Create your first task", theme::normal()),
        ]),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(theme::dimmed()));
    frame.render_widget(paragraph, area);
}

fn render_no_results(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "No tasks found with the selected filter.",
            theme::dimmed(),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(theme::dimmed()));
    frame.render_widget(paragraph, area);
}
