//! Filter tabs with per-status counts.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
};
use taskboard_proto::view::Filter;

use super::theme;
use crate::app::App;

/// Render the filter tab bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let counts = app.counts();
    let titles: Vec<Line> = Filter::ALL
        .iter()
        .map(|&filter| {
            Line::from(vec![
                Span::raw(filter.label()),
                Span::styled(format!(" ({})", counts.get(filter)), theme::dimmed()),
            ])
        })
        .collect();

    let selected = Filter::ALL
        .iter()
        .position(|&f| f == app.filter)
        .unwrap_or_default();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::dimmed())
                .title(Span::styled(" Filter ", theme::dimmed())),
        )
        .style(theme::normal())
        .highlight_style(theme::highlighted())
        .select(selected)
        .divider(Span::styled("|", theme::dimmed()));

    frame.render_widget(tabs, area);
}
