//! The always-visible one-line summary.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let summary = &app.dashboard.compact;
    let value = Style::default().add_modifier(Modifier::BOLD);
    let arrow = if app.expanded { "▾" } else { "▸" };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", arrow), Style::default().fg(app.theme.highlight)),
        Span::styled(summary.rps.clone(), value),
        Span::styled(" req/s", app.theme.label),
        Span::raw("  │  "),
        Span::styled("p50 ", app.theme.label),
        Span::styled(summary.latency.clone(), value),
        Span::raw("  │  "),
        Span::styled(summary.viewers.clone(), value),
        Span::styled(" viewers", app.theme.label),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}
