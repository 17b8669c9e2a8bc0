//! Expanded view: request-rate line chart, latency bars, and readouts.
//!
//! ```text
//! ┌ req/s ─────────────────────────────────┐
//! │        ⣀⡠⠤⠒⠉⠉⠒⠢⢄⣀                        │
//! │ 12:00:01                      12:01:00 │
//! └────────────────────────────────────────┘
//! ┌ Latency (μs) ──────┐┌ Stats ───────────┐
//! │ ███  ███  ███      ││ Requests/s  12.3 │
//! │ p50  p95  p99      ││ ...              │
//! └────────────────────┘└──────────────────┘
//! ```

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
    },
    Frame,
};

use crate::app::App;
use crate::data::format::group_thousands;
use crate::data::ExpandedPanel;
use crate::ui::Theme;

const BAR_LABELS: [&str; 3] = ["p50", "p95", "p99"];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(panel) = app.dashboard.panel() else {
        render_placeholder(frame, app, area);
        return;
    };

    let [top, bottom] =
        Layout::vertical([Constraint::Percentage(55), Constraint::Fill(1)]).areas(area);
    let [bars, stats] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(30)]).areas(bottom);

    render_rate_chart(frame, &app.theme, panel, top);
    render_latency_bars(frame, &app.theme, panel, bars);
    render_stats(frame, &app.theme, panel, stats);
}

fn block<'a>(theme: &Theme, title: String) -> Block<'a> {
    Block::default()
        .title(Span::styled(format!(" {} ", title), theme.header))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border))
}

fn render_placeholder(frame: &mut Frame, app: &App, area: Rect) {
    let text = match &app.chart_error {
        Some(err) => Line::from(vec![
            Span::styled(
                format!("Charts unavailable: {}", err),
                Style::default().fg(app.theme.critical),
            ),
            Span::styled(
                "  (press e twice to retry)",
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]),
        None => Line::from(Span::styled(
            "Loading charts...",
            Style::default().add_modifier(Modifier::DIM),
        )),
    };

    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), middle);
}

fn render_rate_chart(frame: &mut Frame, theme: &Theme, panel: &ExpandedPanel, area: Rect) {
    let style = &panel.style;
    let points = panel.series.points();

    let x_max = (panel.series.len().saturating_sub(1)).max(1) as f64;
    let y_max = (panel.series.max().unwrap_or(0.0) * 1.1).max(1.0);

    let dataset = Dataset::default()
        .marker(style.marker.into())
        .graph_type(GraphType::Line)
        .style(Style::default().fg(style.rps_color))
        .data(&points);

    let x_labels = vec![
        panel.series.first_label().unwrap_or("").to_string(),
        panel.series.last_label().unwrap_or("").to_string(),
    ];
    let y_labels = vec!["0".to_string(), format!("{:.0}", y_max)];

    let chart = Chart::new(vec![dataset])
        .block(block(theme, style.rps_label.clone()))
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(x_labels)
                .style(theme.label),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(y_labels)
                .style(theme.label),
        );

    frame.render_widget(chart, area);
}

fn render_latency_bars(frame: &mut Frame, theme: &Theme, panel: &ExpandedPanel, area: Rect) {
    let style = &panel.style;

    let bars: Vec<Bar> = BAR_LABELS
        .iter()
        .zip(panel.latency_bars)
        .zip(style.bar_colors())
        .map(|((label, value), color)| {
            Bar::default()
                .label(Line::from(*label))
                .value(value)
                .text_value(group_thousands(value))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    // Borders take two columns, gaps one each.
    let inner = area.width.saturating_sub(2 + 2);
    let bar_width = (inner / 3).clamp(1, 12);

    let chart = BarChart::default()
        .block(block(theme, format!("Latency ({})", style.latency_unit)))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1);

    frame.render_widget(chart, area);
}

fn render_stats(frame: &mut Frame, theme: &Theme, panel: &ExpandedPanel, area: Rect) {
    let r = &panel.readouts;
    let unit = &panel.style.latency_unit;

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!(" {:<12}", label), theme.label),
            Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
        ])
    };

    let lines = vec![
        row("Requests/s", r.rps.clone()),
        row("p50", format!("{}{}", r.p50, unit)),
        row("p95", format!("{}{}", r.p95, unit)),
        row("p99", format!("{}{}", r.p99, unit)),
        row("Viewers", r.viewers.clone()),
        row("Uptime", r.uptime.clone()),
        row("Total", r.total_requests.clone()),
    ];

    frame.render_widget(Paragraph::new(lines).block(block(theme, "Stats".to_string())), area);
}
