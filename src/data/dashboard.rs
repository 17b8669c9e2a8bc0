//! Dashboard model: what each surface currently shows.
//!
//! [`Dashboard::apply`] implements the per-sample update. The compact summary
//! always changes; the expanded panel only exists once charts have been
//! activated, and until then samples touch nothing else.

use std::sync::Arc;

use super::format::{format_micros, format_rate, format_uptime, group_thousands};
use super::sample::MetricsSample;
use super::series::RollingSeries;
use crate::chart::ChartStyle;

/// Placeholder shown before the first sample.
const EMPTY: &str = "--";

/// Always-visible one-line summary.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactSummary {
    pub rps: String,
    pub latency: String,
    pub viewers: String,
}

impl Default for CompactSummary {
    fn default() -> Self {
        Self {
            rps: EMPTY.to_string(),
            latency: format!("{}μs", EMPTY),
            viewers: EMPTY.to_string(),
        }
    }
}

/// Text readouts of the expanded panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailReadouts {
    pub rps: String,
    pub p50: String,
    pub p95: String,
    pub p99: String,
    pub viewers: String,
    pub uptime: String,
    pub total_requests: String,
}

impl Default for DetailReadouts {
    fn default() -> Self {
        Self {
            rps: EMPTY.to_string(),
            p50: EMPTY.to_string(),
            p95: EMPTY.to_string(),
            p99: EMPTY.to_string(),
            viewers: EMPTY.to_string(),
            uptime: EMPTY.to_string(),
            total_requests: EMPTY.to_string(),
        }
    }
}

/// Chart data and readouts behind the expanded view.
#[derive(Debug, Clone)]
pub struct ExpandedPanel {
    pub style: Arc<ChartStyle>,
    /// Request-rate history driving the line chart.
    pub series: RollingSeries,
    /// Latest `[p50, p95, p99]`; no latency history is kept.
    pub latency_bars: [u64; 3],
    pub readouts: DetailReadouts,
}

impl ExpandedPanel {
    fn new(style: Arc<ChartStyle>) -> Self {
        Self {
            style,
            series: RollingSeries::new(),
            latency_bars: [0; 3],
            readouts: DetailReadouts::default(),
        }
    }
}

/// Everything the UI renders from the feed.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub compact: CompactSummary,
    expanded: Option<ExpandedPanel>,
    samples_seen: u64,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the chart panel. Returns false if it already existed.
    pub fn init_charts(&mut self, style: Arc<ChartStyle>) -> bool {
        if self.expanded.is_some() {
            return false;
        }
        self.expanded = Some(ExpandedPanel::new(style));
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.expanded.is_some()
    }

    pub fn panel(&self) -> Option<&ExpandedPanel> {
        self.expanded.as_ref()
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    /// Apply one inbound sample, labelling its series point with `label`.
    pub fn apply(&mut self, sample: &MetricsSample, label: impl Into<String>) {
        self.samples_seen += 1;

        self.compact.rps = format_rate(sample.requests_per_sec);
        self.compact.latency = format_micros(sample.p50_micros);
        self.compact.viewers = sample.websocket_clients.to_string();

        let Some(panel) = self.expanded.as_mut() else {
            return;
        };

        panel.series.push(label, sample.requests_per_sec);
        panel.latency_bars = sample.latency_bars();

        let readouts = &mut panel.readouts;
        readouts.rps = format_rate(sample.requests_per_sec);
        readouts.p50 = group_thousands(sample.p50_micros);
        readouts.p95 = group_thousands(sample.p95_micros);
        readouts.p99 = group_thousands(sample.p99_micros);
        readouts.viewers = sample.websocket_clients.to_string();
        readouts.uptime = format_uptime(sample.uptime_secs);
        readouts.total_requests = group_thousands(sample.total_requests);
    }
}
