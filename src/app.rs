//! Application state and view logic.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::chart::{ChartLoader, ChartStyle, LoadError};
use crate::data::format::time_label;
use crate::data::Dashboard;
use crate::prefs::Preferences;
use crate::source::{ConnectionState, MetricsSource};
use crate::ui::Theme;

type ChartResult = Result<Arc<ChartStyle>, LoadError>;

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    /// Whether the expanded view is showing.
    pub expanded: bool,

    source: Box<dyn MetricsSource>,
    pub dashboard: Dashboard,
    prefs: Preferences,

    // Chart loading
    loader: Arc<ChartLoader>,
    chart_tx: mpsc::UnboundedSender<ChartResult>,
    chart_rx: mpsc::UnboundedReceiver<ChartResult>,
    /// Last chart load failure, shown in place of the charts.
    pub chart_error: Option<String>,

    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create the app, restoring the expanded flag from `prefs`.
    ///
    /// Must be called inside a tokio runtime: a persisted expanded view
    /// starts loading charts straight away.
    pub fn new(
        source: Box<dyn MetricsSource>,
        loader: Arc<ChartLoader>,
        prefs: Preferences,
        theme: Theme,
    ) -> Self {
        let (chart_tx, chart_rx) = mpsc::unbounded_channel();
        let expanded = prefs.expanded();

        let mut app = Self {
            running: true,
            show_help: false,
            expanded,
            source,
            dashboard: Dashboard::new(),
            prefs,
            loader,
            chart_tx,
            chart_rx,
            chart_error: None,
            theme,
            status_message: None,
        };
        if expanded {
            app.activate_charts();
        }
        app
    }

    /// Returns a description of the metrics source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.source.state()
    }

    /// Whether the expanded view is waiting on its chart style.
    pub fn charts_loading(&self) -> bool {
        self.expanded && !self.dashboard.is_initialized() && self.chart_error.is_none()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_TTL => Some(msg),
            _ => None,
        }
    }

    pub fn toggle_expanded(&mut self) {
        self.set_expanded(!self.expanded);
    }

    /// Show or hide the expanded view and remember the choice.
    ///
    /// Hiding keeps the chart panel, which goes on collecting samples.
    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
        if let Err(e) = self.prefs.set_expanded(expanded) {
            warn!(error = %e, "failed to persist view state");
            self.set_status_message(format!("Could not save view state: {}", e));
        }
        if expanded {
            self.activate_charts();
        }
    }

    /// Start loading the chart style unless the panel already exists.
    ///
    /// Overlapping activations share the loader's in-flight fetch.
    pub fn activate_charts(&mut self) {
        if self.dashboard.is_initialized() {
            return;
        }
        self.chart_error = None;

        let loader = self.loader.clone();
        let tx = self.chart_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(loader.load().await);
        });
    }

    /// Apply finished chart loads and pending samples.
    pub fn tick(&mut self) {
        while let Ok(result) = self.chart_rx.try_recv() {
            self.finish_chart_load(result);
        }
        while let Some(sample) = self.source.poll() {
            self.dashboard.apply(&sample, time_label());
        }
    }

    fn finish_chart_load(&mut self, result: ChartResult) {
        match result {
            Ok(style) => {
                if self.dashboard.init_charts(style) {
                    info!("charts initialized");
                    self.chart_error = None;
                }
            }
            Err(e) if !self.dashboard.is_initialized() => {
                error!(error = %e, "chart load failed");
                self.chart_error = Some(e.to_string());
                self.set_status_message(format!("Charts unavailable: {}", e));
            }
            Err(_) => {}
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::chart::{BuiltinStyle, StyleSource};
    use crate::source::{Connector, FeedEvent, FeedSender, MetricsClient};

    /// Fails the first `failures` fetches.
    struct FlakySource {
        calls: AtomicUsize,
        failures: usize,
    }

    #[async_trait]
    impl StyleSource for FlakySource {
        async fn fetch(&self) -> Result<ChartStyle, LoadError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                Err(LoadError::Fetch("offline".to_string()))
            } else {
                Ok(ChartStyle::default())
            }
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }
    }

    #[tokio::test]
    async fn collapsed_app_only_updates_compact_summary() {
        let mut app = app_with(vec![sample(12.34)], Preferences::in_memory());
        app.tick();

        assert_eq!(app.dashboard.compact.rps, "12.3");
        assert_eq!(app.dashboard.compact.latency, "1,200μs");
        assert!(!app.dashboard.is_initialized());
    }

    #[tokio::test]
    async fn expanding_initializes_charts_and_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        let mut app = app_with(vec![], Preferences::load(&path));

        app.toggle_expanded();
        assert!(app.charts_loading());
        settle(&mut app).await;

        assert!(app.dashboard.is_initialized());
        assert!(!app.charts_loading());
        assert!(Preferences::load(&path).expanded());
    }

    #[tokio::test]
    async fn persisted_expanded_view_loads_at_startup() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        Preferences::load(&path).set_expanded(true).unwrap();

        let mut app = app_with(vec![sample(5.0)], Preferences::load(&path));
        assert!(app.expanded);
        settle(&mut app).await;

        assert!(app.dashboard.is_initialized());
    }

    #[tokio::test]
    async fn collapsed_panel_keeps_accumulating() {
        let mut app = app_with(vec![], Preferences::in_memory());
        app.toggle_expanded();
        settle(&mut app).await;
        app.toggle_expanded();
        assert!(!app.expanded);

        let mut source = FakeSource::default();
        source.samples.extend([sample(1.0), sample(2.0)]);
        app.source = Box::new(source);
        app.tick();

        let panel = app.dashboard.panel().unwrap();
        assert_eq!(panel.series.len(), 2);
        assert_eq!(panel.readouts.uptime, "1h 2m 5s");
    }

    #[tokio::test]
    async fn failed_load_is_retried_on_next_activation() {
        let loader = Arc::new(ChartLoader::new(Arc::new(FlakySource {
            calls: AtomicUsize::new(0),
            failures: 1,
        })));
        let mut app = App::new(
            Box::new(FakeSource::default()),
            loader,
            Preferences::in_memory(),
            Theme::dark(),
        );

        app.toggle_expanded();
        settle(&mut app).await;
        assert!(!app.dashboard.is_initialized());
        assert!(app.chart_error.is_some());
        assert!(app.get_status_message().is_some());

        app.toggle_expanded();
        app.toggle_expanded();
        assert!(app.chart_error.is_none());
        settle(&mut app).await;
        assert!(app.dashboard.is_initialized());
    }

    #[tokio::test]
    async fn repeated_toggles_build_one_panel() {
        let mut app = app_with(vec![], Preferences::in_memory());
        app.toggle_expanded();
        app.toggle_expanded();
        app.toggle_expanded();
        settle(&mut app).await;

        assert!(app.expanded);
        assert!(app.dashboard.is_initialized());
    }

    /// Hands each connection's event sender back to the test.
    #[derive(Debug, Default, Clone)]
    struct HandoffConnector {
        senders: Arc<parking_lot::Mutex<Vec<FeedSender>>>,
    }

    impl Connector for HandoffConnector {
        fn connect(&self, events: FeedSender) {
            self.senders.lock().push(events);
        }

        fn target(&self) -> &str {
            "handoff"
        }
    }

    #[tokio::test]
    async fn non_json_message_leaves_display_unchanged() {
        let connector = HandoffConnector::default();
        let mut client = MetricsClient::new(Box::new(connector.clone()), Duration::from_secs(5));
        client.start();
        let loader = Arc::new(ChartLoader::new(Arc::new(BuiltinStyle)));
        let mut app = App::new(Box::new(client), loader, Preferences::in_memory(), Theme::dark());
        app.toggle_expanded();
        settle(&mut app).await;

        let tx = connector.senders.lock()[0].clone();
        tx.send(FeedEvent::Opened).unwrap();
        tx.send(FeedEvent::Message(serde_json::to_string(&sample(12.34)).unwrap()))
            .unwrap();
        app.tick();

        let compact = app.dashboard.compact.clone();
        let panel = app.dashboard.panel().unwrap().clone();
        assert_eq!(compact.rps, "12.3");

        tx.send(FeedEvent::Message("{not json".to_string())).unwrap();
        app.tick();

        assert_eq!(app.dashboard.compact, compact);
        let after = app.dashboard.panel().unwrap();
        assert_eq!(after.readouts, panel.readouts);
        assert_eq!(after.latency_bars, panel.latency_bars);
        assert_eq!(after.series.len(), panel.series.len());
        assert_eq!(app.dashboard.samples_seen(), 1);
        assert_eq!(app.connection_state(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn status_message_expires() {
        let mut app = app_with(vec![], Preferences::in_memory());
        app.set_status_message("hello".to_string());
        assert_eq!(app.get_status_message(), Some("hello"));

        app.status_message = Some(("old".to_string(), Instant::now() - STATUS_TTL));
        assert_eq!(app.get_status_message(), None);
    }

    #[tokio::test]
    async fn quit_stops_running() {
        let mut app = app_with(vec![], Preferences::in_memory());
        app.quit();
        assert!(!app.running);
    }
}
