//! The live metrics client.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::{
    ConnectionState, Connector, FeedEvent, FeedSender, Lifecycle, MetricsSource, ReconnectTimer,
};
use crate::data::MetricsSample;

/// Reconnecting metrics feed client.
///
/// Owns the connector, the connection state and the reconnect timer. Events
/// from connection and timer tasks queue up in a channel and are handled one
/// at a time, in delivery order, by [`MetricsSource::poll`].
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use metrics_dash::source::{endpoint_for_site, MetricsClient, MetricsSource, WebSocketConnector};
///
/// # tokio_test::block_on(async {
/// let url = endpoint_for_site("https://example.com").unwrap();
/// let mut client = MetricsClient::new(Box::new(WebSocketConnector::new(url)), Duration::from_secs(5));
/// client.start();
/// if let Some(sample) = client.poll() {
///     println!("{:.1} req/s", sample.requests_per_sec);
/// }
/// # });
/// ```
#[derive(Debug)]
pub struct MetricsClient {
    connector: Box<dyn Connector>,
    state: ConnectionState,
    timer: ReconnectTimer,
    events_tx: FeedSender,
    events_rx: mpsc::UnboundedReceiver<FeedEvent>,
    description: String,
    attempts: u64,
    discarded: u64,
}

impl MetricsClient {
    pub fn new(connector: Box<dyn Connector>, reconnect_delay: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let description = format!("feed: {}", connector.target());
        Self {
            connector,
            state: ConnectionState::Connecting,
            timer: ReconnectTimer::new(reconnect_delay),
            events_tx,
            events_rx,
            description,
            attempts: 0,
            discarded: 0,
        }
    }

    /// Start the first connection attempt.
    pub fn start(&mut self) {
        self.connect();
    }

    /// Number of connection attempts made so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Number of malformed payloads dropped so far.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Whether a reconnect is currently scheduled.
    pub fn reconnect_pending(&self) -> bool {
        self.timer.is_armed()
    }

    fn connect(&mut self) {
        self.attempts += 1;
        self.connector.connect(self.events_tx.clone());
    }

    /// Handle one event. Returns a sample for well-formed messages.
    pub fn handle_event(&mut self, event: FeedEvent) -> Option<MetricsSample> {
        match event {
            FeedEvent::Opened => {
                self.state = self.state.on(Lifecycle::Open);
                info!(feed = self.connector.target(), "metrics feed open");
                None
            }
            FeedEvent::Message(payload) => match MetricsSample::parse(&payload) {
                Ok(sample) => Some(sample),
                Err(e) => {
                    self.discarded += 1;
                    warn!(error = %e, "discarding metrics payload");
                    None
                }
            },
            FeedEvent::Error(reason) => {
                self.state = self.state.on(Lifecycle::Error);
                error!(%reason, "metrics feed error");
                None
            }
            FeedEvent::Closed => {
                self.state = self.state.on(Lifecycle::Close);
                info!(
                    delay_secs = self.timer.delay().as_secs_f64(),
                    "metrics feed closed, reconnecting"
                );
                self.timer.arm(self.events_tx.clone());
                None
            }
            FeedEvent::Malformed(reason) => {
                self.discarded += 1;
                warn!(%reason, "discarding metrics payload");
                None
            }
            FeedEvent::ReconnectDue(generation) => {
                if !self.timer.take_due(generation) {
                    debug!(generation, "ignoring stale reconnect");
                    return None;
                }
                self.state = self.state.on(Lifecycle::Retry);
                self.connect();
                None
            }
        }
    }
}

impl MetricsSource for MetricsClient {
    fn poll(&mut self) -> Option<MetricsSample> {
        while let Ok(event) = self.events_rx.try_recv() {
            if let Some(sample) = self.handle_event(event) {
                return Some(sample);
            }
        }
        None
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn description(&self) -> &str {
        &self.description
    }
}
