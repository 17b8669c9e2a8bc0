//! Live metrics feed.
//!
//! This module owns everything between the network and the dashboard model:
//! deriving the feed endpoint, opening WebSocket connections, tracking the
//! connection state machine, and re-arming the reconnect timer after every
//! close.
//!
//! ```text
//!  WebSocketConnector ──┐ Opened / Message / Error / Closed
//!                       ├──────────────▶ mpsc ──▶ MetricsClient::poll()
//!  ReconnectTimer ──────┘ ReconnectDue                │
//!                                                     ▼
//!                                          Option<MetricsSample>
//! ```
//!
//! Tasks only send events; all state changes happen in
//! [`MetricsClient::poll`], on the thread driving the UI.

mod client;
mod connection;
mod endpoint;
mod reconnect;
mod websocket;

pub use client::MetricsClient;
pub use connection::{ConnectionState, Lifecycle};
pub use endpoint::{endpoint_for_site, EndpointError, METRICS_PATH};
pub use reconnect::{ReconnectTimer, DEFAULT_RECONNECT_DELAY};
pub use websocket::WebSocketConnector;

use std::fmt::Debug;

use tokio::sync::mpsc;

use crate::data::MetricsSample;

/// Events delivered to the client by connection and timer tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// The connection was established.
    Opened,
    /// A text payload arrived.
    Message(String),
    /// The transport reported an error.
    Error(String),
    /// The connection ended, gracefully or not.
    Closed,
    /// The reconnect delay elapsed for the timer of this generation.
    ReconnectDue(u64),
    /// A payload arrived that is not valid UTF-8.
    Malformed(String),
}

/// Sender half handed to connection and timer tasks.
pub type FeedSender = mpsc::UnboundedSender<FeedEvent>;

/// Opens feed connections.
///
/// `connect` must not block: it starts an attempt and reports its lifecycle
/// through `events`. Every attempt ends with exactly one
/// [`FeedEvent::Closed`], including attempts that never opened.
pub trait Connector: Send + Debug {
    fn connect(&self, events: FeedSender);

    /// Human-readable target, for the header bar.
    fn target(&self) -> &str;
}

/// Trait for receiving metrics samples.
///
/// Implementations are polled from the UI loop and must not block.
pub trait MetricsSource: Send + Debug {
    /// Process pending events and return the next sample, if any.
    fn poll(&mut self) -> Option<MetricsSample>;

    /// Current connection state for the status indicator.
    fn state(&self) -> ConnectionState;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
