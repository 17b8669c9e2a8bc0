//! # metrics-dash
//!
//! A live terminal dashboard for a site's metrics feed.
//!
//! The site publishes JSON samples (request rate, latency percentiles,
//! viewer count, uptime, total requests) over a WebSocket. This crate
//! follows that feed, reconnecting whenever it drops, and renders a compact
//! summary plus an optional expanded view with a rolling request-rate chart
//! and latency bars.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌───────────┐    ┌─────────┐    ┌──────────┐ │
//! │  │  app    │───▶│   data    │───▶│   ui    │───▶│ Terminal │ │
//! │  │ (state) │    │(Dashboard)│    │(ratatui)│    │          │ │
//! │  └──┬───┬──┘    └───────────┘    └─────────┘    └──────────┘ │
//! │     │   │                                                    │
//! │     ▼   ▼                                                    │
//! │ ┌──────┐ ┌───────┐                                           │
//! │ │source│ │ chart │◀── builtin | file | https (+ integrity)   │
//! │ └──┬───┘ └───────┘                                           │
//! │    ▼                                                         │
//! │  ws[s]://host/__metrics__/ws                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Feed endpoint, WebSocket connector, connection state
//!   machine, and reconnect timer ([`MetricsClient`])
//! - **[`data`]**: Sample decoding, the rolling series, readout formatting,
//!   and the per-sample [`Dashboard`] update
//! - **[`chart`]**: Chart style asset loading shared between activations
//! - **[`prefs`]**: The persisted expanded/collapsed flag
//! - **[`app`]**, **[`events`]**, **[`ui`]**: Terminal front end
//! - **[`config`]**, **[`logging`]**: Settings and log setup
//!
//! ## Usage
//!
//! ```bash
//! metrics-dash https://example.com
//! metrics-dash --feed-url ws://127.0.0.1:8080/__metrics__/ws --expanded
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::time::Duration;
//! use metrics_dash::{endpoint_for_site, MetricsClient, MetricsSource, WebSocketConnector};
//!
//! # tokio_test::block_on(async {
//! let url = endpoint_for_site("https://example.com").unwrap();
//! let mut client = MetricsClient::new(
//!     Box::new(WebSocketConnector::new(url)),
//!     Duration::from_secs(5),
//! );
//! client.start();
//! if let Some(sample) = client.poll() {
//!     println!("{} req/s", sample.requests_per_sec);
//! }
//! # });
//! ```

pub mod app;
pub mod chart;
pub mod config;
pub mod data;
pub mod events;
pub mod logging;
pub mod prefs;
pub mod source;
pub mod ui;

pub use app::App;
pub use chart::{AssetStyle, BuiltinStyle, ChartLoader, ChartStyle, LoadError, StyleSource};
pub use config::Settings;
pub use data::{Dashboard, MetricsSample, RollingSeries};
pub use prefs::{Preferences, PrefsError};
pub use source::{
    endpoint_for_site, ConnectionState, EndpointError, MetricsClient, MetricsSource,
    WebSocketConnector,
};
