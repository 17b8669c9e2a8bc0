//! Data models and processing for the metrics feed.
//!
//! ## Submodules
//!
//! - [`sample`]: Decoding of inbound feed payloads ([`MetricsSample`])
//! - [`series`]: Fixed-capacity request-rate history ([`RollingSeries`])
//! - [`format`]: Readout formatting (uptime, grouped counts, rates)
//! - [`dashboard`]: The per-sample update applied to both surfaces
//!
//! ## Data Flow
//!
//! ```text
//! feed payload (JSON text)
//!        │
//!        ▼
//! MetricsSample::parse()
//!        │
//!        ▼
//! Dashboard::apply()
//!        ├──▶ CompactSummary (always)
//!        └──▶ ExpandedPanel (only once charts are initialized)
//!                 ├── RollingSeries::push()
//!                 └── latency bars + readouts
//! ```

pub mod dashboard;
pub mod format;
pub mod sample;
pub mod series;

pub use dashboard::{CompactSummary, Dashboard, DetailReadouts, ExpandedPanel};
pub use sample::{MetricsSample, SampleError};
pub use series::{RollingSeries, WINDOW_CAPACITY};
