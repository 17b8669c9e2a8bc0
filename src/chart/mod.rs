//! On-demand chart style loading.
//!
//! The expanded view needs a [`ChartStyle`] before its charts can be built.
//! The style comes from a [`StyleSource`] and is fetched at most once per
//! successful load: [`ChartLoader::load`] hands every concurrent caller the
//! same in-flight future, so they all resolve, or all fail, together. A
//! failed load leaves the loader idle and the next activation tries again.

mod asset;
mod integrity;

pub use asset::{AssetStyle, BuiltinStyle, StyleSource};
pub use integrity::{Algorithm, Integrity};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use ratatui::style::Color;
use ratatui::symbols::Marker;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from loading the chart style asset.
///
/// Cloneable so a single failure can be handed to every waiting caller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoadError {
    #[error("failed to fetch chart style: {0}")]
    Fetch(String),

    #[error("failed to parse chart style: {0}")]
    Parse(String),

    #[error("invalid integrity metadata: {0}")]
    BadIntegrity(String),

    #[error("chart style failed integrity check")]
    IntegrityMismatch,
}

/// Point marker for the request-rate line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineMarker {
    #[default]
    Braille,
    Dot,
    Block,
}

impl From<LineMarker> for Marker {
    fn from(marker: LineMarker) -> Self {
        match marker {
            LineMarker::Braille => Marker::Braille,
            LineMarker::Dot => Marker::Dot,
            LineMarker::Block => Marker::Block,
        }
    }
}

/// Colors and labels for the expanded view's charts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub rps_color: Color,
    pub p50_color: Color,
    pub p95_color: Color,
    pub p99_color: Color,
    pub rps_label: String,
    pub latency_unit: String,
    pub marker: LineMarker,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            rps_color: Color::Rgb(75, 192, 192),
            p50_color: Color::Rgb(54, 162, 235),
            p95_color: Color::Rgb(255, 206, 86),
            p99_color: Color::Rgb(255, 99, 132),
            rps_label: "req/s".to_string(),
            latency_unit: "μs".to_string(),
            marker: LineMarker::Braille,
        }
    }
}

impl ChartStyle {
    /// Bar colors in `[p50, p95, p99]` order.
    pub fn bar_colors(&self) -> [Color; 3] {
        [self.p50_color, self.p95_color, self.p99_color]
    }
}

type LoadResult = Result<Arc<ChartStyle>, LoadError>;

enum LoadState {
    Idle,
    Loading { id: u64, future: Shared<BoxFuture<'static, LoadResult>> },
    Loaded(Arc<ChartStyle>),
}

/// Loads the chart style once and shares it.
pub struct ChartLoader {
    source: Arc<dyn StyleSource>,
    state: Mutex<LoadState>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for ChartLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.state.lock() {
            LoadState::Idle => "idle",
            LoadState::Loading { .. } => "loading",
            LoadState::Loaded(_) => "loaded",
        };
        f.debug_struct("ChartLoader")
            .field("source", &self.source.describe())
            .field("state", &state)
            .finish()
    }
}

impl ChartLoader {
    pub fn new(source: Arc<dyn StyleSource>) -> Self {
        Self {
            source,
            state: Mutex::new(LoadState::Idle),
            next_id: AtomicU64::new(1),
        }
    }

    /// Whether a style has been loaded successfully.
    pub fn is_loaded(&self) -> bool {
        matches!(*self.state.lock(), LoadState::Loaded(_))
    }

    /// Load the style, joining an in-flight load if there is one.
    pub async fn load(&self) -> LoadResult {
        let (id, future) = {
            let mut state = self.state.lock();
            match &*state {
                LoadState::Loaded(style) => return Ok(style.clone()),
                LoadState::Loading { id, future } => {
                    debug!("joining in-flight chart style load");
                    (*id, future.clone())
                }
                LoadState::Idle => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let source = self.source.clone();
                    info!(source = %source.describe(), "loading chart style");
                    let future = async move { source.fetch().await.map(Arc::new) }
                        .boxed()
                        .shared();
                    *state = LoadState::Loading {
                        id,
                        future: future.clone(),
                    };
                    (id, future)
                }
            }
        };

        let result = future.await;

        let mut state = self.state.lock();
        if matches!(&*state, LoadState::Loading { id: current, .. } if *current == id) {
            *state = match &result {
                Ok(style) => LoadState::Loaded(style.clone()),
                Err(_) => LoadState::Idle,
            };
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    /// Blocks each fetch until released; fails the first `failures` fetches.
    struct GatedSource {
        fetches: AtomicUsize,
        failures: usize,
        gate: Notify,
    }

    impl GatedSource {
        fn new(failures: usize) -> Arc<Self> {
            Arc::new(Self {
                fetches: AtomicUsize::new(0),
                failures,
                gate: Notify::new(),
            })
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StyleSource for GatedSource {
        async fn fetch(&self) -> Result<ChartStyle, LoadError> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            if n < self.failures {
                Err(LoadError::Fetch("offline".to_string()))
            } else {
                Ok(ChartStyle::default())
            }
        }

        fn describe(&self) -> String {
            "gated".to_string()
        }
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_fetch() {
        let source = GatedSource::new(0);
        let loader = Arc::new(ChartLoader::new(source.clone()));

        let a = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load().await }
        });
        let b = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load().await }
        });
        settle().await;

        source.gate.notify_one();
        let (a, b) = (a.await.unwrap(), b.await.unwrap());

        assert_eq!(source.fetches(), 1);
        assert!(a.is_ok() && b.is_ok());
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert!(loader.is_loaded());
    }

    #[tokio::test]
    async fn loaded_style_is_reused() {
        let source = GatedSource::new(0);
        let loader = ChartLoader::new(source.clone());

        source.gate.notify_one();
        loader.load().await.unwrap();
        loader.load().await.unwrap();

        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn failure_reaches_every_waiter_then_retries() {
        let source = GatedSource::new(1);
        let loader = Arc::new(ChartLoader::new(source.clone()));

        let a = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load().await }
        });
        let b = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load().await }
        });
        settle().await;

        source.gate.notify_one();
        assert!(a.await.unwrap().is_err());
        assert!(b.await.unwrap().is_err());
        assert_eq!(source.fetches(), 1);
        assert!(!loader.is_loaded());

        source.gate.notify_one();
        assert!(loader.load().await.is_ok());
        assert_eq!(source.fetches(), 2);
    }

    #[test]
    fn style_json_overrides_defaults() {
        let style: ChartStyle =
            serde_json::from_str(r##"{"rps_color": "#00ff00", "marker": "dot", "other": 1}"##)
                .unwrap();
        assert_eq!(style.rps_color, Color::Rgb(0, 255, 0));
        assert_eq!(style.marker, LineMarker::Dot);
        assert_eq!(style.p99_color, ChartStyle::default().p99_color);
        assert_eq!(style.rps_label, "req/s");
    }

    #[test]
    fn named_colors_parse() {
        let style: ChartStyle = serde_json::from_str(r#"{"p50_color": "cyan"}"#).unwrap();
        assert_eq!(style.p50_color, Color::Cyan);
    }
}
