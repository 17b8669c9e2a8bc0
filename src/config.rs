//! Layered configuration.
//!
//! Settings come from, in increasing priority: built-in defaults, an
//! optional config file (TOML, JSON or YAML, chosen by extension), and
//! `METRICS_DASH__<SECTION>__<KEY>` environment variables. Command-line
//! flags are applied on top by the binary.
//!
//! ```toml
//! [feed]
//! site = "https://example.com"
//! reconnect_delay_secs = 5
//!
//! [chart]
//! url = "https://cdn.example.com/metrics-style.json"
//! integrity = "sha384-..."
//!
//! [storage]
//! path = "/home/me/.local/share/metrics-dash/storage.json"
//!
//! [log]
//! file = "metrics-dash.log"
//! filter = "info,metrics_dash=debug"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

use crate::chart::{AssetStyle, BuiltinStyle, LoadError, StyleSource};
use crate::source::{endpoint_for_site, EndpointError, DEFAULT_RECONNECT_DELAY};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "METRICS_DASH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// Site whose metrics feed to follow.
    pub site: String,
    /// Explicit feed URL; bypasses derivation from `site`.
    pub url: Option<String>,
    pub reconnect_delay_secs: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            site: "http://localhost:8080".to_string(),
            url: None,
            reconnect_delay_secs: DEFAULT_RECONNECT_DELAY.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Style asset URL or path; the builtin palette when unset.
    pub url: Option<String>,
    /// Subresource-Integrity metadata for the asset.
    pub integrity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Preferences file; the platform data directory when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub file: PathBuf,
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("metrics-dash.log"),
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub feed: FeedSettings,
    pub chart: ChartSettings,
    pub storage: StorageSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Load defaults, then `path` if given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("failed to read configuration")?;
        config.try_deserialize().context("invalid configuration")
    }

    /// The feed URL: the explicit override, or one derived from the site.
    pub fn feed_url(&self) -> Result<Url, EndpointError> {
        match &self.feed.url {
            Some(url) => Ok(Url::parse(url)?),
            None => endpoint_for_site(&self.feed.site),
        }
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.feed.reconnect_delay_secs)
    }

    /// Chart style source for the expanded view.
    pub fn style_source(&self) -> Result<Arc<dyn StyleSource>, LoadError> {
        match &self.chart.url {
            Some(url) => Ok(Arc::new(AssetStyle::new(url, self.chart.integrity.as_deref())?)),
            None => Ok(Arc::new(BuiltinStyle)),
        }
    }

    /// Where preferences are stored, if anywhere.
    pub fn preferences_path(&self) -> Option<PathBuf> {
        self.storage.path.clone().or_else(crate::prefs::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.feed.site, "http://localhost:8080");
        assert_eq!(settings.reconnect_delay(), Duration::from_secs(5));
        assert_eq!(
            settings.feed_url().unwrap().as_str(),
            "ws://localhost:8080/__metrics__/ws"
        );
        assert_eq!(settings.log.filter, "info");
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let file = config_file(
            ".toml",
            r#"
                [feed]
                site = "https://example.com"
                reconnect_delay_secs = 2

                [chart]
                url = "style.json"
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.reconnect_delay(), Duration::from_secs(2));
        assert_eq!(
            settings.feed_url().unwrap().as_str(),
            "wss://example.com/__metrics__/ws"
        );
        assert_eq!(settings.chart.url.as_deref(), Some("style.json"));
        assert_eq!(settings.log, LogSettings::default());
    }

    #[test]
    fn json_file_is_accepted() {
        let file = config_file(".json", r#"{"feed": {"url": "ws://10.0.0.1:9000/feed"}}"#);
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.feed_url().unwrap().as_str(), "ws://10.0.0.1:9000/feed");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/no/such/metrics-dash.toml"))).is_err());
    }

    #[test]
    fn bad_site_surfaces_endpoint_error() {
        let mut settings = Settings::default();
        settings.feed.site = "ftp://example.com".to_string();
        assert!(matches!(settings.feed_url(), Err(EndpointError::Scheme(_))));
    }

    #[test]
    fn style_source_defaults_to_builtin() {
        let settings = Settings::default();
        assert_eq!(settings.style_source().unwrap().describe(), "builtin");
    }

    #[test]
    fn style_source_rejects_bad_integrity() {
        let mut settings = Settings::default();
        settings.chart.url = Some("style.json".to_string());
        settings.chart.integrity = Some("nope".to_string());
        assert!(settings.style_source().is_err());
    }

    #[test]
    fn explicit_storage_path_wins() {
        let mut settings = Settings::default();
        settings.storage.path = Some(PathBuf::from("/tmp/prefs.json"));
        assert_eq!(
            settings.preferences_path(),
            Some(PathBuf::from("/tmp/prefs.json"))
        );
    }
}
