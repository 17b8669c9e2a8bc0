//! Where chart styles come from.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::{ChartStyle, Integrity, LoadError};

/// A fetchable chart style.
#[async_trait]
pub trait StyleSource: Send + Sync {
    async fn fetch(&self) -> Result<ChartStyle, LoadError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// The default palette, available without any I/O.
#[derive(Debug, Clone, Default)]
pub struct BuiltinStyle;

#[async_trait]
impl StyleSource for BuiltinStyle {
    async fn fetch(&self) -> Result<ChartStyle, LoadError> {
        Ok(ChartStyle::default())
    }

    fn describe(&self) -> String {
        "builtin".to_string()
    }
}

#[derive(Debug, Clone)]
enum Location {
    Remote(reqwest::Url),
    File(PathBuf),
}

/// A JSON style asset at an `http(s)` URL or a local path, optionally pinned
/// by integrity metadata.
#[derive(Debug, Clone)]
pub struct AssetStyle {
    location: Location,
    integrity: Option<Integrity>,
    client: reqwest::Client,
}

impl AssetStyle {
    /// Create a source for `location`.
    ///
    /// Strings starting with `http://` or `https://` are fetched over the
    /// network; anything else is read as a file path.
    pub fn new(location: &str, integrity: Option<&str>) -> Result<Self, LoadError> {
        let location = if location.starts_with("http://") || location.starts_with("https://") {
            let url = reqwest::Url::parse(location)
                .map_err(|e| LoadError::Fetch(format!("{}: {}", location, e)))?;
            Location::Remote(url)
        } else {
            Location::File(PathBuf::from(location))
        };

        let integrity = integrity.map(str::parse).transpose()?;

        Ok(Self {
            location,
            integrity,
            client: reqwest::Client::new(),
        })
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, LoadError> {
        match &self.location {
            Location::Remote(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| LoadError::Fetch(e.to_string()))?;
                let bytes = response.bytes().await.map_err(|e| LoadError::Fetch(e.to_string()))?;
                Ok(bytes.to_vec())
            }
            Location::File(path) => tokio::fs::read(path)
                .await
                .map_err(|e| LoadError::Fetch(format!("{}: {}", path.display(), e))),
        }
    }
}

#[async_trait]
impl StyleSource for AssetStyle {
    async fn fetch(&self) -> Result<ChartStyle, LoadError> {
        let bytes = self.read_bytes().await?;
        debug!(bytes = bytes.len(), "chart style fetched");

        if let Some(integrity) = &self.integrity {
            integrity.verify(&bytes)?;
        }

        serde_json::from_slice(&bytes).map_err(|e| LoadError::Parse(e.to_string()))
    }

    fn describe(&self) -> String {
        match &self.location {
            Location::Remote(url) => url.to_string(),
            Location::File(path) => path.display().to_string(),
        }
    }
}
