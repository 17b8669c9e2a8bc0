//! Persisted user preferences.
//!
//! A small string key-value store kept as a JSON object on disk. The only
//! key the dashboard writes is [`EXPANDED_KEY`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

/// Key remembering whether the expanded view was open.
pub const EXPANDED_KEY: &str = "metricsExpanded";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to write preferences to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Default location: `<data-local-dir>/metrics-dash/storage.json`.
pub fn default_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("metrics-dash").join("storage.json"))
}

/// String key-value preferences backed by an optional file.
///
/// Without a path the store lives in memory only.
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl Preferences {
    /// In-memory store that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file gives an empty store; an unreadable
    /// or corrupt one is logged and also gives an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring corrupt preferences file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read preferences file");
                BTreeMap::new()
            }
        };
        Self {
            path: Some(path),
            values,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Store a value and write the file.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    /// Whether the expanded view was left open.
    pub fn expanded(&self) -> bool {
        self.get(EXPANDED_KEY) == Some("true")
    }

    pub fn set_expanded(&mut self, expanded: bool) -> Result<(), PrefsError> {
        self.set(EXPANDED_KEY, if expanded { "true" } else { "false" })
    }

    fn save(&self) -> Result<(), PrefsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.values)?;

        let write = |path: &Path| -> io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json.as_bytes())
        };
        write(path).map_err(|source| PrefsError::Write {
            path: path.clone(),
            source,
        })
    }
}
