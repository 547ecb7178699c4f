//! Configuration parsing for sharer.toml
//!
//! Every section and key is optional:
//!
//! ```toml
//! [store]
//! path = "tools.json"
//! lock_timeout_ms = 5000
//! fsync = true
//!
//! [server]
//! base_url = "http://localhost:3000"
//!
//! [gallery]
//! default_sort = "newest"
//! summary_len = 50
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sharer_fs::RobustnessConfig;

use crate::gallery::Gallery;
use crate::ranking::SortMode;
use crate::store::{JsonFileBackend, ToolStore};
use crate::{Error, Result};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "sharer.toml";

fn default_store_path() -> PathBuf {
    PathBuf::from("tools.json")
}

fn default_lock_timeout_ms() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_summary_len() -> usize {
    50
}

/// [store] section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSection {
    /// Location of the JSON document
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// How long a mutation waits for the store lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
    /// Whether saves are fsynced before being renamed into place
    #[serde(default = "default_true")]
    pub fsync: bool,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            lock_timeout_ms: default_lock_timeout_ms(),
            fsync: true,
        }
    }
}

/// [server] section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    /// Public origin used to build view links
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// [gallery] section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GallerySection {
    #[serde(default)]
    pub default_sort: SortMode,
    /// Characters of the prompt shown before truncation
    #[serde(default = "default_summary_len")]
    pub summary_len: usize,
}

impl Default for GallerySection {
    fn default() -> Self {
        Self {
            default_sort: SortMode::default(),
            summary_len: default_summary_len(),
        }
    }
}

/// Parsed sharer.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharerConfig {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub gallery: GallerySection,
}

impl SharerConfig {
    /// Parse config from TOML content. Paths are left as written.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a config file.
    ///
    /// A relative `store.path` is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut config = Self::parse(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if config.store.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.store.path = dir.join(&config.store.path);
            }
        }
        tracing::debug!(
            config = %path.display(),
            store = %config.store.path.display(),
            "loaded config"
        );
        Ok(config)
    }

    /// Pick the config to use.
    ///
    /// An explicit path must exist. Otherwise `sharer.toml` in `cwd` is used
    /// if present, falling back to defaults with the store in `cwd`.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let local = cwd.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return Self::load(&local);
        }

        tracing::debug!(cwd = %cwd.display(), "no config file, using defaults");
        let mut config = Self::default();
        config.store.path = cwd.join(&config.store.path);
        Ok(config)
    }

    /// Write-path settings for the store.
    pub fn robustness(&self) -> RobustnessConfig {
        RobustnessConfig {
            lock_timeout: Duration::from_millis(self.store.lock_timeout_ms),
            enable_fsync: self.store.fsync,
        }
    }

    /// Open the configured store.
    pub fn open_store(&self) -> ToolStore<JsonFileBackend> {
        ToolStore::open(&self.store.path, self.robustness())
    }

    /// Open the configured gallery.
    pub fn open_gallery(&self) -> Gallery<JsonFileBackend> {
        Gallery::new(self.open_store(), self.server.base_url.clone())
    }
}
