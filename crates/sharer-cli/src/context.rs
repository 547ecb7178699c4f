//! Command context
//!
//! Resolves the config and store location from flags, environment and the
//! working directory, and opens the gallery the commands operate on.

use std::path::Path;

use sharer_core::{Gallery, JsonFileBackend, SharerConfig};

use crate::cli::GlobalArgs;
use crate::error::Result;

/// Everything a store-backed command needs.
#[derive(Debug)]
pub struct Context {
    pub config: SharerConfig,
    pub gallery: Gallery<JsonFileBackend>,
}

impl Context {
    /// Build the context for the current directory.
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::resolve(args, &cwd)
    }

    /// Build the context relative to `cwd`.
    pub fn resolve(args: &GlobalArgs, cwd: &Path) -> Result<Self> {
        let mut config = SharerConfig::resolve(args.config.as_deref(), cwd)?;
        if let Some(store) = &args.store {
            config.store.path = cwd.join(store);
        }
        tracing::debug!(store = %config.store.path.display(), "using tool store");

        let gallery = config.open_gallery();
        Ok(Self { config, gallery })
    }
}
