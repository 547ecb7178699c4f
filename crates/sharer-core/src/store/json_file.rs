//! JSON document backend

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use sharer_fs::{FileLock, RobustnessConfig, io};

use super::{ExclusiveSection, LoadOutcome, StorageBackend};
use crate::collection::Collection;
use crate::{Error, Result};

/// Stores the collection as one pretty-printed JSON object on disk.
///
/// Writers are excluded with an advisory lock on a sibling `.lock` file.
/// After a corrupt document has been loaded, the next save first moves it
/// aside to `<file>.corrupt-<timestamp>` instead of overwriting it.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    lock_path: PathBuf,
    robustness: RobustnessConfig,
    corrupt_pending: AtomicBool,
}

impl JsonFileBackend {
    pub fn new(path: &Path, robustness: RobustnessConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            lock_path: io::lock_path_for(path),
            robustness,
            corrupt_pending: AtomicBool::new(false),
        }
    }

    /// Move the document aside if the last load found it corrupt and it
    /// still is. Another writer may have replaced it since.
    fn preserve_corrupt_document(&self) -> Result<()> {
        if !self.corrupt_pending.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        match std::fs::read(&self.path) {
            Ok(bytes) if !is_corrupt(&bytes) => {
                tracing::debug!(
                    path = %self.path.display(),
                    "document was repaired, not moving it"
                );
                return Ok(());
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(sharer_fs::Error::io(&self.path, e).into()),
        }
        let suffix = format!("corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.3fZ"));
        io::move_aside(&self.path, &suffix)?;
        Ok(())
    }
}

fn is_corrupt(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(content) => matches!(Collection::from_json(content), Err(Error::Corruption { .. })),
        Err(_) => true,
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&self) -> Result<LoadOutcome> {
        let content = match io::read_optional(&self.path) {
            Ok(Some(content)) => content,
            Ok(None) => {
                self.corrupt_pending.store(false, Ordering::SeqCst);
                tracing::debug!(path = %self.path.display(), "no tool collection yet");
                return Ok(LoadOutcome::default());
            }
            Err(sharer_fs::Error::Io { source, .. }) if source.kind() == ErrorKind::InvalidData => {
                self.corrupt_pending.store(true, Ordering::SeqCst);
                return Ok(LoadOutcome::corrupt(source.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        match Collection::from_json(&content) {
            Ok(collection) => {
                self.corrupt_pending.store(false, Ordering::SeqCst);
                Ok(LoadOutcome::clean(collection))
            }
            Err(Error::Corruption { reason }) => {
                self.corrupt_pending.store(true, Ordering::SeqCst);
                Ok(LoadOutcome::corrupt(reason))
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, collection: &Collection) -> Result<()> {
        let content = collection.to_json_pretty()?;
        self.preserve_corrupt_document()?;
        io::write_atomic(&self.path, content.as_bytes(), self.robustness)?;
        tracing::debug!(
            path = %self.path.display(),
            tools = collection.len(),
            "saved tool collection"
        );
        Ok(())
    }

    fn exclusive(&self) -> Result<ExclusiveSection> {
        let lock = FileLock::exclusive(&self.lock_path, self.robustness.lock_timeout)?;
        Ok(ExclusiveSection::file(lock))
    }
}
