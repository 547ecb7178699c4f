//! The tool store
//!
//! [`ToolStore`] is the single owner of the tool collection. Every read loads
//! the whole collection from its [`StorageBackend`]; every mutation is a
//! load, mutate, save cycle that writes the whole collection back.
//!
//! # Mutation policy
//!
//! Overlapping load/save cycles lose updates: both load the same snapshot
//! and the second save overwrites the first. Mutations on a `ToolStore` are
//! therefore serialized. Each one runs while holding the store's mutex and
//! the backend's exclusive section (a file lock for [`JsonFileBackend`]),
//! so concurrent `create_record` and `increment_like` calls, from threads or
//! from other processes sharing the file, apply one after another.
//!
//! [`ToolStore::load_all`] and [`ToolStore::save_all`] are the raw,
//! unsynchronized primitives. Composing them by hand reintroduces the lost
//! update.

mod json_file;
mod memory;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use sharer_fs::{FileLock, RobustnessConfig};

use crate::collection::Collection;
use crate::id::IdGenerator;
use crate::record::{NewTool, ToolRecord};
use crate::{Error, Result};

/// Result of loading the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOutcome {
    /// The loaded collection; empty if nothing was persisted or it was corrupt
    pub collection: Collection,
    /// Why the persisted document was discarded, if it was
    pub corruption: Option<String>,
}

impl LoadOutcome {
    pub fn clean(collection: Collection) -> Self {
        Self {
            collection,
            corruption: None,
        }
    }

    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self {
            collection: Collection::new(),
            corruption: Some(reason.into()),
        }
    }
}

/// Held for the duration of a mutation.
///
/// Dropping it ends the exclusive section.
#[derive(Debug, Default)]
pub struct ExclusiveSection {
    _lock: Option<FileLock>,
}

impl ExclusiveSection {
    /// A section with nothing to hold beyond the store's own mutex.
    pub fn in_process() -> Self {
        Self { _lock: None }
    }

    /// A section backed by a file lock.
    pub fn file(lock: FileLock) -> Self {
        Self { _lock: Some(lock) }
    }
}

/// Persistence for a whole collection.
///
/// Implementations replace the stored collection wholesale on `save` and
/// must make that replacement atomic for a subsequent `load`.
pub trait StorageBackend: Send + Sync {
    /// Load the full collection.
    ///
    /// A missing document is an empty collection. An unreadable one is
    /// reported through [`LoadOutcome::corruption`], not as an error.
    fn load(&self) -> Result<LoadOutcome>;

    /// Replace the stored collection.
    fn save(&self, collection: &Collection) -> Result<()>;

    /// Enter the section that excludes other writers of the same storage.
    fn exclusive(&self) -> Result<ExclusiveSection>;
}

/// Store of tool records over a storage backend.
#[derive(Debug)]
pub struct ToolStore<B = JsonFileBackend> {
    backend: B,
    ids: IdGenerator,
    write_lock: Mutex<()>,
}

impl ToolStore<JsonFileBackend> {
    /// Open a store backed by the JSON document at `path`.
    ///
    /// Nothing is read or created until the first operation.
    pub fn open(path: impl AsRef<Path>, robustness: RobustnessConfig) -> Self {
        Self::new(JsonFileBackend::new(path.as_ref(), robustness))
    }
}

impl ToolStore<MemoryBackend> {
    /// A store that keeps its collection in memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl<B: StorageBackend> ToolStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            ids: IdGenerator::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Load the full collection.
    ///
    /// Corruption is logged and yields an empty collection.
    pub fn load_all(&self) -> Result<Collection> {
        Ok(self.load_outcome()?.collection)
    }

    /// Load the full collection, reporting whether corruption was recovered from.
    pub fn load_outcome(&self) -> Result<LoadOutcome> {
        let outcome = self.backend.load()?;
        if let Some(reason) = &outcome.corruption {
            tracing::warn!(
                %reason,
                "tool collection is corrupt or unreadable; continuing with an empty collection"
            );
        }
        Ok(outcome)
    }

    /// Replace the stored collection. Not synchronized with mutations.
    pub fn save_all(&self, collection: &Collection) -> Result<()> {
        self.backend.save(collection)
    }

    /// Create a tool and return its id.
    ///
    /// # Errors
    ///
    /// [`Error::MissingField`] if a published tool has a blank prompt or code.
    pub fn create_record(&self, fields: NewTool) -> Result<String> {
        fields.validate()?;

        self.mutate(|collection| {
            let mut id = self.ids.next_id();
            while collection.contains_id(&id) {
                tracing::debug!(%id, "generated id already taken, drawing another");
                id = self.ids.next_id();
            }

            let record = fields.into_record(id.clone(), Utc::now());
            collection.insert(record);
            tracing::info!(%id, "created tool");
            Ok(id)
        })
    }

    /// Add one like and return the new count.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, [`Error::NotLikeable`] for
    /// an imported tool and [`Error::InvalidRecord`] when the counter cannot
    /// grow further. Nothing is written in any of these cases.
    pub fn increment_like(&self, id: &str) -> Result<u64> {
        self.mutate(|collection| match collection.get_mut(id) {
            Some(ToolRecord::Published(tool)) => {
                tool.likes = tool.likes.checked_add(1).ok_or_else(|| Error::InvalidRecord {
                    id: id.to_string(),
                    reason: "like counter is at its maximum".to_string(),
                })?;
                tracing::debug!(%id, likes = tool.likes, "liked tool");
                Ok(tool.likes)
            }
            Some(ToolRecord::Imported(_)) => Err(Error::NotLikeable { id: id.to_string() }),
            None => Err(Error::NotFound { id: id.to_string() }),
        })
    }

    /// Look up one tool.
    pub fn get_by_id(&self, id: &str) -> Result<Option<ToolRecord>> {
        Ok(self.load_all()?.get(id).cloned())
    }

    /// Run a load, mutate, save cycle inside the exclusive section.
    ///
    /// If `apply` fails nothing is written.
    fn mutate<T>(&self, apply: impl FnOnce(&mut Collection) -> Result<T>) -> Result<T> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let _section = self.backend.exclusive()?;

        let mut collection = self.load_all()?;
        let value = apply(&mut collection)?;
        self.backend.save(&collection)?;
        Ok(value)
    }
}
