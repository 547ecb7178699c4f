//! In-memory backend

use std::sync::{Mutex, PoisonError};

use super::{ExclusiveSection, LoadOutcome, StorageBackend};
use crate::Result;
use crate::collection::Collection;

/// Keeps the collection in process memory. Loads hand out copies.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collection: Mutex<Option<Collection>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing collection.
    pub fn with_collection(collection: Collection) -> Self {
        Self {
            collection: Mutex::new(Some(collection)),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> Result<LoadOutcome> {
        let stored = self
            .collection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(LoadOutcome::clean(stored.clone().unwrap_or_default()))
    }

    fn save(&self, collection: &Collection) -> Result<()> {
        *self
            .collection
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(collection.clone());
        Ok(())
    }

    fn exclusive(&self) -> Result<ExclusiveSection> {
        Ok(ExclusiveSection::in_process())
    }
}
