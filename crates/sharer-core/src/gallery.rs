//! Boundary operations
//!
//! [`Gallery`] is what a transport layer (HTTP handlers, the CLI) calls.
//! It composes the decoder, the store and the ranking engine, and builds
//! the permanent view link for new tools.

use chrono::{DateTime, Utc};

use crate::decode::decode_reference;
use crate::ranking::{SortMode, rank};
use crate::record::{NewTool, ToolRecord};
use crate::store::{JsonFileBackend, StorageBackend, ToolStore};
use crate::{Error, Result};

/// A freshly stored tool and where it can be viewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTool {
    pub id: String,
    pub link: String,
}

/// Gallery operations over a tool store.
#[derive(Debug)]
pub struct Gallery<B = JsonFileBackend> {
    store: ToolStore<B>,
    base_url: String,
}

impl<B: StorageBackend> Gallery<B> {
    /// `base_url` is the public origin used for view links.
    pub fn new(store: ToolStore<B>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { store, base_url }
    }

    pub fn store(&self) -> &ToolStore<B> {
        &self.store
    }

    /// Permanent link for a tool id.
    pub fn view_link(&self, id: &str) -> String {
        format!("{}/view/{}", self.base_url, id)
    }

    /// Decode a share reference and store it as an imported tool.
    pub fn import_from_share(&self, reference: &str) -> Result<CreatedTool> {
        let code = decode_reference(reference)?;
        let id = self.store.create_record(NewTool::imported(code))?;
        Ok(self.created(id))
    }

    /// Publish a tool to the gallery.
    ///
    /// # Errors
    ///
    /// [`Error::MissingField`] if `prompt` or `code` is blank.
    pub fn publish(&self, prompt: &str, code: &str) -> Result<CreatedTool> {
        let id = self
            .store
            .create_record(NewTool::published(prompt, code))?;
        Ok(self.created(id))
    }

    /// The stored markup for a tool.
    pub fn retrieve(&self, id: &str) -> Result<String> {
        self.store
            .get_by_id(id)?
            .map(|record| record.code().to_string())
            .ok_or_else(|| Error::NotFound { id: id.to_string() })
    }

    /// Every stored tool, unordered.
    pub fn list(&self) -> Result<Vec<ToolRecord>> {
        Ok(self.store.load_all()?.to_vec())
    }

    /// Tools matching `search`, ordered by `sort`, scored as of now.
    pub fn gallery(&self, search: &str, sort: SortMode) -> Result<Vec<ToolRecord>> {
        self.gallery_at(search, sort, Utc::now())
    }

    /// Tools matching `search`, ordered by `sort`, scored as of `now`.
    pub fn gallery_at(
        &self,
        search: &str,
        sort: SortMode,
        now: DateTime<Utc>,
    ) -> Result<Vec<ToolRecord>> {
        let records = self.list()?;
        Ok(rank(&records, search, sort, now))
    }

    /// Like a tool, returning its new like count.
    pub fn like(&self, id: &str) -> Result<u64> {
        self.store.increment_like(id)
    }

    fn created(&self, id: String) -> CreatedTool {
        CreatedTool {
            link: self.view_link(&id),
            id,
        }
    }
}
