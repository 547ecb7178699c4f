//! Tool records
//!
//! A stored tool takes one of two shapes. Tools published to the gallery
//! carry a prompt and a like counter; tools imported from a share link
//! carry only their markup. The shape is recorded explicitly with a
//! `kind` tag in the persisted document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tool published to the gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedTool {
    /// Store key and public URL segment
    pub id: String,
    /// Free text describing what the tool was made for
    pub prompt: String,
    /// Raw HTML, served verbatim
    pub code: String,
    /// Like counter, never decreases
    pub likes: u64,
    /// When the tool was published
    pub created_at: DateTime<Utc>,
}

/// A tool imported from a share link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedTool {
    /// Store key and public URL segment
    pub id: String,
    /// Raw HTML decoded from the share reference
    pub code: String,
    /// When the tool was imported; absent for legacy entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A stored tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ToolRecord {
    Published(PublishedTool),
    Imported(ImportedTool),
}

/// Discriminant of [`ToolRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Published,
    Imported,
}

impl ToolRecord {
    pub fn id(&self) -> &str {
        match self {
            Self::Published(t) => &t.id,
            Self::Imported(t) => &t.id,
        }
    }

    /// The prompt, if this is a published tool.
    pub fn prompt(&self) -> Option<&str> {
        match self {
            Self::Published(t) => Some(&t.prompt),
            Self::Imported(_) => None,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Published(t) => &t.code,
            Self::Imported(t) => &t.code,
        }
    }

    /// Like count. Imported tools have no counter and report zero.
    pub fn likes(&self) -> u64 {
        match self {
            Self::Published(t) => t.likes,
            Self::Imported(_) => 0,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Published(t) => Some(t.created_at),
            Self::Imported(t) => t.created_at,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Published(_) => RecordKind::Published,
            Self::Imported(_) => RecordKind::Imported,
        }
    }
}

/// Fields supplied when creating a tool. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewTool {
    Published { prompt: String, code: String },
    Imported { code: String },
}

impl NewTool {
    pub fn published(prompt: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Published {
            prompt: prompt.into(),
            code: code.into(),
        }
    }

    pub fn imported(code: impl Into<String>) -> Self {
        Self::Imported { code: code.into() }
    }

    /// Reject blank required fields.
    pub(crate) fn validate(&self) -> crate::Result<()> {
        if let Self::Published { prompt, code } = self {
            if prompt.trim().is_empty() {
                return Err(crate::Error::MissingField { field: "prompt" });
            }
            if code.trim().is_empty() {
                return Err(crate::Error::MissingField { field: "code" });
            }
        }
        Ok(())
    }

    /// Build the stored record.
    pub(crate) fn into_record(self, id: String, now: DateTime<Utc>) -> ToolRecord {
        match self {
            Self::Published { prompt, code } => ToolRecord::Published(PublishedTool {
                id,
                prompt,
                code,
                likes: 0,
                created_at: now,
            }),
            Self::Imported { code } => ToolRecord::Imported(ImportedTool {
                id,
                code,
                created_at: Some(now),
            }),
        }
    }
}
