//! Core of Tool Sharer
//!
//! This crate owns everything with invariants in the system:
//!
//! - **Records**: published and imported tools, the two shapes a stored tool takes
//! - **Store**: the single source of truth for the tool collection, with
//!   serialized read-modify-write mutations over a pluggable backend
//! - **Decoder**: turns a share reference (`...#<base64>`) into tool content
//! - **Ranking**: filters and orders a snapshot for the gallery
//!   (newest, most-liked, trending)
//! - **Gallery**: the boundary operations (import, publish, view, list, like)
//!
//! # Architecture
//!
//! ```text
//!                 CLI / HTTP layer
//!                        |
//!                     Gallery
//!                 /      |       \
//!           Decoder    Store    Ranking
//!                        |
//!                StorageBackend (JSON file / memory)
//!                        |
//!                    sharer-fs
//! ```
//!
//! # Example
//!
//! ```
//! use sharer_core::{Gallery, SortMode, ToolStore};
//!
//! let gallery = Gallery::new(ToolStore::in_memory(), "http://localhost:3000");
//! let created = gallery.publish("A photo of a cat", "<h1>meow</h1>").unwrap();
//! gallery.like(&created.id).unwrap();
//!
//! let ranked = gallery.gallery("cat", SortMode::MostLiked).unwrap();
//! assert_eq!(ranked[0].likes(), 1);
//! ```

pub mod collection;
pub mod config;
pub mod decode;
pub mod error;
pub mod gallery;
pub mod id;
pub mod ranking;
pub mod record;
pub mod store;

pub use collection::Collection;
pub use config::SharerConfig;
pub use decode::{decode_reference, encode_reference};
pub use error::{Error, Result};
pub use gallery::{CreatedTool, Gallery};
pub use id::IdGenerator;
pub use ranking::{SortMode, rank, summary, trending_score};
pub use record::{ImportedTool, NewTool, PublishedTool, RecordKind, ToolRecord};
pub use store::{
    ExclusiveSection, JsonFileBackend, LoadOutcome, MemoryBackend, StorageBackend, ToolStore,
};

pub use sharer_fs::RobustnessConfig;
