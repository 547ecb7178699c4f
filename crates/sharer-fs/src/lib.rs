//! Filesystem layer for Tool Sharer
//!
//! Provides the durable primitives the tool store is built on:
//! whole-file atomic replacement, advisory locks with bounded waits,
//! and moving unreadable files aside.

pub mod error;
pub mod io;
pub mod lock;

pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use lock::FileLock;
