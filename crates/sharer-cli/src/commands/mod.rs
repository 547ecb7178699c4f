//! Command implementations for sharer-cli

pub mod completions;
pub mod gallery;
pub mod share;
pub mod tool;

pub use completions::run_completions;
pub use gallery::run_gallery;
pub use share::{run_encode, run_import};
pub use tool::{run_like, run_publish, run_view};
