//! Filesystem module.
//!
//! Provides:
//! - Local filename resolution for discovered links
//! - Path and directory management

pub mod naming;
pub mod paths;

pub use naming::{resolve_filename, sanitize_filename, synthetic_filename};
pub use paths::{download_target, ensure_dir};
