//! Configuration module for the file-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Link matching modes
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{Config, HttpConfig, OptionsConfig};
pub use modes::MatchMode;
pub use validation::{validate_config, validate_page_url};
