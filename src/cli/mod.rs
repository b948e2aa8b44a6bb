//! Command-line interface.

pub mod args;

pub use args::{Args, MatchModeArg, DEFAULT_CONFIG_FILE};
