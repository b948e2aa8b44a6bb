//! Source module: obtains the HTML to scan for links.

pub mod loader;

pub use loader::{load_source, LoadedPage, Source};
