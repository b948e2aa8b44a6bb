//! HTML module.
//!
//! Provides:
//! - A typed document abstraction over the HTML parser
//! - File link matching, resolution and deduplication

pub mod document;
pub mod links;

pub use document::{HtmlDocument, ParsedHtml};
pub use links::{extract_links, extract_links_from, resolve_link, LinkMatcher, LinkSet};
