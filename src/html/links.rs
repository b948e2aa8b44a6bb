//! Discovery of file links in HTML.

use std::collections::BTreeSet;

use regex::Regex;
use url::Url;

use crate::config::MatchMode;
use crate::file_type::FileType;
use crate::html::document::{HtmlDocument, ParsedHtml};

/// Deduplicated set of discovered links.
///
/// Iteration order is sorted, which keeps it stable for a given set of links
/// regardless of where the anchors appeared in the document.
pub type LinkSet = BTreeSet<String>;

/// Decides whether an anchor target points to a file of the target type.
#[derive(Debug, Clone)]
pub struct LinkMatcher {
    dotted: String,
    mode: MatchMode,
    patterns: Regex,
    strict: Regex,
}

impl LinkMatcher {
    pub fn new(file_type: &FileType, mode: MatchMode) -> Self {
        let ext = regex::escape(file_type.as_str());

        let patterns = Regex::new(&format!(
            r"(?i)\.{ext}$|\.{ext}\?|\.{ext}#|/{ext}/|/download.*\.{ext}",
            ext = ext
        ))
        .unwrap();
        let strict = Regex::new(&format!(r"(?i)\.{ext}(?:$|[?#])|/{ext}/", ext = ext)).unwrap();

        Self {
            dotted: file_type.dotted(),
            mode,
            patterns,
            strict,
        }
    }

    /// Check whether `href` looks like a link to a file of the target type.
    pub fn is_match(&self, href: &str) -> bool {
        match self.mode {
            MatchMode::Loose => {
                let lower = href.to_lowercase();

                // Direct file links
                if lower.ends_with(&self.dotted) {
                    return true;
                }

                // Query-string suffixed links and anything else carrying the extension
                if lower.contains(&self.dotted) {
                    return true;
                }

                self.patterns.is_match(&lower)
            }
            MatchMode::Strict => self.strict.is_match(href),
        }
    }
}

/// Whether `href` already carries an http(s) scheme.
fn has_http_scheme(href: &str) -> bool {
    let lower = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolve `href` against `base` unless it is already an http(s) URL.
///
/// When the join fails the original `href` is kept.
pub fn resolve_link(href: &str, base: Option<&Url>) -> String {
    if has_http_scheme(href) {
        return href.to_string();
    }

    match base {
        Some(base) => match base.join(href) {
            Ok(resolved) => resolved.to_string(),
            Err(e) => {
                tracing::debug!("Could not resolve '{}' against {}: {}", href, base, e);
                href.to_string()
            }
        },
        None => href.to_string(),
    }
}

/// Extract matching anchor targets from a parsed document.
pub fn extract_links_from(
    document: &dyn HtmlDocument,
    base_url: Option<&str>,
    matcher: &LinkMatcher,
) -> LinkSet {
    let base = base_url.and_then(|base| match Url::parse(base) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!("Ignoring unusable base URL '{}': {}", base, e);
            None
        }
    });

    document
        .attribute_values("a", "href")
        .iter()
        .map(|href| href.trim())
        .filter(|href| !href.is_empty() && matcher.is_match(href))
        .map(|href| resolve_link(href, base.as_ref()))
        .collect()
}

/// Parse `html` and extract matching anchor targets.
pub fn extract_links(html: &str, base_url: Option<&str>, matcher: &LinkMatcher) -> LinkSet {
    let document = ParsedHtml::parse(html);
    extract_links_from(&document, base_url, matcher)
}
