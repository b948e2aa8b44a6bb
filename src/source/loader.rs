//! Loading HTML from a local file or a remote page.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::error::{Error, Result};
use crate::html::{HtmlDocument, ParsedHtml};
use crate::http::HttpClient;

/// Where the HTML comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A saved HTML file on disk.
    File(PathBuf),
    /// A web page fetched over HTTP.
    Url(String),
}

impl Source {
    /// Short description used in console output ("HTML file", "webpage").
    pub fn kind(&self) -> &'static str {
        match self {
            Source::File(_) => "HTML file",
            Source::Url(_) => "webpage",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

/// Raw HTML plus the URL its relative links resolve against.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub html: String,
    pub base_url: Option<String>,
}

/// Value of the first `<base href>` in the document.
fn explicit_base(html: &str) -> Option<String> {
    let document = ParsedHtml::parse(html);
    document
        .first_attribute_value("base", "href")
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
}

/// Load the HTML for `source`.
///
/// Any failure is reported as [`Error::SourceUnavailable`]; nothing is retried.
pub async fn load_source(client: &HttpClient, source: &Source) -> Result<LoadedPage> {
    match source {
        Source::File(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| Error::SourceUnavailable {
                    location: path.display().to_string(),
                    reason: e.to_string(),
                })?;

            let html = String::from_utf8_lossy(&bytes).into_owned();
            let base_url = explicit_base(&html);

            Ok(LoadedPage { html, base_url })
        }
        Source::Url(url) => {
            let (html, final_url) =
                client
                    .get_page(url)
                    .await
                    .map_err(|e| Error::SourceUnavailable {
                        location: url.clone(),
                        reason: e.to_string(),
                    })?;

            // An explicit <base href> wins; it may itself be relative to the page.
            let base_url = match explicit_base(&html) {
                Some(base) => Url::parse(&final_url)
                    .and_then(|page| page.join(&base))
                    .map(|joined| joined.to_string())
                    .unwrap_or(final_url),
                None => final_url,
            };

            Ok(LoadedPage {
                html,
                base_url: Some(base_url),
            })
        }
    }
}
