//! Filename generation and manipulation.

use md5::{Digest, Md5};
use url::Url;

use crate::error::{Error, Result};
use crate::file_type::FileType;

/// Number of distinct synthetic filenames per file type.
const SYNTHETIC_NAME_SPACE: u32 = 10_000;

/// Validate and sanitize a filename by removing or replacing invalid characters.
///
/// Returns an error if the filename contains path traversal patterns.
pub fn sanitize_filename(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

/// Last path segment of a URL, ignoring query and fragment.
///
/// Relative references that `url` cannot parse are split by hand.
fn last_path_segment(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("")
            .to_string(),
        Err(_) => {
            let path = url.split(['?', '#']).next().unwrap_or("");
            path.rsplit('/').next().unwrap_or("").to_string()
        }
    }
}

/// Deterministic synthetic filename for a URL: `document_{n}.{ext}`.
///
/// `n` is the first four bytes of the MD5 digest of the URL, read big-endian,
/// modulo 10000. The same URL maps to the same name in every process.
pub fn synthetic_filename(url: &str, file_type: &FileType) -> String {
    let digest = Md5::digest(url.as_bytes());
    let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    format!(
        "document_{}.{}",
        prefix % SYNTHETIC_NAME_SPACE,
        file_type.as_str()
    )
}

/// Whether a URL path segment can be used verbatim as a file name.
///
/// Only names that would escape or alias the download directory are refused.
fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}

/// Derive the local filename for a URL.
///
/// The final path segment is used unchanged when it ends with `.{ext}`;
/// otherwise a synthetic name is generated.
pub fn resolve_filename(url: &str, file_type: &FileType) -> String {
    let segment = last_path_segment(url);

    // Case-insensitive on purpose: `REPORT.PDF` keeps its own name.
    if segment.to_lowercase().ends_with(&file_type.dotted()) {
        if is_safe_segment(&segment) {
            return segment;
        }
        tracing::debug!("Unusable filename in {}: {:?}", url, segment);
    }

    synthetic_filename(url, file_type)
}
