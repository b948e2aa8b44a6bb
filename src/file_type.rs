//! Target file type (the extension being searched for).

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A normalized, lowercase file extension token such as `pdf`.
///
/// Used both to filter links and as the extension of synthesized filenames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileType(String);

impl FileType {
    /// Normalize and validate an extension token.
    ///
    /// Surrounding whitespace and a single leading dot are stripped and the
    /// result is lowercased, so `" .PDF"` becomes `pdf`.
    pub fn new(raw: &str) -> Result<Self> {
        let normalized = raw.trim();
        let normalized = normalized.strip_prefix('.').unwrap_or(normalized);
        let normalized = normalized.to_lowercase();

        if normalized.is_empty() {
            return Err(Error::MissingConfig("file_type".to_string()));
        }

        let pattern = Regex::new(r"^[a-z0-9]+(?:[._-][a-z0-9]+)*$").unwrap();
        if !pattern.is_match(&normalized) {
            return Err(Error::ConfigValidation {
                field: "file_type".to_string(),
                message: format!(
                    "'{}' is not a valid file extension. Use letters and digits, e.g. pdf or docx.",
                    raw
                ),
            });
        }

        Ok(Self(normalized))
    }

    /// The bare extension, e.g. `pdf`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The extension with its leading dot, e.g. `.pdf`.
    pub fn dotted(&self) -> String {
        format!(".{}", self.0)
    }

    /// Uppercase label used in console output, e.g. `PDF`.
    pub fn label(&self) -> String {
        self.0.to_uppercase()
    }
}

impl Default for FileType {
    fn default() -> Self {
        Self("pdf".to_string())
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FileType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for FileType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<FileType> for String {
    fn from(value: FileType) -> Self {
        value.0
    }
}
