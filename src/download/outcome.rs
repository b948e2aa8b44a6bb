//! Per-file download targets and outcomes.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// A discovered link paired with the local file it is saved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub filename: String,
    pub path: PathBuf,
}

/// Why a single download failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The server answered with a non-success status code.
    Status(u16),
    /// Connection, timeout or disk error.
    Transfer(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Status(code) => write!(f, "{}", code),
            FailureReason::Transfer(message) => f.write_str(message),
        }
    }
}

/// Result of one fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// The file was already present; nothing was transferred.
    Skipped,
    /// The file was transferred and saved.
    Succeeded { bytes: u64 },
    /// The transfer failed; no file was left behind.
    Failed { reason: FailureReason },
}

impl DownloadOutcome {
    pub fn failed(reason: FailureReason) -> Self {
        DownloadOutcome::Failed { reason }
    }

    /// Skipped files count as successes: the desired end state is reached.
    pub fn is_success(&self) -> bool {
        !matches!(self, DownloadOutcome::Failed { .. })
    }

    /// Whether this attempt talked to the server.
    pub fn contacted_server(&self) -> bool {
        !matches!(self, DownloadOutcome::Skipped)
    }
}
