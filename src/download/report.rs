//! Batch outcome tracking.

use serde::Serialize;

use crate::download::outcome::{DownloadOutcome, DownloadTarget, FailureReason};

/// Outcome of one link, as recorded in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub url: String,
    pub filename: String,
    pub outcome: DownloadOutcome,
}

/// Aggregate result of a batch run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BatchReport {
    /// Files present after the run, including skipped ones.
    pub succeeded: u64,
    /// Files that were already present (a subset of `succeeded`).
    pub skipped: u64,
    pub failed: u64,
    /// The run was cancelled before all links were attempted.
    pub cancelled: bool,
    /// Outcomes in the order the links were processed.
    pub outcomes: Vec<OutcomeRecord>,
}

impl BatchReport {
    /// Fold one outcome into the report.
    pub fn record(&mut self, target: &DownloadTarget, outcome: DownloadOutcome) {
        match &outcome {
            DownloadOutcome::Skipped => {
                self.succeeded += 1;
                self.skipped += 1;
            }
            DownloadOutcome::Succeeded { .. } => self.succeeded += 1,
            DownloadOutcome::Failed { .. } => self.failed += 1,
        }

        self.outcomes.push(OutcomeRecord {
            url: target.url.clone(),
            filename: target.filename.clone(),
            outcome,
        });
    }

    /// Mark the run as cancelled.
    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    /// Number of links attempted.
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// Number of files actually transferred in this run.
    pub fn downloaded(&self) -> u64 {
        self.succeeded - self.skipped
    }

    /// Failed links with their reasons.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FailureReason)> {
        self.outcomes.iter().filter_map(|record| match &record.outcome {
            DownloadOutcome::Failed { reason } => Some((record.url.as_str(), reason)),
            _ => None,
        })
    }
}
