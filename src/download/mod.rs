//! Download module for file retrieval.
//!
//! This module provides:
//! - Download targets and per-file outcomes
//! - Batch report tracking
//! - Single-file HTTP fetching with progress observation
//! - Sequential batch orchestration

pub mod batch;
pub mod fetcher;
pub mod outcome;
pub mod report;

pub use batch::BatchDownloader;
pub use fetcher::{Fetch, HttpFetcher, NoopObserver, TransferObserver};
pub use outcome::{DownloadOutcome, DownloadTarget, FailureReason};
pub use report::{BatchReport, OutcomeRecord};
