//! File Downloader - find and download linked files from HTML pages.
//!
//! Given a local HTML file or a web page, this library finds the links that
//! point to files of one type (pdf, pse, docx, ...), deduplicates them and
//! downloads each into a folder.
//!
//! # Features
//!
//! - Link discovery with relative URL resolution (honors `<base href>`)
//! - Skip-if-present resume: re-running a batch only fetches missing files
//! - Streaming downloads with progress, no partial files left on failure
//! - Per-file failure isolation with an aggregate report
//! - Cancellation between downloads
//!
//! # Example
//!
//! ```no_run
//! use file_downloader::{BatchDownloader, Config, FileType, Source};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.options.download_directory = "biology_pdfs".into();
//!     config.options.file_type = FileType::new("pdf")?;
//!
//!     let downloader = BatchDownloader::new(&config)?;
//!     let report = downloader
//!         .download_from_source(&Source::File("Biology Resources.html".into()))
//!         .await?;
//!
//!     println!("{} succeeded, {} failed", report.succeeded, report.failed);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod file_type;
pub mod fs;
pub mod html;
pub mod http;
pub mod output;
pub mod source;

// Re-exports for convenience
pub use config::{Config, MatchMode};
pub use download::{BatchDownloader, BatchReport, DownloadOutcome, DownloadTarget, FailureReason};
pub use error::{Error, Result};
pub use file_type::FileType;
pub use html::{extract_links, LinkMatcher, LinkSet};
pub use source::Source;
