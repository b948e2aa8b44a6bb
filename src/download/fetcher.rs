//! Single-file downloading.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Response;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

use crate::download::outcome::{DownloadOutcome, DownloadTarget, FailureReason};
use crate::error::{Error, Result};
use crate::http::HttpClient;

/// Suffix of the in-flight file next to the destination.
const PART_SUFFIX: &str = ".part";

/// Largest slice written to disk between progress updates.
const WRITE_CHUNK_SIZE: usize = 8 * 1024;

/// Something that can retrieve one download target.
///
/// Failures are reported through the returned outcome, never as errors.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, target: &DownloadTarget) -> DownloadOutcome;
}

/// Receives byte progress for the transfer in flight.
pub trait TransferObserver: Send + Sync {
    /// A transfer started. `total` is the announced content length, if any.
    fn started(&self, label: &str, total: Option<u64>);

    /// Bytes written so far; never decreases within one transfer.
    fn advanced(&self, downloaded: u64);

    /// The transfer ended, successfully or not.
    fn finished(&self);
}

/// Observer that ignores all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TransferObserver for NoopObserver {
    fn started(&self, _label: &str, _total: Option<u64>) {}
    fn advanced(&self, _downloaded: u64) {}
    fn finished(&self) {}
}

/// Downloads files over HTTP, streaming them to disk.
pub struct HttpFetcher {
    client: HttpClient,
    resume: bool,
    observer: Arc<dyn TransferObserver>,
}

impl HttpFetcher {
    pub fn new(client: HttpClient, resume: bool) -> Self {
        Self {
            client,
            resume,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Report byte progress to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn TransferObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Transfer the body into `part_path`, then move it onto the destination.
    async fn transfer(&self, target: &DownloadTarget, part_path: &Path) -> Result<u64> {
        let read_timeout = self.client.read_timeout();

        let response = timeout(read_timeout, self.client.download_file(&target.url))
            .await
            .map_err(|_| {
                Error::Transfer(format!(
                    "no response within {} seconds",
                    read_timeout.as_secs()
                ))
            })??;

        self.observer
            .started(&target.filename, response.content_length());
        let written = self.write_body(response, part_path).await;
        self.observer.finished();

        let bytes = written?;
        tokio::fs::rename(part_path, &target.path).await?;

        Ok(bytes)
    }

    /// Stream the response body to `path`, returning the number of bytes written.
    async fn write_body(&self, response: Response, path: &Path) -> Result<u64> {
        let read_timeout = self.client.read_timeout();
        let mut file = File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        loop {
            let next = timeout(read_timeout, stream.next()).await.map_err(|_| {
                Error::Transfer(format!(
                    "no data received for {} seconds",
                    read_timeout.as_secs()
                ))
            })?;

            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk.map_err(|e| Error::Transfer(format!("Stream error: {}", e)))?;

            for piece in chunk.chunks(WRITE_CHUNK_SIZE) {
                file.write_all(piece).await?;
                downloaded += piece.len() as u64;
                self.observer.advanced(downloaded);
            }
        }

        file.flush().await?;
        file.sync_all().await?;

        Ok(downloaded)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, target: &DownloadTarget) -> DownloadOutcome {
        if self.resume && target.path.exists() {
            tracing::info!("File {} already exists, skipping", target.filename);
            return DownloadOutcome::Skipped;
        }

        tracing::info!("Downloading: {}", target.url);

        let part_path = part_path(&target.path);
        match self.transfer(target, &part_path).await {
            Ok(bytes) => {
                tracing::info!("Downloaded: {} ({} bytes)", target.filename, bytes);
                DownloadOutcome::Succeeded { bytes }
            }
            Err(e) => {
                if part_path.exists() {
                    if let Err(remove_err) = tokio::fs::remove_file(&part_path).await {
                        tracing::warn!(
                            "Could not remove partial file {}: {}",
                            part_path.display(),
                            remove_err
                        );
                    }
                }

                tracing::warn!("Error downloading {}: {}", target.url, e);
                DownloadOutcome::failed(failure_reason(e))
            }
        }
    }
}

/// Path of the in-flight file for `path`: `report.pdf` -> `report.pdf.part`.
fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(PART_SUFFIX);
    path.with_file_name(name)
}

fn failure_reason(error: Error) -> FailureReason {
    match error {
        Error::HttpStatus { status, .. } => FailureReason::Status(status),
        other => FailureReason::Transfer(other.to_string()),
    }
}
