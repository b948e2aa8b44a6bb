//! Batch orchestration: source -> links -> sequential downloads.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::download::fetcher::{Fetch, HttpFetcher, TransferObserver};
use crate::download::outcome::{DownloadOutcome, DownloadTarget};
use crate::download::report::BatchReport;
use crate::error::Result;
use crate::file_type::FileType;
use crate::fs::{download_target, ensure_dir, sanitize_filename};
use crate::html::{extract_links, LinkMatcher, LinkSet};
use crate::http::HttpClient;
use crate::source::{load_source, Source};

/// Finds file links in a page and downloads them one after another.
///
/// Owns the HTTP client and the download directory for the lifetime of the
/// batch. The directory is the only record of what was already retrieved.
pub struct BatchDownloader<F: Fetch = HttpFetcher> {
    client: HttpClient,
    fetcher: F,
    download_dir: PathBuf,
    file_type: FileType,
    matcher: LinkMatcher,
    request_delay: Duration,
    cancel: CancellationToken,
}

impl BatchDownloader<HttpFetcher> {
    /// Build a downloader from configuration, creating the download directory.
    pub fn new(config: &Config) -> Result<Self> {
        let client = HttpClient::new(&config.http)?;
        let fetcher = HttpFetcher::new(client.clone(), config.options.resume);
        Self::with_parts(config, client, fetcher)
    }

    /// Report per-file byte progress to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn TransferObserver>) -> Self {
        self.fetcher = self.fetcher.with_observer(observer);
        self
    }
}

impl<F: Fetch> BatchDownloader<F> {
    /// Build a downloader that retrieves files through `fetcher`.
    pub fn with_fetcher(config: &Config, fetcher: F) -> Result<Self> {
        let client = HttpClient::new(&config.http)?;
        Self::with_parts(config, client, fetcher)
    }

    fn with_parts(config: &Config, client: HttpClient, fetcher: F) -> Result<Self> {
        let download_dir = config.options.download_directory.clone();
        ensure_dir(&download_dir)?;

        Ok(Self {
            client,
            fetcher,
            download_dir,
            file_type: config.options.file_type.clone(),
            matcher: LinkMatcher::new(&config.options.file_type, config.options.match_mode),
            request_delay: config.request_delay(),
            cancel: CancellationToken::new(),
        })
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn file_type(&self) -> &FileType {
        &self.file_type
    }

    /// Token that stops the batch before its next download when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Local destination for a discovered link.
    pub fn target_for(&self, url: &str) -> DownloadTarget {
        download_target(&self.download_dir, url, &self.file_type)
    }

    /// Load `source` and extract the links to files of the target type.
    pub async fn collect_links(&self, source: &Source) -> Result<LinkSet> {
        tracing::info!("Processing {}: {}", source.kind(), source);

        let page = load_source(&self.client, source).await?;
        let links = extract_links(&page.html, page.base_url.as_deref(), &self.matcher);

        tracing::debug!(
            "Found {} {} links (base URL: {})",
            links.len(),
            self.file_type.label(),
            page.base_url.as_deref().unwrap_or("none")
        );

        Ok(links)
    }

    /// Load `source`, extract its links and download them all.
    ///
    /// Only a source that cannot be read is an error; failed files are
    /// recorded in the report.
    pub async fn download_from_source(&self, source: &Source) -> Result<BatchReport> {
        let links = self.collect_links(source).await?;

        if links.is_empty() {
            tracing::info!(
                "No {} links found in the {}",
                self.file_type.label(),
                source.kind()
            );
        }

        Ok(self.run(&links).await)
    }

    /// Download a single URL, optionally under an explicit filename.
    pub async fn fetch_one(&self, url: &str, filename: Option<&str>) -> DownloadOutcome {
        let target = match filename.map(sanitize_filename) {
            Some(Ok(name)) => DownloadTarget {
                url: url.to_string(),
                path: self.download_dir.join(&name),
                filename: name,
            },
            Some(Err(e)) => {
                tracing::warn!("Ignoring filename override for {}: {}", url, e);
                self.target_for(url)
            }
            None => self.target_for(url),
        };

        self.fetcher.fetch(&target).await
    }

    /// Download every link in order, pausing between requests.
    pub async fn run(&self, links: &LinkSet) -> BatchReport {
        let mut report = BatchReport::default();

        if links.is_empty() {
            return report;
        }

        let total = links.len();
        tracing::info!(
            "Starting download of {} {} files into {}",
            total,
            self.file_type.label(),
            self.download_dir.display()
        );

        let mut needs_pause = false;

        for (index, url) in links.iter().enumerate() {
            if self.cancel.is_cancelled() || (needs_pause && !self.pause().await) {
                tracing::warn!(
                    "Batch cancelled, {} of {} links not attempted",
                    total - index,
                    total
                );
                report.mark_cancelled();
                break;
            }

            let target = self.target_for(url);
            tracing::info!("[{}/{}] {}", index + 1, total, target.filename);

            let outcome = self.fetcher.fetch(&target).await;
            needs_pause = outcome.contacted_server() && !self.request_delay.is_zero();
            report.record(&target, outcome);
        }

        tracing::info!(
            "Download complete: {} succeeded ({} already present), {} failed",
            report.succeeded,
            report.skipped,
            report.failed
        );

        report
    }

    /// Sleep for the pacing delay. Returns `false` if cancelled meanwhile.
    async fn pause(&self) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = sleep(self.request_delay) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::outcome::FailureReason;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Instant;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(dir: &Path, delay_ms: u64) -> Config {
        let mut config = Config::default();
        config.options.download_directory = dir.to_path_buf();
        config.options.request_delay_ms = delay_ms;
        config
    }

    fn links(urls: &[String]) -> LinkSet {
        urls.iter().cloned().collect()
    }

    /// Fetcher that records calls and never touches the network.
    #[derive(Default)]
    struct RecordingFetcher {
        calls: Mutex<Vec<String>>,
        started_at: Mutex<Vec<Instant>>,
        already_present: bool,
    }

    #[async_trait]
    impl Fetch for RecordingFetcher {
        async fn fetch(&self, target: &DownloadTarget) -> DownloadOutcome {
            self.calls.lock().unwrap().push(target.url.clone());
            self.started_at.lock().unwrap().push(Instant::now());
            if self.already_present {
                DownloadOutcome::Skipped
            } else {
                DownloadOutcome::Succeeded { bytes: 1 }
            }
        }
    }

    #[tokio::test]
    async fn test_creates_download_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("biology_pdfs");

        BatchDownloader::new(&test_config(&dir, 0)).unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_empty_links_short_circuit() {
        let temp = TempDir::new().unwrap();
        let downloader = BatchDownloader::with_fetcher(
            &test_config(temp.path(), 60_000),
            RecordingFetcher::default(),
        )
        .unwrap();

        let report = tokio::time::timeout(Duration::from_secs(1), downloader.run(&LinkSet::new()))
            .await
            .unwrap();

        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed, 0);
        assert!(report.outcomes.is_empty());
        assert!(downloader.fetcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_outcomes_follow_link_order() {
        let temp = TempDir::new().unwrap();
        let downloader = BatchDownloader::with_fetcher(
            &test_config(temp.path(), 0),
            RecordingFetcher::default(),
        )
        .unwrap();

        let urls = vec![
            "http://x.com/c.pdf".to_string(),
            "http://x.com/a.pdf".to_string(),
            "http://x.com/b.pdf".to_string(),
        ];
        let set = links(&urls);
        let report = downloader.run(&set).await;

        let expected: Vec<String> = set.iter().cloned().collect();
        assert_eq!(*downloader.fetcher.calls.lock().unwrap(), expected);
        assert_eq!(
            report.outcomes.iter().map(|r| r.url.clone()).collect::<Vec<_>>(),
            expected
        );
        assert_eq!(report.succeeded, 3);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let temp = TempDir::new().unwrap();
        let downloader = BatchDownloader::with_fetcher(
            &test_config(temp.path(), 0),
            RecordingFetcher::default(),
        )
        .unwrap();
        downloader.cancellation_token().cancel();

        let report = downloader
            .run(&links(&["http://x.com/a.pdf".to_string()]))
            .await;

        assert!(report.cancelled);
        assert_eq!(report.total(), 0);
        assert!(downloader.fetcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pacing_delay() {
        let temp = TempDir::new().unwrap();
        let downloader = BatchDownloader::with_fetcher(
            &test_config(temp.path(), 60_000),
            RecordingFetcher::default(),
        )
        .unwrap();

        let token = downloader.cancellation_token();
        tokio::spawn(async move {
            sleep(Duration::from_millis(100)).await;
            token.cancel();
        });

        let set = links(&[
            "http://x.com/a.pdf".to_string(),
            "http://x.com/b.pdf".to_string(),
        ]);
        let start = Instant::now();
        let report = tokio::time::timeout(Duration::from_secs(5), downloader.run(&set))
            .await
            .unwrap();

        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(report.cancelled);
        assert_eq!(report.total(), 1);
        assert_eq!(report.succeeded, 1);
        assert_eq!(downloader.fetcher.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delay_between_downloads() {
        let temp = TempDir::new().unwrap();
        let downloader = BatchDownloader::with_fetcher(
            &test_config(temp.path(), 200),
            RecordingFetcher::default(),
        )
        .unwrap();

        let report = downloader
            .run(&links(&[
                "http://x.com/a.pdf".to_string(),
                "http://x.com/b.pdf".to_string(),
            ]))
            .await;

        assert_eq!(report.succeeded, 2);
        let started_at = downloader.fetcher.started_at.lock().unwrap().clone();
        assert_eq!(started_at.len(), 2);
        assert!(started_at[1] - started_at[0] >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_no_delay_after_skipped_files() {
        let temp = TempDir::new().unwrap();
        let fetcher = RecordingFetcher {
            already_present: true,
            ..RecordingFetcher::default()
        };
        let downloader =
            BatchDownloader::with_fetcher(&test_config(temp.path(), 60_000), fetcher).unwrap();

        let set = links(&[
            "http://x.com/a.pdf".to_string(),
            "http://x.com/b.pdf".to_string(),
            "http://x.com/c.pdf".to_string(),
        ]);
        let report = tokio::time::timeout(Duration::from_secs(5), downloader.run(&set))
            .await
            .unwrap();

        assert_eq!(report.skipped, 3);
        assert_eq!(report.succeeded, 3);
        assert!(!report.cancelled);
        assert_eq!(downloader.fetcher.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_existing_file_is_skipped_and_counted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"pdf".to_vec()))
            .expect(0)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("report.pdf"), b"already here").unwrap();

        let downloader = BatchDownloader::new(&test_config(temp.path(), 0)).unwrap();
        let report = downloader
            .run(&links(&[format!("{}/files/report.pdf", server.uri())]))
            .await;

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.outcomes[0].outcome, DownloadOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/a.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"aaa".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/b.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/c.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ccc".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let downloader = BatchDownloader::new(&test_config(temp.path(), 10)).unwrap();
        let report = downloader
            .run(&links(&[
                format!("{}/files/a.pdf", server.uri()),
                format!("{}/files/b.pdf", server.uri()),
                format!("{}/files/c.pdf", server.uri()),
            ]))
            .await;

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(temp.path().join("a.pdf").exists());
        assert!(!temp.path().join("b.pdf").exists());
        assert!(temp.path().join("c.pdf").exists());

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].0.ends_with("/files/b.pdf"));
        assert_eq!(failures[0].1, &FailureReason::Status(404));
        assert_eq!(failures[0].1.to_string(), "404");
    }

    #[tokio::test]
    async fn test_second_run_transfers_nothing() {
        let server = MockServer::start().await;
        for name in ["one.pdf", "two.pdf"] {
            Mock::given(method("GET"))
                .and(path(format!("/docs/{}", name)))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(name.as_bytes().to_vec()))
                .expect(1)
                .mount(&server)
                .await;
        }

        let temp = TempDir::new().unwrap();
        let set = links(&[
            format!("{}/docs/one.pdf", server.uri()),
            format!("{}/docs/two.pdf", server.uri()),
        ]);

        let downloader = BatchDownloader::new(&test_config(temp.path(), 0)).unwrap();
        let first = downloader.run(&set).await;
        let second = downloader.run(&set).await;

        assert_eq!(first.succeeded, 2);
        assert_eq!(first.skipped, 0);
        assert_eq!(second.succeeded, 2);
        assert_eq!(second.skipped, 2);
        assert!(second
            .outcomes
            .iter()
            .all(|record| record.outcome == DownloadOutcome::Skipped));
    }

    #[tokio::test]
    async fn test_download_from_local_html_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bio/cells.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"cells".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bio/download"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"genes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let html_path = temp.path().join("Biology Resources.html");
        std::fs::write(
            &html_path,
            format!(
                r#"<html><head><base href="{}/bio/"></head><body>
                <a href="cells.pdf">Cells</a>
                <a href="cells.pdf">Cells again</a>
                <a href="download?file=genes.pdf">Genes</a>
                <a href="notes.docx">Notes</a>
                </body></html>"#,
                server.uri()
            ),
        )
        .unwrap();

        let out_dir = temp.path().join("biology_pdfs");
        let downloader = BatchDownloader::new(&test_config(&out_dir, 0)).unwrap();
        let report = downloader
            .download_from_source(&Source::File(html_path))
            .await
            .unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(std::fs::read(out_dir.join("cells.pdf")).unwrap(), b"cells");

        let synthetic = downloader
            .target_for(&format!("{}/bio/download?file=genes.pdf", server.uri()))
            .filename;
        assert!(synthetic.starts_with("document_"));
        assert_eq!(std::fs::read(out_dir.join(synthetic)).unwrap(), b"genes");
    }

    #[tokio::test]
    async fn test_no_links_found_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let html_path = temp.path().join("Chemistry Resources.html");
        std::fs::write(&html_path, r#"<a href="lab.docx">Lab</a>"#).unwrap();

        let mut config = test_config(&temp.path().join("out"), 0);
        config.options.file_type = FileType::new("pse").unwrap();
        let downloader = BatchDownloader::new(&config).unwrap();

        let report = downloader
            .download_from_source(&Source::File(html_path))
            .await
            .unwrap();

        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_unreadable_source_is_fatal() {
        let temp = TempDir::new().unwrap();
        let downloader = BatchDownloader::new(&test_config(temp.path(), 0)).unwrap();

        let result = downloader
            .download_from_source(&Source::File(temp.path().join("missing.html")))
            .await;

        assert!(matches!(
            result,
            Err(crate::error::Error::SourceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_one_with_filename_override() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let downloader = BatchDownloader::new(&test_config(temp.path(), 0)).unwrap();

        let outcome = downloader
            .fetch_one(&format!("{}/get", server.uri()), Some("chosen.pdf"))
            .await;

        assert_eq!(outcome, DownloadOutcome::Succeeded { bytes: 1 });
        assert!(temp.path().join("chosen.pdf").exists());
    }
}
