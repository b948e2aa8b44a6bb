//! Shared HTTP client.

use std::time::Duration;

use reqwest::{header, Client, Response};

use crate::config::HttpConfig;
use crate::error::{Error, Result};

/// HTTP client shared by the source loader and the file fetcher.
///
/// Cloning is cheap and reuses the same connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    page_timeout: Duration,
    read_timeout: Duration,
}

impl HttpClient {
    /// Build a client carrying the configured identity header and timeouts.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
        );

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            page_timeout: config.page_timeout(),
            read_timeout: config.read_timeout(),
        })
    }

    /// Maximum idle time between body chunks of a file download.
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Fetch an HTML page. Returns the body and the final URL after redirects.
    pub async fn get_page(&self, url: &str) -> Result<(String, String)> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.page_timeout)
            .send()
            .await?;

        let response = check_status(url, response)?;
        let final_url = response.url().to_string();
        let body = response.text().await?;

        Ok((body, final_url))
    }

    /// Start a streaming download. The body has not been read yet.
    pub async fn download_file(&self, url: &str) -> Result<Response> {
        tracing::debug!("GET {} (download)", url);

        let response = self.client.get(url).send().await?;
        check_status(url, response)
    }
}

/// Turn a non-success status into an error.
fn check_status(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    tracing::debug!("Response status: {}", status);

    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}
