//! Configuration structures and loading logic.

use crate::config::modes::MatchMode;
use crate::error::{Error, Result};
use crate::file_type::FileType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Directory downloaded files are written to.
    #[serde(default = "default_download_directory")]
    pub download_directory: PathBuf,

    /// File extension to look for (pdf, pse, docx, ...).
    #[serde(default)]
    pub file_type: FileType,

    /// Skip links whose destination file already exists.
    #[serde(default = "default_true")]
    pub resume: bool,

    /// Pause between consecutive downloads, in milliseconds.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Link matching mode (loose, strict).
    #[serde(default)]
    pub match_mode: MatchMode,

    /// Whether to show per-file progress bars.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: default_download_directory(),
            file_type: FileType::default(),
            resume: true,
            request_delay_ms: default_request_delay_ms(),
            match_mode: MatchMode::default(),
            show_progress: true,
        }
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// TCP connect timeout.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Total timeout for fetching an HTML page.
    #[serde(default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    /// Maximum idle time between body chunks of a file download.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout(),
            page_timeout_secs: default_page_timeout(),
            read_timeout_secs: default_read_timeout(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

fn default_download_directory() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_true() -> bool {
    true
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_page_timeout() -> u64 {
    30
}

fn default_read_timeout() -> u64 {
    60
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the pause between consecutive downloads.
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.options.request_delay_ms)
    }
}
