//! Command-line argument definitions using clap.

use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{validate_page_url, Config, MatchMode};
use crate::error::Result;
use crate::file_type::FileType;
use crate::source::Source;

/// Default configuration file, loaded only when present.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// File link finder and downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "file-downloader",
    version,
    about = "Download files linked from an HTML page",
    long_about = "Finds links to files of a given type (pdf, pse, docx, ...) in a local HTML file \
                  or a web page and downloads them into a folder.\n\n\
                  Files already present in the folder are skipped, so an interrupted run can \
                  simply be started again.",
    group(ArgGroup::new("source").required(true).args(["file", "url"]))
)]
pub struct Args {
    /// Path to a local HTML file.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// URL of a web page to scan.
    #[arg(short, long)]
    pub url: Option<String>,

    /// File extension to download (e.g. pdf, pse, docx, xlsx).
    #[arg(short = 't', long = "file-type")]
    pub file_type: Option<String>,

    /// Directory to save files in.
    #[arg(short = 'd', long = "download-dir")]
    pub download_dir: Option<PathBuf>,

    /// Download files again even if they already exist.
    #[arg(long)]
    pub no_resume: bool,

    /// Milliseconds to wait between downloads.
    #[arg(long = "delay-ms")]
    pub delay_ms: Option<u64>,

    /// How strictly links are matched against the file type.
    #[arg(long, value_enum)]
    pub match_mode: Option<MatchModeArg>,

    /// User agent sent with every request.
    #[arg(short = 'a', long = "user-agent", env = "FILE_DOWNLOADER_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Seconds to wait for the HTML page.
    #[arg(long = "page-timeout")]
    pub page_timeout: Option<u64>,

    /// Seconds a file download may stall before it is abandoned.
    #[arg(long = "read-timeout")]
    pub read_timeout: Option<u64>,

    /// Path to configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the final report as JSON to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Hide download progress bars.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI match mode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MatchModeArg {
    /// Any link containing ".<type>".
    Loose,
    /// Only links ending in ".<type>" (optionally followed by ? or #) or with a /<type>/ segment.
    Strict,
}

impl From<MatchModeArg> for MatchMode {
    fn from(arg: MatchModeArg) -> Self {
        match arg {
            MatchModeArg::Loose => MatchMode::Loose,
            MatchModeArg::Strict => MatchMode::Strict,
        }
    }
}

impl Args {
    /// The HTML source selected on the command line.
    pub fn source(&self) -> Result<Source> {
        match (&self.file, &self.url) {
            (Some(path), _) => Ok(Source::File(path.clone())),
            (None, Some(url)) => Ok(Source::Url(validate_page_url(url)?.to_string())),
            (None, None) => Err(crate::error::Error::MissingConfig(
                "--file or --url".to_string(),
            )),
        }
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) -> Result<()> {
        if let Some(file_type) = &self.file_type {
            config.options.file_type = FileType::new(file_type)?;
        }

        if let Some(dir) = &self.download_dir {
            config.options.download_directory = dir.clone();
        }

        if self.no_resume {
            config.options.resume = false;
        }

        if let Some(delay) = self.delay_ms {
            config.options.request_delay_ms = delay;
        }

        if let Some(mode) = self.match_mode {
            config.options.match_mode = mode.into();
        }

        if self.quiet {
            config.options.show_progress = false;
        }

        if let Some(user_agent) = &self.user_agent {
            config.http.user_agent = user_agent.clone();
        }

        if let Some(timeout) = self.page_timeout {
            config.http.page_timeout_secs = timeout;
        }

        if let Some(timeout) = self.read_timeout {
            config.http.read_timeout_secs = timeout;
        }

        Ok(())
    }
}
