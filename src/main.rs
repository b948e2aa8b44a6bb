//! File Downloader - CLI entry point.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use file_downloader::{
    cli::{Args, DEFAULT_CONFIG_FILE},
    config::{validate_config, Config},
    download::{BatchDownloader, BatchReport},
    error::{exit_codes, Error, Result},
    output::{
        print_banner, print_config_summary, print_destination, print_error, print_info,
        print_links, print_report, print_success, print_warning, BarObserver,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::SourceUnavailable { .. } => ExitCode::from(exit_codes::SOURCE_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<i32> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration and apply CLI overrides
    let mut config = load_config(args.config.as_deref())?;
    args.merge_into_config(&mut config)?;
    validate_config(&config)?;

    let source = args.source()?;

    print_config_summary(
        &source.to_string(),
        &config.options.file_type.label(),
        &config.options.download_directory.display().to_string(),
        config.options.resume,
    );

    let mut downloader = BatchDownloader::new(&config)?;
    if config.options.show_progress {
        downloader = downloader.with_observer(Arc::new(BarObserver::new()));
    }

    // First Ctrl-C stops after the current file, a second one exits immediately
    let token = downloader.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            print_warning("Interrupted, stopping after the current download...");
            token.cancel();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(exit_codes::CANCELLED);
        }
    });

    let links = downloader.collect_links(&source).await?;

    let file_type = downloader.file_type();
    if links.is_empty() {
        print_info(&format!(
            "No {} links found in the {}.",
            file_type.label(),
            source.kind()
        ));
        if let Some(path) = &args.report {
            write_report(path, &BatchReport::default())?;
        }
        return Ok(exit_codes::SUCCESS);
    }

    print_links(&links, file_type);
    print_destination(downloader.download_dir());

    let report = downloader.run(&links).await;
    print_report(&report);

    if let Some(path) = &args.report {
        write_report(path, &report)?;
        print_success(&format!("Report written to {}", path.display()));
    }

    if report.cancelled {
        Ok(exit_codes::CANCELLED)
    } else if report.failed > 0 {
        Ok(exit_codes::DOWNLOAD_ERROR)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

/// Load the named config file, or the default one when it exists.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Config::load(default_path)
            } else {
                tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(Config::default())
            }
        }
    }
}

/// Write the report as pretty-printed JSON.
fn write_report(path: &Path, report: &BatchReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report)?;
    std::fs::write(path, content)?;
    Ok(())
}
