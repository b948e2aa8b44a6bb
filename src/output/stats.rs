//! Link listing and report printing.

use std::path::Path;

use console::style;

use crate::download::BatchReport;
use crate::file_type::FileType;
use crate::html::LinkSet;

/// Print the numbered list of discovered links.
pub fn print_links(links: &LinkSet, file_type: &FileType) {
    println!(
        "Found {} {} links:",
        style(links.len()).bold(),
        file_type.label()
    );
    for (i, link) in links.iter().enumerate() {
        println!("  {}. {}", i + 1, link);
    }
    println!();
}

/// Print where files will be written.
pub fn print_destination(download_dir: &Path) {
    let absolute = download_dir
        .canonicalize()
        .unwrap_or_else(|_| download_dir.to_path_buf());
    println!("Files will be saved to: {}", absolute.display());
}

/// Print the final batch report.
pub fn print_report(report: &BatchReport) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    if report.cancelled {
        println!("{}", style("Download cancelled").yellow().bold());
    } else {
        println!("{}", style("Download complete!").bold());
    }
    println!(
        "  {} Successful: {} ({} already present)",
        style("✓").green(),
        report.succeeded,
        report.skipped
    );
    println!("  {} Failed:     {}", style("✗").red(), report.failed);

    if report.failed > 0 {
        println!();
        println!("{}", style("Failed downloads:").bold());
        for (url, reason) in report.failures() {
            println!("  {} {} ({})", style("✗").red(), url, reason);
        }
    }
    println!("{}", style("═".repeat(50)).dim());
}
