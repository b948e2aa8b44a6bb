//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     File Downloader                                   ║
║     Find and fetch linked files from HTML pages       ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(source: &str, file_type: &str, download_dir: &str, resume: bool) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Source:    {}", source);
    println!("  File type: {}", file_type);
    println!("  Directory: {}", download_dir);
    println!("  Resume:    {}", if resume { "yes" } else { "no" });
    println!();
}
