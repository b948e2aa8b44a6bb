//! Path and directory management.

use std::path::Path;

use crate::download::DownloadTarget;
use crate::error::Result;
use crate::file_type::FileType;
use crate::fs::naming::resolve_filename;

/// Pair a discovered link with its path inside `download_dir`.
pub fn download_target(download_dir: &Path, url: &str, file_type: &FileType) -> DownloadTarget {
    let filename = resolve_filename(url, file_type);
    DownloadTarget {
        url: url.to_string(),
        path: download_dir.join(&filename),
        filename,
    }
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
