//! Progress bar utilities.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

use crate::download::TransferObserver;

/// Create a progress bar for downloads of known size.
pub fn create_download_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} {spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );
    bar
}

/// Create a byte-counting spinner for downloads of unknown size.
pub fn create_byte_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{msg} {spinner:.green} {bytes} ({bytes_per_sec})")
            .unwrap(),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Draws one progress bar per transfer.
#[derive(Default)]
pub struct BarObserver {
    bar: Mutex<Option<ProgressBar>>,
}

impl BarObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransferObserver for BarObserver {
    fn started(&self, label: &str, total: Option<u64>) {
        let bar = match total {
            Some(total) if total > 0 => create_download_bar(total),
            _ => create_byte_spinner(),
        };
        bar.set_message(label.to_string());

        if let Ok(mut current) = self.bar.lock() {
            if let Some(previous) = current.replace(bar) {
                previous.finish_and_clear();
            }
        }
    }

    fn advanced(&self, downloaded: u64) {
        if let Ok(current) = self.bar.lock() {
            if let Some(bar) = current.as_ref() {
                bar.set_position(downloaded);
            }
        }
    }

    fn finished(&self) {
        if let Ok(mut current) = self.bar.lock() {
            if let Some(bar) = current.take() {
                bar.finish_and_clear();
            }
        }
    }
}
