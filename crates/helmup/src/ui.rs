//! Console output: styled diagnostics and a download progress bar.

use console::style;
use helmup_core::Reporter;
use helmup_fetch::{FetchPhase, Progress};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        eprintln!("{} {message}", style("info").cyan().bold());
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {message}", style("warn").yellow().bold());
    }
}

const PB_STYLE: &str =
    "{spinner:.blue} {prefix:>12.cyan.bold} {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

/// Drives an indicatif bar from fetch progress callbacks. The bar appears on
/// the first downloaded chunk and clears itself once the payload is on disk.
pub struct DownloadTracker {
    bar: Mutex<Option<ProgressBar>>,
}

impl DownloadTracker {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    pub fn update(&self, progress: &Progress) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };
        match progress.phase {
            FetchPhase::Connecting => {}
            FetchPhase::Downloading => {
                let bar = slot.get_or_insert_with(|| build_bar(progress.total_bytes));
                bar.set_position(progress.bytes_downloaded);
            }
            FetchPhase::Verifying | FetchPhase::Completed => {
                if let Some(bar) = slot.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }
}

fn build_bar(total_bytes: Option<u64>) -> ProgressBar {
    let bar = match total_bytes {
        Some(len) => ProgressBar::new(len),
        None => ProgressBar::new_spinner(),
    };
    if let Ok(template) = ProgressStyle::with_template(PB_STYLE) {
        bar.set_style(template.tick_chars(TICK).progress_chars(PB_CHARS));
    }
    bar.set_prefix("downloading");
    bar
}
