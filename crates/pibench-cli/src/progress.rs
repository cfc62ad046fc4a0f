//! Per-chunk progress bar.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use pibench_core::observer::ProgressObserver;
use pibench_core::progress::ProgressUpdate;

const TEMPLATE: &str = "{spinner} {prefix:>11} [{bar:30}] {pos}/{len} chunks {elapsed}";

/// Progress bar advancing once per finished chunk.
pub struct ChunkProgressBar {
    bar: ProgressBar,
}

impl ChunkProgressBar {
    /// Visible bar over `chunks` chunks, labelled with `prefix`.
    #[must_use]
    pub fn new(chunks: u64, prefix: &str) -> Self {
        let bar = ProgressBar::new(chunks);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix(prefix.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Bar that draws nothing.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Chunks finished so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for ChunkProgressBar {
    fn on_progress(&self, update: &ProgressUpdate) {
        if update.done {
            self.bar.inc(1);
        }
    }
}
