//! Observers receiving chunk progress events.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::progress::ProgressUpdate;

/// Observer trait for receiving progress updates from chunk workers.
pub trait ProgressObserver: Send + Sync {
    /// Receive a progress update.
    fn on_progress(&self, update: &ProgressUpdate);
}

/// Null object pattern: discards every update.
#[derive(Debug, Default)]
pub struct NoOpObserver;

impl NoOpObserver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProgressObserver for NoOpObserver {
    fn on_progress(&self, _update: &ProgressUpdate) {}
}

/// Observer that forwards updates to `tracing` and counts finished chunks.
#[derive(Debug, Default)]
pub struct LoggingObserver {
    finished: AtomicUsize,
}

impl LoggingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks reported as done so far.
    #[must_use]
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::Relaxed)
    }
}

impl ProgressObserver for LoggingObserver {
    fn on_progress(&self, update: &ProgressUpdate) {
        if update.done {
            let finished = self.finished.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(
                chunk = update.chunk,
                terms = update.terms(),
                finished,
                "Chunk complete"
            );
        } else {
            debug!(
                chunk = update.chunk,
                start = update.range.start,
                end = update.range.end,
                "Chunk started"
            );
        }
    }
}
