//! Progress events and the abort token shared by chunk workers.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::BenchError;

/// Progress event emitted when a chunk starts or finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Chunk index within the current run.
    pub chunk: usize,
    /// Term range of the chunk.
    pub range: Range<u64>,
    /// Whether the chunk has finished.
    pub done: bool,
}

impl ProgressUpdate {
    /// A chunk has been picked up by a worker.
    #[must_use]
    pub fn started(chunk: usize, range: Range<u64>) -> Self {
        Self {
            chunk,
            range,
            done: false,
        }
    }

    /// A chunk has produced its partial sum.
    #[must_use]
    pub fn done(chunk: usize, range: Range<u64>) -> Self {
        Self {
            chunk,
            range,
            done: true,
        }
    }

    /// Number of terms in the chunk.
    #[must_use]
    pub fn terms(&self) -> u64 {
        self.range.end.saturating_sub(self.range.start)
    }
}

/// Abort flag with an optional deadline, polled by series workers.
///
/// Raised by the scheduler once a run has already failed, so that sibling
/// workers stop instead of finishing discarded work.
///
/// # Example
/// ```
/// use pibench_core::progress::AbortToken;
///
/// let token = AbortToken::new();
/// assert!(token.check().is_ok());
///
/// token.abort();
/// assert!(token.is_aborted());
/// assert!(token.check().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct AbortToken {
    aborted: Arc<AtomicBool>,
    deadline: Option<(Instant, Duration)>,
}

impl AbortToken {
    /// A token without deadline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            aborted: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// A token that also expires after `timeout`.
    ///
    /// A timeout too long to express as an `Instant` never expires.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            aborted: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout).map(|at| (at, timeout)),
        }
    }

    /// The absolute deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline.map(|(at, _)| at)
    }

    /// Raise the flag for every clone of this token.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Relaxed)
    }

    /// Fail with `Cancelled` if aborted, or `Timeout` past the deadline.
    pub fn check(&self) -> Result<(), BenchError> {
        if self.is_aborted() {
            return Err(BenchError::Cancelled);
        }
        match self.deadline {
            Some((at, timeout)) if Instant::now() >= at => {
                Err(BenchError::Timeout(format!("{timeout:?}")))
            }
            _ => Ok(()),
        }
    }
}

impl Default for AbortToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_terms() {
        let update = ProgressUpdate::started(2, 100..250);
        assert_eq!(update.terms(), 150);
        assert!(!update.done);
        assert!(ProgressUpdate::done(2, 100..250).done);
    }

    #[test]
    fn abort_propagates_through_clone() {
        let token = AbortToken::new();
        let clone = token.clone();
        token.abort();
        assert!(clone.is_aborted());
        assert!(matches!(clone.check(), Err(BenchError::Cancelled)));
    }

    #[test]
    fn timeout_not_expired() {
        let token = AbortToken::with_timeout(Duration::from_secs(60));
        assert!(token.check().is_ok());
        assert!(token.deadline().is_some());
    }

    #[test]
    fn unrepresentable_timeout_never_expires() {
        let token = AbortToken::with_timeout(Duration::from_secs(u64::MAX));
        assert!(token.deadline().is_none());
        assert!(token.check().is_ok());
    }

    #[test]
    fn timeout_expired() {
        let token = AbortToken::with_timeout(Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(1));
        let err = token.check().unwrap_err();
        assert_eq!(err.to_string(), "benchmark timed out after 0ns");
    }

    #[test]
    fn abort_wins_over_timeout() {
        let token = AbortToken::with_timeout(Duration::from_millis(0));
        token.abort();
        assert!(matches!(token.check(), Err(BenchError::Cancelled)));
    }
}
