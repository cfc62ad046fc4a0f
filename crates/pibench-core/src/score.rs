//! Elapsed time to score conversion.

use std::time::Duration;

use crate::constants::{SCORE_OFFSET, SCORE_SCALE};

/// Score for an elapsed time in seconds: `ceil(10000 / (secs + 1))`.
///
/// Negative and NaN inputs count as zero seconds. The result never exceeds
/// 10000 and is positive for any finite input.
///
/// # Example
/// ```
/// assert_eq!(pibench_core::score::score_from_secs(5.0), 1667);
/// assert_eq!(pibench_core::score::score_from_secs(0.0), 10_000);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn score_from_secs(secs: f64) -> u64 {
    let secs = if secs.is_nan() { 0.0 } else { secs.max(0.0) };
    (SCORE_SCALE / (secs + SCORE_OFFSET)).ceil() as u64
}

/// Score for an elapsed [`Duration`].
#[must_use]
pub fn calculate_score(elapsed: Duration) -> u64 {
    score_from_secs(elapsed.as_secs_f64())
}
