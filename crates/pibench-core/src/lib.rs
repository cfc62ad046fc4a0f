//! # pibench-core
//!
//! Core library for the pibench CPU benchmark: fixed-precision decimal
//! arithmetic, the Chudnovsky series for pi, and elapsed-time scoring.

pub mod combinatorics;
pub mod constants;
pub mod decimal;
pub mod error;
pub mod observer;
pub mod progress;
pub mod score;
pub mod series;

// Re-exports
pub use constants::{exit_codes, GUARD_DIGITS, MAX_TERMS, PI_PRECISION};
pub use decimal::{Decimal, Precision};
pub use error::{ArithmeticError, BenchError};
pub use observer::{LoggingObserver, NoOpObserver, ProgressObserver};
pub use progress::{AbortToken, ProgressUpdate};
pub use score::{calculate_score, score_from_secs};
pub use series::{calculate_pi, evaluate_range, PartialSum, SeriesState};

/// Compute pi with `terms` Chudnovsky terms at `terms + GUARD_DIGITS` digits.
///
/// Convenience wrapper around [`calculate_pi`] for single-threaded use.
///
/// # Example
/// ```
/// let pi = pibench_core::compute_pi(20).unwrap();
/// assert!(pi.to_string().starts_with("3.14159265358979"));
/// ```
pub fn compute_pi(terms: u64) -> Result<Decimal, BenchError> {
    let digits = u32::try_from(terms)
        .map_err(|_| BenchError::Config(format!("too many terms: {terms}")))?;
    let precision = Precision::working(digits);
    calculate_pi(&precision, 0..terms)
}
