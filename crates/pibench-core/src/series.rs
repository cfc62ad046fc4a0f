//! Chudnovsky series evaluation over half-open term ranges.
//!
//! Per term `i` the recurrence is
//!
//! ```text
//! M *= (K^3 - 16K) / i^3
//! L += 545140134
//! X *= -262537412640768000
//! S += M * L / X
//! K += 12
//! ```
//!
//! `M / X` is carried as one running [`Float`] of fixed width, so every term
//! costs one full-width multiply and divide whatever its index. A chunk
//! starting at `a > 0` is seeded from the closed form
//! `M_a = (6a)! / ((3a)! (a!)^3)` and `X_a = (-640320^3)^a`, never with
//! `M = 1`: the cumulative product has no other valid restart value, and a
//! unit reseed silently evaluates a different series.

use std::ops::Range;

use num_bigint::BigInt;
use tracing::trace;

use crate::combinatorics::float_range_product;
use crate::constants::{
    ABORT_POLL_INTERVAL, CHUDNOVSKY_C_FACTOR, CHUDNOVSKY_C_RADICAND, CHUDNOVSKY_K0,
    CHUDNOVSKY_K_STEP, CHUDNOVSKY_L0, CHUDNOVSKY_L_STEP, CHUDNOVSKY_X_STEP, MAX_TERMS,
};
use crate::decimal::{Decimal, Float, Precision};
use crate::error::{ArithmeticError, BenchError};
use crate::progress::AbortToken;

/// Recurrence state of one worker.
#[derive(Debug, Clone)]
pub struct SeriesState {
    /// `6 + 12i`, the factor driving the `M` update of term `i + 1`.
    pub k: BigInt,
    /// Linear factor `13591409 + 545140134i`.
    pub l: BigInt,
    /// `M_i / X_i` in units of the last fractional digit.
    pub ratio: Float,
    /// Partial sum of the terms processed so far.
    pub s: Decimal,
}

impl SeriesState {
    /// Seed the state at index `start`, with `S` holding the term at `start`.
    pub fn seed(precision: &Precision, start: u64) -> Result<Self, ArithmeticError> {
        if start > MAX_TERMS {
            return Err(ArithmeticError::IndexOutOfRange(start));
        }
        let ratio = seed_ratio(precision, start)?;
        let k = BigInt::from(CHUDNOVSKY_K0) + BigInt::from(CHUDNOVSKY_K_STEP) * start;
        let l = BigInt::from(CHUDNOVSKY_L0) + BigInt::from(CHUDNOVSKY_L_STEP) * start;
        let s = precision.from_ulps(&ratio, &l);
        Ok(Self { k, l, ratio, s })
    }

    /// Apply the recurrence for index `i`, which must follow the last one processed.
    pub fn step(&mut self, precision: &Precision, i: u64) -> Result<(), ArithmeticError> {
        let factor = &self.k * &self.k * &self.k - &self.k * 16u32;
        let i = BigInt::from(i);
        let divisor = &i * &i * &i * CHUDNOVSKY_X_STEP;
        self.ratio = precision.float_scale(&self.ratio, &factor, &divisor)?;
        self.l += CHUDNOVSKY_L_STEP;
        let t = precision.from_ulps(&self.ratio, &self.l);
        self.s = precision.add(&self.s, &t)?;
        self.k += CHUDNOVSKY_K_STEP;
        Ok(())
    }

    /// Run [`step`](Self::step) over `indices`, polling `abort` periodically.
    pub fn advance(
        &mut self,
        precision: &Precision,
        indices: Range<u64>,
        abort: &AbortToken,
    ) -> Result<(), BenchError> {
        let first = indices.start;
        for i in indices {
            if (i - first) % ABORT_POLL_INTERVAL == 0 {
                abort.check()?;
            }
            self.step(precision, i)?;
        }
        Ok(())
    }
}

/// `M_a * 10^d / X_a` from the closed forms, at float width throughout.
fn seed_ratio(precision: &Precision, start: u64) -> Result<Float, ArithmeticError> {
    let upper = float_range_product(precision, 3 * start + 1, 6 * start + 1);
    let numerator = precision.float_mul(&upper, &precision.float(precision.scale()));

    let fact = float_range_product(precision, 1, start + 1);
    let cubed = precision.float_mul(&precision.float_mul(&fact, &fact), &fact);
    let power = precision.float_pow(&BigInt::from(CHUDNOVSKY_X_STEP), start);
    let denominator = precision.float_mul(&cubed, &power);

    precision.float_div(&numerator, &denominator)
}

/// The series sum of one term range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialSum {
    /// Term range that was summed.
    pub range: Range<u64>,
    /// Sum of the terms in `range`.
    pub sum: Decimal,
}

/// Sum the Chudnovsky terms with indices in `range`.
///
/// An empty range yields a zero sum.
pub fn evaluate_range(
    precision: &Precision,
    range: Range<u64>,
    abort: &AbortToken,
) -> Result<PartialSum, BenchError> {
    if range.is_empty() {
        return Ok(PartialSum {
            range,
            sum: precision.zero(),
        });
    }
    abort.check()?;
    let mut state = SeriesState::seed(precision, range.start)?;
    state.advance(precision, range.start + 1..range.end, abort)?;
    trace!(start = range.start, end = range.end, "Range evaluated");
    Ok(PartialSum {
        range,
        sum: state.s,
    })
}

/// Add partial sums into one total.
pub fn combine(precision: &Precision, partials: &[PartialSum]) -> Result<Decimal, ArithmeticError> {
    partials
        .iter()
        .try_fold(precision.zero(), |acc, p| precision.add(&acc, &p.sum))
}

/// The prefactor `C = 426880 * sqrt(10005)`, computed as one square root.
pub fn chudnovsky_constant(precision: &Precision) -> Result<Decimal, ArithmeticError> {
    let radicand = CHUDNOVSKY_C_FACTOR * CHUDNOVSKY_C_FACTOR * CHUDNOVSKY_C_RADICAND;
    precision.sqrt(&precision.from_int(radicand))
}

/// `pi = C / S` for a converged series sum.
pub fn pi_from_sum(precision: &Precision, sum: &Decimal) -> Result<Decimal, ArithmeticError> {
    let c = chudnovsky_constant(precision)?;
    precision.div(&c, sum)
}

/// Evaluate `range` in one worker and return `C / S`.
///
/// # Example
/// ```
/// use pibench_core::decimal::Precision;
/// use pibench_core::series::calculate_pi;
///
/// let precision = Precision::new(30);
/// let pi = calculate_pi(&precision, 0..3).unwrap();
/// assert!(pi.to_string().starts_with("3.14159265358979323846"));
/// ```
pub fn calculate_pi(precision: &Precision, range: Range<u64>) -> Result<Decimal, BenchError> {
    let partial = evaluate_range(precision, range, &AbortToken::new())?;
    Ok(pi_from_sum(precision, &partial.sum)?)
}
