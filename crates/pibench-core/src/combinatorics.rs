//! Closed-form combinatorial coefficients for seeding series chunks.

use num_bigint::{BigInt, BigUint};
use num_traits::One;

use crate::decimal::{Float, Precision};

/// Below this span, products are accumulated linearly.
const PRODUCT_LEAF_SPAN: u64 = 32;

/// Product of all integers in `[lo, hi)`, computed with a balanced product tree.
///
/// Returns 1 for an empty range.
#[must_use]
pub fn range_product(lo: u64, hi: u64) -> BigUint {
    if hi <= lo {
        return BigUint::one();
    }
    if hi - lo <= PRODUCT_LEAF_SPAN {
        return (lo..hi).fold(BigUint::one(), |acc, v| acc * v);
    }
    let mid = lo + (hi - lo) / 2;
    range_product(lo, mid) * range_product(mid, hi)
}

/// [`range_product`] carried at the float width of `precision`.
///
/// Leaves are multiplied exactly; inner nodes truncate, so the cost stays
/// bounded by the working precision however long the range is.
#[must_use]
pub fn float_range_product(precision: &Precision, lo: u64, hi: u64) -> Float {
    if hi.saturating_sub(lo) <= PRODUCT_LEAF_SPAN {
        return precision.float(&BigInt::from(range_product(lo, hi)));
    }
    let mid = lo + (hi - lo) / 2;
    precision.float_mul(
        &float_range_product(precision, lo, mid),
        &float_range_product(precision, mid, hi),
    )
}

/// `n!`.
#[must_use]
pub fn factorial(n: u64) -> BigUint {
    range_product(1, n + 1)
}

/// The cumulative Chudnovsky coefficient `M_n = (6n)! / ((3n)! * (n!)^3)`.
///
/// This equals the running product `prod_{i=1..n} (K_i^3 - 16 K_i) / i^3`
/// with `K_i = 12i - 6`. Exact, so it grows without bound; series chunks are
/// seeded from [`float_range_product`] instead.
#[must_use]
pub fn chudnovsky_coefficient(n: u64) -> BigUint {
    let numerator = range_product(3 * n + 1, 6 * n + 1);
    let n_fact = factorial(n);
    let denominator = &n_fact * &n_fact * &n_fact;
    numerator / denominator
}
