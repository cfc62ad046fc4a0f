//! Benchmark constants: precision, Chudnovsky coefficients, and scoring.

/// Number of series terms evaluated per benchmark, also the target digit count.
pub const PI_PRECISION: u64 = 10_000;

/// Extra working digits carried above the target to absorb truncation drift.
pub const GUARD_DIGITS: u32 = 2;

/// Extra mantissa bits carried by running series terms beyond the scale width.
pub const FLOAT_GUARD_BITS: u64 = 64;

/// Largest term count accepted (indices are raised to `u32` powers).
pub const MAX_TERMS: u64 = u32::MAX as u64;

/// Constant term of the linear factor `L`.
pub const CHUDNOVSKY_L0: u64 = 13_591_409;

/// Increment of `L` per term.
pub const CHUDNOVSKY_L_STEP: u64 = 545_140_134;

/// Ratio between consecutive `X` values: `-640320^3`.
pub const CHUDNOVSKY_X_STEP: i64 = -262_537_412_640_768_000;

/// Initial value of `K`.
pub const CHUDNOVSKY_K0: u64 = 6;

/// Increment of `K` per term.
pub const CHUDNOVSKY_K_STEP: u64 = 12;

/// Integer factor of the prefactor `C = 426880 * sqrt(10005)`.
pub const CHUDNOVSKY_C_FACTOR: u64 = 426_880;

/// Radicand of the prefactor `C = 426880 * sqrt(10005)`.
pub const CHUDNOVSKY_C_RADICAND: u64 = 10_005;

/// Number of terms between two abort-token polls inside the series loop.
pub const ABORT_POLL_INTERVAL: u64 = 64;

/// Numerator of the score formula.
pub const SCORE_SCALE: f64 = 10_000.0;

/// Offset added to the elapsed seconds before dividing.
pub const SCORE_OFFSET: f64 = 1.0;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error (arithmetic or worker failure).
    pub const ERROR_GENERIC: i32 = 1;
    /// The multi-core run exceeded its deadline.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// CPU detection failed.
    pub const ERROR_ENVIRONMENT: i32 = 5;
    /// Computation aborted.
    pub const ERROR_CANCELED: i32 = 130;
}
