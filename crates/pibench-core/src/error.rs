//! Error types for arithmetic, series evaluation, and benchmark runs.

/// Failure inside the fixed-precision arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    /// The divisor was zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Square root of a negative value.
    #[error("square root of a negative value")]
    NegativeSqrt,

    /// Operands were produced by contexts of different precision.
    #[error("precision mismatch: {left} vs {right} digits")]
    PrecisionMismatch {
        /// Digits of the left operand.
        left: u32,
        /// Digits of the right operand.
        right: u32,
    },

    /// A term index does not fit the exponent range.
    #[error("term index {0} is out of range")]
    IndexOutOfRange(u64),
}

/// Error type for benchmark runs.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BenchError {
    /// Arithmetic failure during series evaluation.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    /// A worker failed while evaluating its chunk.
    #[error("worker {chunk} failed: {reason}")]
    Worker {
        /// Index of the failing chunk.
        chunk: usize,
        /// Description of the failure.
        reason: String,
    },

    /// The multi-core run did not finish before its deadline.
    #[error("benchmark timed out after {0}")]
    Timeout(String),

    /// Evaluation was aborted because a sibling worker failed.
    #[error("evaluation aborted")]
    Cancelled,

    /// CPU detection returned an unusable value.
    #[error("environment query failed: {0}")]
    Environment(String),

    /// Invalid benchmark configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
