//! Error handling and exit codes.

use pibench_core::constants::exit_codes;
use pibench_core::error::BenchError;

/// Map a benchmark error to its process exit code.
pub fn exit_code(err: &BenchError) -> i32 {
    match err {
        BenchError::Arithmetic(_) | BenchError::Worker { .. } => exit_codes::ERROR_GENERIC,
        BenchError::Timeout(_) => exit_codes::ERROR_TIMEOUT,
        BenchError::Cancelled => exit_codes::ERROR_CANCELED,
        BenchError::Environment(_) => exit_codes::ERROR_ENVIRONMENT,
        BenchError::Config(_) => exit_codes::ERROR_CONFIG,
    }
}

/// Exit code for an application error; non-benchmark errors are generic.
pub fn process_exit_code(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<BenchError>()
        .map_or(exit_codes::ERROR_GENERIC, exit_code);
    u8::try_from(code).unwrap_or(1)
}
