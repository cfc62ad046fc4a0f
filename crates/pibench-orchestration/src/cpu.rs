//! CPU capability interface.
//!
//! Core logic only sees [`CpuProbe`]; platform details stay behind
//! `std::thread::available_parallelism` and `sysinfo`.

use pibench_core::error::BenchError;

/// Name reported when the CPU brand string is unavailable.
pub const UNKNOWN_CPU: &str = "Unknown CPU";

/// Source of hardware information for a benchmark run.
pub trait CpuProbe: Send + Sync {
    /// Number of parallel execution units. Never returns zero on success.
    fn core_count(&self) -> Result<usize, BenchError>;

    /// Human-readable CPU model name.
    fn cpu_name(&self) -> String;
}

/// Probe backed by the running system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl CpuProbe for SystemProbe {
    fn core_count(&self) -> Result<usize, BenchError> {
        std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .map_err(|e| BenchError::Environment(format!("cannot detect core count: {e}")))
    }

    fn cpu_name(&self) -> String {
        use sysinfo::System;
        let sys = System::new_all();
        sys.cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| UNKNOWN_CPU.to_string())
    }
}

/// Probe returning fixed values, for overrides and tests.
///
/// A core count of zero acts as the failure sentinel.
#[derive(Debug, Clone)]
pub struct FixedProbe {
    cores: usize,
    name: String,
}

impl FixedProbe {
    #[must_use]
    pub fn new(cores: usize, name: impl Into<String>) -> Self {
        Self {
            cores,
            name: name.into(),
        }
    }
}

impl CpuProbe for FixedProbe {
    fn core_count(&self) -> Result<usize, BenchError> {
        if self.cores == 0 {
            return Err(BenchError::Environment("core count is zero".into()));
        }
        Ok(self.cores)
    }

    fn cpu_name(&self) -> String {
        self.name.clone()
    }
}
