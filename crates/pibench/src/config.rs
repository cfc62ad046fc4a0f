//! Application configuration from CLI flags and environment.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use pibench_core::error::BenchError;
use pibench_orchestration::orchestrator::Mode;

/// Which benchmarks to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeSelection {
    /// Single-core only.
    Single,
    /// Multi-core only.
    Multi,
    /// Single-core, then multi-core.
    Both,
}

impl ModeSelection {
    /// Modes to run, in order.
    #[must_use]
    pub fn modes(self) -> &'static [Mode] {
        match self {
            Self::Single => &[Mode::SingleCore],
            Self::Multi => &[Mode::MultiCore],
            Self::Both => &[Mode::SingleCore, Mode::MultiCore],
        }
    }
}

/// PiBench: times 10,000 terms of the Chudnovsky pi series on one core and on all cores.
#[derive(Parser, Debug)]
#[command(name = "pibench", version, about)]
pub struct AppConfig {
    /// Benchmarks to run.
    #[arg(short, long, value_enum, default_value = "both", env = "PIBENCH_MODE")]
    pub mode: ModeSelection,

    /// Report elapsed seconds instead of a score.
    #[arg(short, long)]
    pub time: bool,

    /// Worker count for the multi-core run (defaults to the detected cores).
    #[arg(short, long, env = "PIBENCH_WORKERS")]
    pub workers: Option<usize>,

    /// Repeat each benchmark and report the median.
    #[arg(short, long, default_value = "1")]
    pub runs: usize,

    /// Timeout per run (e.g. "30s", "5m", "0" for none).
    #[arg(long, default_value = "5m", env = "PIBENCH_TIMEOUT")]
    pub timeout: String,

    /// Pin multi-core workers to CPU cores.
    #[arg(long)]
    pub pin: bool,

    /// Print the first N decimals of the computed pi.
    #[arg(short, long, default_value = "0")]
    pub digits: usize,

    /// Emit one JSON document per line.
    #[arg(long)]
    pub json: bool,

    /// Quiet mode (only output the numbers).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// The per-run timeout; `None` when disabled with "0".
    pub fn timeout_duration(&self) -> Result<Option<Duration>, BenchError> {
        let timeout = parse_duration(&self.timeout)
            .ok_or_else(|| BenchError::Config(format!("invalid timeout: {:?}", self.timeout)))?;
        Ok((!timeout.is_zero()).then_some(timeout))
    }
}

/// Parse a duration string like "5m", "1h", "30s", "250ms".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        Some(Duration::from_millis(ms.parse().ok()?))
    } else if let Some(secs) = s.strip_suffix('s') {
        Some(Duration::from_secs(secs.parse().ok()?))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(3600)?))
    } else {
        Some(Duration::from_secs(s.parse().ok()?))
    }
}
