//! Benchmark orchestration: single-core and multi-core runs.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use pibench_core::constants::{MAX_TERMS, PI_PRECISION};
use pibench_core::decimal::{Decimal, Precision};
use pibench_core::error::BenchError;
use pibench_core::observer::{NoOpObserver, ProgressObserver};
use pibench_core::progress::{AbortToken, ProgressUpdate};
use pibench_core::score::calculate_score;
use pibench_core::series::{combine, evaluate_range, pi_from_sum};

use crate::cpu::CpuProbe;
use crate::interfaces::{BenchmarkReport, BenchmarkResult};
use crate::scheduler::{partition, run_chunks, SchedulerOptions};
use crate::stats::RunStatistics;

/// Default upper bound on one benchmark run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Benchmark mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// The whole term range in one worker.
    SingleCore,
    /// One chunk per detected core.
    MultiCore,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleCore => f.write_str("single-core"),
            Self::MultiCore => f.write_str("multi-core"),
        }
    }
}

/// Parameters of a benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of series terms.
    pub terms: u64,
    /// Target decimal digits; the working precision adds guard digits.
    pub target_digits: u32,
    /// Worker count override (auto-detected when `None`).
    pub workers: Option<usize>,
    /// Deadline for one run.
    pub timeout: Option<Duration>,
    /// Pin multi-core workers to cores.
    pub pin_workers: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            terms: PI_PRECISION,
            target_digits: u32::try_from(PI_PRECISION).unwrap_or(u32::MAX),
            workers: None,
            timeout: Some(DEFAULT_TIMEOUT),
            pin_workers: false,
        }
    }
}

impl BenchmarkConfig {
    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.terms == 0 {
            return Err(BenchError::Config("term count must be positive".into()));
        }
        if self.terms > MAX_TERMS {
            return Err(BenchError::Config(format!(
                "term count {} exceeds {MAX_TERMS}",
                self.terms
            )));
        }
        if self.workers == Some(0) {
            return Err(BenchError::Config("worker count must be positive".into()));
        }
        Ok(())
    }
}

/// Pi benchmark over a fixed configuration and CPU probe.
///
/// Every call builds its own precision context, series states and pool;
/// nothing carries over between calls.
pub struct CoreBenchmark {
    config: BenchmarkConfig,
    probe: Arc<dyn CpuProbe>,
}

impl CoreBenchmark {
    /// Create a benchmark after validating `config`.
    pub fn new(config: BenchmarkConfig, probe: Arc<dyn CpuProbe>) -> Result<Self, BenchError> {
        config.validate()?;
        Ok(Self { config, probe })
    }

    #[must_use]
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// CPU model name from the probe.
    #[must_use]
    pub fn cpu_name(&self) -> String {
        self.probe.cpu_name()
    }

    /// Worker count for multi-core runs: the override, else the probe.
    pub fn workers(&self) -> Result<usize, BenchError> {
        let workers = match self.config.workers {
            Some(n) => n,
            None => self.probe.core_count()?,
        };
        if workers == 0 {
            return Err(BenchError::Environment("core count is zero".into()));
        }
        Ok(workers)
    }

    /// Single-core benchmark returning a score or the elapsed seconds.
    pub fn benchmark(&self, score_result: bool) -> Result<BenchmarkResult, BenchError> {
        Ok(self.run(Mode::SingleCore)?.result(score_result))
    }

    /// Multi-core benchmark returning a score or the elapsed seconds.
    pub fn benchmark_all_cores(&self, score_result: bool) -> Result<BenchmarkResult, BenchError> {
        Ok(self.run(Mode::MultiCore)?.result(score_result))
    }

    /// Run one mode and return the full report.
    pub fn run(&self, mode: Mode) -> Result<BenchmarkReport, BenchError> {
        self.run_with_observer(mode, &NoOpObserver)
    }

    /// Run one mode, reporting chunk progress to `observer`.
    pub fn run_with_observer(
        &self,
        mode: Mode,
        observer: &dyn ProgressObserver,
    ) -> Result<BenchmarkReport, BenchError> {
        let report = match mode {
            Mode::SingleCore => self.run_single(observer)?,
            Mode::MultiCore => self.run_multi(observer)?,
        };
        info!(
            mode = %report.mode,
            workers = report.workers,
            terms = report.terms,
            elapsed_ms = report.elapsed.as_millis(),
            score = report.score,
            "Benchmark complete"
        );
        Ok(report)
    }

    /// Run one mode `runs` times and summarize.
    pub fn run_repeated(
        &self,
        mode: Mode,
        runs: usize,
        observer: &dyn ProgressObserver,
    ) -> Result<RunStatistics, BenchError> {
        if runs == 0 {
            return Err(BenchError::Config("run count must be positive".into()));
        }
        let reports = (0..runs)
            .map(|run| {
                debug!(run, %mode, "Starting run");
                self.run_with_observer(mode, observer)
            })
            .collect::<Result<Vec<_>, _>>()?;
        RunStatistics::from_reports(&reports)
            .ok_or_else(|| BenchError::Config("no runs recorded".into()))
    }

    fn run_single(&self, observer: &dyn ProgressObserver) -> Result<BenchmarkReport, BenchError> {
        let range = 0..self.config.terms;
        let start = Instant::now();

        let precision = Precision::working(self.config.target_digits);
        let abort = self.abort_token();
        observer.on_progress(&ProgressUpdate::started(0, range.clone()));
        let partial = evaluate_range(&precision, range.clone(), &abort)?;
        observer.on_progress(&ProgressUpdate::done(0, range));
        let pi = pi_from_sum(&precision, &partial.sum)?;

        Ok(self.report(Mode::SingleCore, 1, start.elapsed(), &precision, pi))
    }

    fn run_multi(&self, observer: &dyn ProgressObserver) -> Result<BenchmarkReport, BenchError> {
        let workers = self.workers()?;
        let chunks = partition(self.config.terms, workers)?;
        let opts = SchedulerOptions {
            timeout: self.config.timeout,
            pin_workers: self.config.pin_workers,
        };
        let start = Instant::now();

        let precision = Precision::working(self.config.target_digits);
        let partials = run_chunks(&precision, &chunks, &opts, observer)?;
        let total = combine(&precision, &partials)?;
        let pi = pi_from_sum(&precision, &total)?;

        Ok(self.report(Mode::MultiCore, workers, start.elapsed(), &precision, pi))
    }

    fn abort_token(&self) -> AbortToken {
        self.config
            .timeout
            .map_or_else(AbortToken::new, AbortToken::with_timeout)
    }

    fn report(
        &self,
        mode: Mode,
        workers: usize,
        elapsed: Duration,
        precision: &Precision,
        pi: Decimal,
    ) -> BenchmarkReport {
        BenchmarkReport {
            mode,
            workers,
            terms: self.config.terms,
            digits: precision.digits(),
            elapsed,
            score: calculate_score(elapsed),
            pi,
        }
    }
}
