//! Orchestration interfaces: measurement records and presentation traits.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use pibench_core::decimal::Decimal;

use crate::orchestrator::Mode;
use crate::stats::RunStatistics;

/// The caller-selected output of one benchmark call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkResult {
    /// Elapsed wall-clock seconds.
    Elapsed(f64),
    /// Score derived from the elapsed time.
    Score(u64),
}

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elapsed(secs) => write!(f, "{secs:.3}s"),
            Self::Score(score) => write!(f, "{score}"),
        }
    }
}

/// Full measurement of one benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    /// Single-core or multi-core.
    pub mode: Mode,
    /// Number of workers that evaluated the series.
    pub workers: usize,
    /// Number of series terms.
    pub terms: u64,
    /// Working precision in decimal digits.
    pub digits: u32,
    /// Wall-clock time of evaluation, combination and the final division.
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// Score for `elapsed`.
    pub score: u64,
    /// The computed value of pi.
    #[serde(skip)]
    pub pi: Decimal,
}

impl BenchmarkReport {
    /// Project the report onto the requested output shape.
    #[must_use]
    pub fn result(&self, score_result: bool) -> BenchmarkResult {
        if score_result {
            BenchmarkResult::Score(self.score)
        } else {
            BenchmarkResult::Elapsed(self.elapsed.as_secs_f64())
        }
    }

    /// `pi` truncated to `decimals` digits after the point.
    #[must_use]
    pub fn pi_prefix(&self, decimals: usize) -> String {
        let text = self.pi.to_string();
        match text.find('.') {
            Some(point) => text.chars().take(point + 1 + decimals).collect(),
            None => text,
        }
    }
}

fn serialize_secs<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}

/// Trait for presenting benchmark results to the user.
pub trait ResultPresenter: Send + Sync {
    /// Present the detected hardware.
    fn present_system(&self, cpu_name: &str, cores: usize);

    /// Present one run.
    fn present_report(&self, report: &BenchmarkReport, score_result: bool);

    /// Present the summary of repeated runs.
    fn present_statistics(&self, stats: &RunStatistics, score_result: bool);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// Presenter that discards everything.
pub struct NullPresenter;

impl ResultPresenter for NullPresenter {
    fn present_system(&self, _cpu_name: &str, _cores: usize) {}
    fn present_report(&self, _report: &BenchmarkReport, _score_result: bool) {}
    fn present_statistics(&self, _stats: &RunStatistics, _score_result: bool) {}
    fn present_error(&self, _error: &str) {}
}
