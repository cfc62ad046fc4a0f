//! Summary statistics over repeated benchmark runs.

use std::time::Duration;

use serde::Serialize;

use pibench_core::score::calculate_score;

use crate::interfaces::BenchmarkReport;
use crate::orchestrator::Mode;

/// Summary of several runs of the same mode.
#[derive(Debug, Clone, Serialize)]
pub struct RunStatistics {
    pub mode: Mode,
    pub runs: usize,
    pub workers: usize,
    pub min_secs: f64,
    pub max_secs: f64,
    pub mean_secs: f64,
    pub median_secs: f64,
    /// Score of the median run time.
    pub median_score: u64,
}

impl RunStatistics {
    /// Summarize `reports`; `None` when empty.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_reports(reports: &[BenchmarkReport]) -> Option<Self> {
        let first = reports.first()?;
        let mut durations: Vec<Duration> = reports.iter().map(|r| r.elapsed).collect();
        durations.sort();

        let min = durations[0];
        let max = durations[durations.len() - 1];
        let median = if durations.len() % 2 == 1 {
            durations[durations.len() / 2]
        } else {
            let mid = durations.len() / 2;
            (durations[mid - 1] + durations[mid]) / 2
        };
        let total: Duration = durations.iter().sum();
        let mean = total / durations.len() as u32;

        Some(Self {
            mode: first.mode,
            runs: reports.len(),
            workers: first.workers,
            min_secs: min.as_secs_f64(),
            max_secs: max.as_secs_f64(),
            mean_secs: mean.as_secs_f64(),
            median_secs: median.as_secs_f64(),
            median_score: calculate_score(median),
        })
    }
}
