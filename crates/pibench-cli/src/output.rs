//! CLI output formatting.

use std::time::Duration;

use pibench_orchestration::interfaces::BenchmarkResult;

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format seconds given as a float, as stored in statistics.
#[must_use]
pub fn format_secs(secs: f64) -> String {
    Duration::try_from_secs_f64(secs).map_or_else(|_| "n/a".to_string(), format_duration)
}

/// Format a score with thousand separators.
#[must_use]
pub fn format_score(score: u64) -> String {
    let digits = score.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Human-readable rendering of a benchmark result.
#[must_use]
pub fn format_result(result: &BenchmarkResult) -> String {
    match result {
        BenchmarkResult::Score(score) => format!("score {}", format_score(*score)),
        BenchmarkResult::Elapsed(secs) => format_secs(*secs),
    }
}

/// Bare value for quiet mode: the integer score or seconds.
#[must_use]
pub fn format_plain(result: &BenchmarkResult) -> String {
    match result {
        BenchmarkResult::Score(score) => score.to_string(),
        BenchmarkResult::Elapsed(secs) => format!("{secs:.6}"),
    }
}
