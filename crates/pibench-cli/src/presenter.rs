//! CLI result presenter.

use serde::Serialize;

use pibench_orchestration::interfaces::{BenchmarkReport, BenchmarkResult, ResultPresenter};
use pibench_orchestration::stats::RunStatistics;

use crate::output::{format_duration, format_plain, format_result, format_score, format_secs};
use crate::ui::{print_error, print_field, print_header};

/// One JSON line per run.
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a BenchmarkReport,
    result: BenchmarkResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pi: Option<String>,
}

/// One JSON line per repeated-run summary.
#[derive(Serialize)]
struct JsonStatistics<'a> {
    #[serde(flatten)]
    stats: &'a RunStatistics,
    result: BenchmarkResult,
}

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
    json: bool,
    pi_digits: usize,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            json: false,
            pi_digits: 0,
        }
    }

    /// Emit JSON lines instead of text.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Show this many decimals of the computed pi.
    #[must_use]
    pub fn with_pi_digits(mut self, digits: usize) -> Self {
        self.pi_digits = digits;
        self
    }

    /// Whether interactive decorations (banner, progress bars) are wanted.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        !self.quiet && !self.json
    }

    fn emit_json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(line) => println!("{line}"),
            Err(err) => print_error(&format!("failed to encode JSON: {err}")),
        }
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_system(&self, cpu_name: &str, cores: usize) {
        if !self.is_interactive() {
            return;
        }
        print_header("Pi benchmark");
        print_field("CPU", cpu_name);
        print_field("Cores", &cores.to_string());
    }

    fn present_report(&self, report: &BenchmarkReport, score_result: bool) {
        let result = report.result(score_result);
        let pi = (self.pi_digits > 0).then(|| report.pi_prefix(self.pi_digits));

        if self.json {
            self.emit_json(&JsonReport {
                report,
                result,
                pi,
            });
            return;
        }
        if self.quiet {
            println!("{}", format_plain(&result));
            return;
        }

        let label = report.mode.to_string();
        print_field(&label, &format_result(&result));
        if self.verbose {
            print_field("Workers", &report.workers.to_string());
            print_field("Terms", &report.terms.to_string());
            print_field("Digits", &report.digits.to_string());
            print_field("Elapsed", &format_duration(report.elapsed));
            print_field("Score", &format_score(report.score));
        }
        if let Some(pi) = pi {
            print_field("Pi", &pi);
        }
    }

    fn present_statistics(&self, stats: &RunStatistics, score_result: bool) {
        let result = if score_result {
            BenchmarkResult::Score(stats.median_score)
        } else {
            BenchmarkResult::Elapsed(stats.median_secs)
        };

        if self.json {
            self.emit_json(&JsonStatistics { stats, result });
            return;
        }
        if self.quiet {
            println!("{}", format_plain(&result));
            return;
        }

        let label = stats.mode.to_string();
        print_field(
            &label,
            &format!("{} (median of {} runs)", format_result(&result), stats.runs),
        );
        print_field(
            "Range",
            &format!(
                "{} .. {}",
                format_secs(stats.min_secs),
                format_secs(stats.max_secs)
            ),
        );
        if self.verbose {
            print_field("Mean", &format_secs(stats.mean_secs));
            print_field("Workers", &stats.workers.to_string());
        }
    }

    fn present_error(&self, error: &str) {
        if self.json {
            match serde_json::to_string(&serde_json::json!({ "error": error })) {
                Ok(line) => eprintln!("{line}"),
                Err(_) => eprintln!("{error}"),
            }
        } else {
            print_error(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use pibench_core::decimal::Precision;
    use pibench_orchestration::orchestrator::Mode;

    fn report() -> BenchmarkReport {
        let precision = Precision::new(8);
        BenchmarkReport {
            mode: Mode::MultiCore,
            workers: 4,
            terms: 10_000,
            digits: 8,
            elapsed: Duration::from_secs(5),
            score: 1667,
            pi: precision
                .ratio(&355.into(), &113.into())
                .unwrap(),
        }
    }

    fn stats() -> RunStatistics {
        RunStatistics::from_reports(&[report(), report()]).unwrap()
    }

    #[test]
    fn builder_flags() {
        let presenter = CLIResultPresenter::new(true, false)
            .with_json(true)
            .with_pi_digits(10);
        assert!(presenter.verbose);
        assert!(presenter.json);
        assert_eq!(presenter.pi_digits, 10);
        assert!(!presenter.is_interactive());
        assert!(CLIResultPresenter::new(false, false).is_interactive());
        assert!(!CLIResultPresenter::new(false, true).is_interactive());
    }

    #[test]
    fn json_report_shape() {
        let report = report();
        let line = serde_json::to_value(JsonReport {
            report: &report,
            result: report.result(true),
            pi: Some(report.pi_prefix(4)),
        })
        .unwrap();
        assert_eq!(line["mode"], "multi_core");
        assert_eq!(line["workers"], 4);
        assert_eq!(line["score"], 1667);
        assert_eq!(line["result"]["score"], 1667);
        assert_eq!(line["pi"], "3.1415");
    }

    #[test]
    fn json_report_omits_pi_when_not_requested() {
        let report = report();
        let line = serde_json::to_value(JsonReport {
            report: &report,
            result: report.result(false),
            pi: None,
        })
        .unwrap();
        assert!(line.get("pi").is_none());
        assert_eq!(line["result"]["elapsed"], 5.0);
    }

    #[test]
    fn json_statistics_shape() {
        let stats = stats();
        let line = serde_json::to_value(JsonStatistics {
            stats: &stats,
            result: BenchmarkResult::Score(stats.median_score),
        })
        .unwrap();
        assert_eq!(line["runs"], 2);
        assert_eq!(line["median_secs"], 5.0);
        assert_eq!(line["result"]["score"], 1667);
    }

    #[test]
    fn every_mode_presents_without_panicking() {
        let report = report();
        let stats = stats();
        for presenter in [
            CLIResultPresenter::new(false, false),
            CLIResultPresenter::new(true, false).with_pi_digits(5),
            CLIResultPresenter::new(false, true),
            CLIResultPresenter::new(false, false).with_json(true),
        ] {
            presenter.present_system("Test CPU", 4);
            presenter.present_report(&report, true);
            presenter.present_report(&report, false);
            presenter.present_statistics(&stats, true);
            presenter.present_statistics(&stats, false);
            presenter.present_error("worker 2 failed");
        }
    }
}
