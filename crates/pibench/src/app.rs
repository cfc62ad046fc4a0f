//! Application entry point and dispatch.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use pibench_cli::presenter::CLIResultPresenter;
use pibench_cli::progress::ChunkProgressBar;
use pibench_core::error::BenchError;
use pibench_orchestration::cpu::SystemProbe;
use pibench_orchestration::interfaces::{BenchmarkReport, ResultPresenter};
use pibench_orchestration::orchestrator::{BenchmarkConfig, CoreBenchmark, Mode};
use pibench_orchestration::stats::RunStatistics;

use crate::config::AppConfig;
use crate::version::full_version;

enum Outcome {
    Single(BenchmarkReport),
    Repeated(RunStatistics),
}

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        pibench_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(());
    }

    let presenter = CLIResultPresenter::new(config.verbose, config.quiet)
        .with_json(config.json)
        .with_pi_digits(config.digits);

    run_benchmarks(config, &presenter).map_err(|err| {
        presenter.present_error(&err.to_string());
        anyhow::Error::new(err)
    })
}

fn run_benchmarks(config: &AppConfig, presenter: &CLIResultPresenter) -> Result<(), BenchError> {
    if config.runs == 0 {
        return Err(BenchError::Config("run count must be positive".into()));
    }
    let bench_config = BenchmarkConfig {
        workers: config.workers,
        timeout: config.timeout_duration()?,
        pin_workers: config.pin,
        ..BenchmarkConfig::default()
    };
    let bench = CoreBenchmark::new(bench_config, Arc::new(SystemProbe))?;
    let modes = config.mode.modes();
    debug!(version = %full_version(), ?modes, runs = config.runs, "Starting");

    let cores = if modes.contains(&Mode::MultiCore) {
        bench.workers()?
    } else {
        bench.workers().unwrap_or(1)
    };
    presenter.present_system(&bench.cpu_name(), cores);

    let score_result = !config.time;
    for &mode in modes {
        let chunks = match mode {
            Mode::SingleCore => 1,
            Mode::MultiCore => cores,
        };
        let progress = if presenter.is_interactive() {
            let total = u64::try_from(chunks.saturating_mul(config.runs)).unwrap_or(u64::MAX);
            ChunkProgressBar::new(total, &mode.to_string())
        } else {
            ChunkProgressBar::hidden()
        };

        let outcome = if config.runs == 1 {
            bench.run_with_observer(mode, &progress).map(Outcome::Single)
        } else {
            bench
                .run_repeated(mode, config.runs, &progress)
                .map(Outcome::Repeated)
        };
        progress.finish();

        match outcome? {
            Outcome::Single(report) => presenter.present_report(&report, score_result),
            Outcome::Repeated(stats) => presenter.present_statistics(&stats, score_result),
        }
    }
    Ok(())
}
