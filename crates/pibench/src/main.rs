//! PiBench: CPU benchmark built on the Chudnovsky pi series.

use std::process::ExitCode;

use pibench_lib::{app, config, errors, logging};

fn main() -> ExitCode {
    let config = config::AppConfig::parse();

    logging::init(config.verbose);

    match app::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(errors::process_exit_code(&err)),
    }
}
