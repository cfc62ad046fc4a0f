//! Log filter setup for the binary.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Build the stderr log filter.
///
/// `directives` (normally `RUST_LOG`) take precedence; without any, the
/// level is `debug` under `--verbose` and `warn` otherwise.
#[must_use]
pub fn env_filter(verbose: bool, directives: &str) -> EnvFilter {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}

/// Install the global subscriber, reading `RUST_LOG` from the environment.
pub fn init(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(verbose, &directives))
        .init();
}
