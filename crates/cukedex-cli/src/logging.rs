//! Structured logging for the command line.
//!
//! Logs go to stderr so reports written to stdout stay clean.

use cukedex::LogLevel;
use tracing_subscriber::EnvFilter;

fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::new(level.as_filter_str())
}

/// Install the global subscriber at `level`.
///
/// A subscriber that is already installed wins; later calls are ignored.
pub(crate) fn init_logging(level: LogLevel) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
