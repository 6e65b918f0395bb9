//! Tracing subscriber setup
//!
//! Human-readable events go to stderr, filtered by `GOBREW_LOG`. The same
//! events are appended as JSON lines to the log file in the install directory.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "GOBREW_LOG";

const DEFAULT_LEVEL: &str = "warn";
const VERBOSE_LEVEL: &str = "debug";

/// Filter used when `GOBREW_LOG` is unset or invalid
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { VERBOSE_LEVEL } else { DEFAULT_LEVEL }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held until
/// exit. No file layer is installed when `log_path` cannot be created.
pub fn init(log_path: &Path, verbose: bool) -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter(verbose));

    let file = log_path
        .parent()
        .zip(log_path.file_name())
        .filter(|(dir, _)| fs::create_dir_all(dir).is_ok())
        .map(|(dir, name)| tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name)));

    match file {
        Some((writer, guard)) => {
            let file_layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(env_filter(verbose));
            let _ = tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
            None
        }
    }
}
