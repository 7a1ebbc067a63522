//! Tracing subscriber setup for the `vellum-index` binary
//!
//! Logs go to a file under the data directory so stdout stays reserved for
//! command output. If the file cannot be opened, logs go to stderr instead.

use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber
///
/// Keep the returned guard alive until exit, or buffered lines are lost.
pub fn init(log_path: &Path, json: bool) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Some(parent) = log_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Failed to create log directory {:?}: {}", parent, e);
        }
    }

    match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let builder = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(non_blocking);
            if json {
                builder.json().init();
            } else {
                builder.init();
            }
            tracing::info!(path = %log_path.display(), "logging initialized");
            Some(guard)
        }
        Err(e) => {
            let builder = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr);
            if json {
                builder.json().init();
            } else {
                builder.init();
            }
            tracing::warn!(error = %e, "failed to open log file; using stderr");
            None
        }
    }
}
