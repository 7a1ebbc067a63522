use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read registry document {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid registry document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resolution stopped before an answer was reached
///
/// Distinct from "not installable": the answer is undetermined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Resolution budget exhausted after {steps} steps")]
    BudgetExhausted { steps: u64 },

    #[error("Resolution timed out after {elapsed:?}")]
    TimedOut { elapsed: Duration },
}
