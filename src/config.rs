use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::registry::resolver::ResolveBudget;

// =============================================================================
// Resolver limits
// =============================================================================

/// Default maximum number of package visits per installability query
pub const DEFAULT_MAX_STEPS: u64 = 100_000;

/// Default wall-clock limit per installability query in milliseconds (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Dependency names hidden from package detail views by default
pub const DEFAULT_HIDDEN_DEPENDENCIES: &[&str] = &["/bin/sh"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Index configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexConfig {
    pub resolver: ResolverConfig,
    pub listing: ListingConfig,
}

/// Installability resolver configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Maximum package visits per query, `null` for no limit
    pub max_steps: Option<u64>,
    /// Wall-clock limit per query in milliseconds, `null` for no limit
    pub timeout_ms: Option<u64>,
    /// Cache answers for packages outside dependency cycles
    pub memoize: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_steps: Some(DEFAULT_MAX_STEPS),
            timeout_ms: Some(DEFAULT_TIMEOUT_MS),
            memoize: false,
        }
    }
}

impl ResolverConfig {
    pub fn budget(&self) -> ResolveBudget {
        ResolveBudget {
            max_steps: self.max_steps,
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Listing and detail view configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingConfig {
    pub hidden_dependencies: Vec<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            hidden_dependencies: DEFAULT_HIDDEN_DEPENDENCIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl IndexConfig {
    /// Read configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Read configuration from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

/// Returns the path to the data directory for vellum-index.
/// Uses $XDG_DATA_HOME/vellum-index if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/vellum-index,
/// or ./vellum-index if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("vellum-index.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("vellum-index")
}
