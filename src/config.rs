use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::check::coordinator::{ResolveOptions, ResultOrder};
use crate::version::registries::DEFAULT_PYPI_URL;

// =============================================================================
// Defaults
// =============================================================================

/// Manifest read when no path is given
pub const DEFAULT_MANIFEST_PATH: &str = "./requirements.txt";

/// Timeout for a single registry lookup in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Lookups allowed in flight at once
pub const DEFAULT_MAX_CONCURRENT: usize = 16;

/// Environment variable holding the tracing filter (e.g. `pin_drift=debug`)
pub const LOG_ENV_VAR: &str = "PIN_DRIFT_LOG";

/// Errors raised while loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckConfig {
    pub registry: RegistryConfig,
    pub report: ReportConfig,
    pub log: LogConfig,
}

/// Registry access configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    /// Base URL; package URLs are `<url><name>/json`
    pub url: String,
    /// Per-lookup deadline in milliseconds
    pub timeout_ms: u64,
    /// Lookups in flight at once; `0` disables the limit
    pub max_concurrent: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PYPI_URL.to_string(),
            timeout_ms: FETCH_TIMEOUT_MS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportConfig {
    pub major_only: bool,
    pub order: ResultOrder,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    /// Write logs to this file instead of stderr
    pub file: Option<PathBuf>,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl CheckConfig {
    /// Load configuration from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            max_concurrent: self.registry.max_concurrent,
            timeout: Duration::from_millis(self.registry.timeout_ms),
            order: self.report.order,
        }
    }
}

/// Returns the path to the data directory for pin-drift.
/// Uses $XDG_DATA_HOME/pin-drift if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/pin-drift,
/// or ./pin-drift if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the default path of the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("pin-drift.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("pin-drift")
}
