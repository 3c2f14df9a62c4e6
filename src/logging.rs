//! Tracing subscriber setup

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::{LOG_ENV_VAR, LogConfig};

/// Filter used when `PIN_DRIFT_LOG` is unset or invalid
fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("pin_drift=debug")
    } else {
        EnvFilter::new("warn")
    }
}

fn open_log_file(path: &Path) -> io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Color codes only make sense on an interactive stderr
fn use_ansi(config: &LogConfig, stderr_is_terminal: bool) -> bool {
    config.file.is_none() && !config.json && stderr_is_terminal
}

/// Initialize the global tracing subscriber.
///
/// Logs go to stderr, or to `config.file` through a non-blocking writer; keep
/// the returned guard alive until exit so buffered lines are flushed. Calling
/// this more than once leaves the first subscriber in place.
pub fn init_logging(config: &LogConfig, verbose: bool) -> io::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| default_filter(verbose));

    let ansi = use_ansi(config, io::stderr().is_terminal());
    let (writer, guard) = match &config.file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(io::stderr), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);

    let _ = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    Ok(guard)
}
