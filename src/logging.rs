//! Logging setup
//!
//! Library code only emits `tracing` events; binaries decide where they go.

use std::path::Path;

use anyhow::{anyhow, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "safetybot_gate=info";

/// Log file prefix for the rolling appender
const LOG_FILE_PREFIX: &str = "safetybot-gate.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize stderr logging, filtered by `RUST_LOG`
pub fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

/// Initialize logging to stderr and a daily rolling file in `dir`
///
/// Keep the returned guard alive for the lifetime of the program, or
/// buffered lines are lost.
pub fn init_file_logging(dir: impl AsRef<Path>) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir.as_ref())?;
    let appender = tracing_appender::rolling::daily(dir.as_ref(), LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr.and(file_writer))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logging_writes_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        let guard = init_file_logging(&log_dir).unwrap();
        tracing::info!("Gate decision log opened");
        drop(guard);

        let files: Vec<_> = std::fs::read_dir(&log_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(files.iter().any(|f| f.starts_with(LOG_FILE_PREFIX)));

        // Only one global subscriber per process
        assert!(init_logging().is_err());
    }
}
