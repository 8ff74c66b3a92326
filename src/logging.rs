//! Logging bootstrap
//!
//! The TUI owns the terminal, so diagnostics go to a log file in the config
//! directory. `init` installs the global subscriber once; later calls return
//! the existing handle.

use crate::error::{QueueError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const ENV_FILTER_VARS: [&str; 2] = ["PRINT_QUEUE_LOG", "RUST_LOG"];

static LOG_HANDLE: OnceLock<LogHandle> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub directory: PathBuf,
    pub file_name: String,
    /// Filter directive such as `print_queue=debug`; falls back to the environment, then `info`
    pub env_filter: Option<String>,
}

impl LogConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            file_name: "print-queue.log".to_string(),
            env_filter: None,
        }
    }
}

/// Keeps the background writer alive for the life of the process
#[derive(Debug)]
pub struct LogHandle {
    _guard: tracing_appender::non_blocking::WorkerGuard,
    path: PathBuf,
}

impl LogHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn init(config: LogConfig) -> Result<&'static LogHandle> {
    if let Some(handle) = LOG_HANDLE.get() {
        return Ok(handle);
    }

    let handle = setup(config)?;
    let _ = LOG_HANDLE.set(handle);
    LOG_HANDLE
        .get()
        .ok_or_else(|| QueueError::ConfigError("logger was not installed".to_string()))
}

fn setup(config: LogConfig) -> Result<LogHandle> {
    fs::create_dir_all(&config.directory)?;

    let appender = tracing_appender::rolling::never(&config.directory, &config.file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let directive = config
        .env_filter
        .or_else(|| ENV_FILTER_VARS.iter().find_map(|var| std::env::var(var).ok()))
        .filter(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| QueueError::ConfigError(format!("Invalid log filter '{}': {}", directive, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()
        .map_err(|e| QueueError::ConfigError(format!("Failed to install logger: {}", e)))?;

    Ok(LogHandle {
        _guard: guard,
        path: config.directory.join(&config.file_name),
    })
}
