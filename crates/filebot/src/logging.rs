//! Log setup for the binary.

use crate::LoggingConfig;
use filebot_error::{ConfigError, FilebotResult};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// In debug mode (`verbose`, or a non-empty `DEBUG` environment variable)
/// events go to stderr at debug level. Otherwise they are appended to
/// `config.file` without ANSI colors, filtered by `RUST_LOG` or
/// `config.level`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the log file cannot be opened, the filter does
/// not parse, or a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> FilebotResult<()> {
    let debug_mode = verbose || std::env::var_os("DEBUG").is_some_and(|v| !v.is_empty());

    if debug_mode {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| ConfigError::new(format!("Failed to install logger: {}", e)))?;
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|e| {
            ConfigError::new(format!(
                "Failed to open log file {}: {}",
                config.file.display(),
                e
            ))
        })?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            ConfigError::new(format!("Invalid log level '{}': {}", config.level, e))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install logger: {}", e)))?;
    Ok(())
}
