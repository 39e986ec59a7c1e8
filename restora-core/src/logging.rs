//! Logging setup for the Restora service.
//!
//! Built on the `tracing` ecosystem: a console layer plus an optional
//! non-blocking file layer with daily rotation. The file writer's
//! [`WorkerGuard`] is parked in a process-wide slot so buffered log lines
//! are flushed when the process exits.

use crate::config::LoggingConfig;
use crate::error::{CoreError, LoggingError};
use crate::utils;

use once_cell::sync::Lazy;
use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

static LOG_WORKER_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Initializes a minimal logging setup directed at `stderr`.
///
/// Intended for tests and for early startup before the configuration is
/// available. Filters by `RUST_LOG`, defaulting to "info". Errors (for
/// example, a subscriber that is already installed) are ignored.
pub fn init_minimal_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}

fn file_layer(
    log_path: &Path,
    format: &str,
) -> Result<(Box<dyn Layer<Registry> + Send + Sync + 'static>, WorkerGuard), CoreError> {
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            utils::fs::ensure_dir_exists(parent)?;
        }
    }

    let appender = tracing_appender::rolling::daily(
        log_path.parent().unwrap_or_else(|| Path::new(".")),
        log_path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("restora.log")),
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer: Box<dyn Layer<Registry> + Send + Sync + 'static> =
        match format.to_lowercase().as_str() {
            "json" => Box::new(fmt::layer().json().with_writer(writer).with_ansi(false)),
            _ => Box::new(fmt::layer().with_writer(writer).with_ansi(false)),
        };
    Ok((layer, guard))
}

/// Installs the global tracing subscriber described by `config`.
///
/// # Errors
///
/// Returns [`LoggingError::InitializationFailure`] when the level is not
/// recognized or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), CoreError> {
    let level = match config.level.to_lowercase().as_str() {
        level @ ("trace" | "debug" | "info" | "warn" | "error") => level.to_string(),
        invalid => {
            return Err(CoreError::Logging(LoggingError::InitializationFailure(
                format!("Invalid log level in config: {}", invalid),
            )));
        }
    };

    let stdout_layer: Box<dyn Layer<Registry> + Send + Sync + 'static> =
        match config.format.to_lowercase().as_str() {
            "json" => Box::new(
                fmt::layer()
                    .json()
                    .with_writer(stdout)
                    .with_ansi(false)
                    .with_filter(EnvFilter::new(level.clone())),
            ),
            _ => Box::new(
                fmt::layer()
                    .with_writer(stdout)
                    .with_ansi(atty::is(atty::Stream::Stdout))
                    .with_filter(EnvFilter::new(level.clone())),
            ),
        };

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync + 'static>> = vec![stdout_layer];

    let mut new_guard: Option<WorkerGuard> = None;
    if let Some(log_path) = &config.file_path {
        let (layer, guard) = file_layer(log_path, &config.format)?;
        layers.push(Box::new(layer.with_filter(EnvFilter::new(level))));
        new_guard = Some(guard);
    }

    let result = Registry::default().with(layers).try_init();

    if let Ok(mut slot) = LOG_WORKER_GUARD.lock() {
        *slot = new_guard;
    }

    result.map_err(|e| {
        CoreError::Logging(LoggingError::InitializationFailure(format!(
            "Failed to set global tracing subscriber. Was it already initialized? Error: {}",
            e
        )))
    })
}
