use crate::error::PromptDeckError;
use std::path::Path;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Log file written inside the configured log directory
pub const LOG_FILE_NAME: &str = "promptdeck.log";

/// Build the level filter; `RUST_LOG` takes precedence over `log_level`
fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// Initialize logging to console and `<log_dir>/promptdeck.log`
///
/// # Arguments
/// * `log_dir` - Directory where the log file is appended to
/// * `log_level` - Log level or filter directive (e.g. `info`, `promptdeck_server=debug`)
pub fn setup_logging(log_dir: &Path, log_level: &str) -> Result<(), PromptDeckError> {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir).map_err(|e| {
            PromptDeckError::config(format!(
                "Failed to create log directory {}: {}",
                log_dir.display(),
                e
            ))
        })?;
    }

    let log_file_path = log_dir.join(LOG_FILE_NAME);
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .map_err(|e| {
            PromptDeckError::config(format!(
                "Failed to open log file {}: {}",
                log_file_path.display(),
                e
            ))
        })?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(env_filter(log_level));

    // No ANSI color codes in the file
    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(env_filter(log_level));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| PromptDeckError::config(format!("Failed to install logger: {}", e)))?;

    tracing::info!("Logging initialized: level={}, log_file={}", log_level, log_file_path.display());

    Ok(())
}

/// Console-only logging to stderr
///
/// For CLI subcommands whose stdout is the command's output
pub fn setup_console_logging(log_level: &str) -> Result<(), PromptDeckError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(env_filter(log_level))
        .try_init()
        .map_err(|e| PromptDeckError::config(format!("Failed to install logger: {}", e)))?;

    tracing::debug!("Console logging initialized: level={}", log_level);

    Ok(())
}
