//! Logging configuration using tracing
//!
//! The terminal UI owns the screen and headless mode owns stdout (NDJSON), so
//! log output never goes to stdout. The TUI writes to a daily rolling file;
//! headless mode may write to stderr instead so test harnesses can capture it.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable holding the `EnvFilter` directive
pub const LOG_ENV_VAR: &str = "MEDQUEUE_LOG";

const DEFAULT_DIRECTIVE: &str = "medqueue=info,warn";
const LOG_FILE_NAME: &str = "medqueue.log";

/// Where log records are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    /// Daily rolling file under the data directory (TUI mode)
    File,
    /// Standard error without ANSI colours (headless mode)
    Stderr,
}

/// Initialize the logging subsystem
///
/// Log level is controlled by the `MEDQUEUE_LOG` environment variable.
///
/// # Examples
/// ```bash
/// MEDQUEUE_LOG=debug medqueue
/// MEDQUEUE_LOG=medqueue_app=trace medqueue --headless
/// ```
pub fn init(sink: LogSink) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let timer = fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string());

    match sink {
        LogSink::File => {
            let log_dir = get_log_directory()?;
            std::fs::create_dir_all(&log_dir)?;
            let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(file_appender)
                        .with_ansi(false)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_timer(timer),
                )
                .init();

            tracing::info!("medqueue starting, logging to {}", log_dir.display());
        }
        LogSink::Stderr => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(false)
                        .with_target(true)
                        .with_timer(timer),
                )
                .init();

            tracing::info!("medqueue starting, logging to stderr");
        }
    }

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("medqueue").join("logs"))
}

/// Get the log file path for the current day
pub fn get_current_log_file() -> Result<PathBuf> {
    let dir = get_log_directory()?;
    Ok(dir.join(LOG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_lives_under_medqueue_logs() {
        let path = get_current_log_file().unwrap();
        assert!(path.ends_with("medqueue/logs/medqueue.log"));
    }
}
