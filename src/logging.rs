//! Tracing setup.
//!
//! `LACUNA_LOG` takes an `EnvFilter` directive; without it the level comes
//! from the `-v` count. The TUI owns the terminal, so in that mode logs go to
//! a daily file under the cache directory instead of stderr.

use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("cannot write logs to {}: {source}", dir.display())]
    Appender {
        dir: PathBuf,
        #[source]
        source: InitError,
    },

    #[error("failed to install log subscriber: {0}")]
    Subscriber(String),
}

fn filter_for(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env("LACUNA_LOG").unwrap_or_else(|_| {
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        EnvFilter::new(format!("lacuna={level}"))
    })
}

pub fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("lacuna")
}

/// Daily rolling `lacuna.*.log` files in `dir`, created if needed.
pub fn file_appender(dir: &Path) -> Result<RollingFileAppender, LoggingError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("lacuna")
        .filename_suffix("log")
        .build(dir)
        .map_err(|source| LoggingError::Appender {
            dir: dir.to_path_buf(),
            source,
        })
}

/// Install the global subscriber, writing files under [`log_dir`].
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the program. On error nothing is installed and logging stays
/// off.
pub fn init(verbosity: u8, target: LogTarget) -> Result<Option<WorkerGuard>, LoggingError> {
    init_in(verbosity, target, &log_dir())
}

pub fn init_in(
    verbosity: u8,
    target: LogTarget,
    dir: &Path,
) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = filter_for(verbosity);

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(io::stderr)
                .try_init()
                .map_err(|e| LoggingError::Subscriber(e.to_string()))?;
            Ok(None)
        }
        LogTarget::File => {
            let appender = file_appender(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .try_init()
                .map_err(|e| LoggingError::Subscriber(e.to_string()))?;
            Ok(Some(guard))
        }
    }
}
