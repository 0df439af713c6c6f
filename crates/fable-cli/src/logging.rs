//! Subscriber setup for the `fable` binary.

use std::path::PathBuf;

use fable_core::config::LoggingSettings;
use fable_infrastructure::paths::FablePaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FABLE_LOG";
const LOG_FILE_PREFIX: &str = "fable.log";

/// Installs the global subscriber.
///
/// `FABLE_LOG` takes precedence over the configured level. Logs go to a
/// daily file when a directory is configured, or when `interactive` is set
/// and the default log directory resolves, so the REPL output stays clean.
/// A directory that cannot be used falls back to stderr.
/// The returned guard must live until exit to flush the file writer.
pub fn init(settings: &LoggingSettings, interactive: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let appender = log_directory(settings, interactive).and_then(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .build(&dir)
            .map_err(|e| eprintln!("Cannot log to {}: {}", dir.display(), e))
            .ok()
    });

    match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
            None
        }
    }
}

fn log_directory(settings: &LoggingSettings, interactive: bool) -> Option<PathBuf> {
    if let Some(dir) = &settings.directory {
        return Some(dir.clone());
    }
    if interactive {
        return FablePaths::log_dir().ok();
    }
    None
}
