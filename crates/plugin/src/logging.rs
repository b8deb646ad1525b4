//! Tracing setup. stdout belongs to the protocol, so events go to the
//! configured log file or to stderr.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shelfcover_core::config::LoggingConfig;

/// Install the global subscriber.
///
/// A log file that cannot be opened degrades to stderr; logging never fails
/// the request. The returned guard flushes the file writer when dropped and
/// must be held until the process is done logging.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = build_filter(config);

    let (file, fallback_reason) = match config.file.as_deref().map(file_writer) {
        Some(Ok(writer)) => (Some(writer), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    let (installed, guard) = match file {
        Some((writer, guard)) => {
            let installed = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init();
            (installed, Some(guard))
        }
        None => {
            let installed = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init();
            (installed, None)
        }
    };

    if let Err(e) = installed {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }
    if let Some(e) = fallback_reason {
        warn!("Log file unavailable, logging to stderr: {:#}", e);
    }

    guard
}

/// `RUST_LOG` wins over the configured level.
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Log file path {:?} has no file name", path))?;

    fs::create_dir_all(dir).with_context(|| format!("Failed to create log dir {:?}", dir))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_writer_creates_parent_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs").join("debug.log");

        let (_writer, _guard) = file_writer(&path).unwrap();

        assert!(temp.path().join("logs").is_dir());
        assert!(path.is_file());
    }

    #[test]
    fn test_file_writer_rejects_path_without_name() {
        assert!(file_writer(Path::new("/")).is_err());
    }

    #[test]
    fn test_unopenable_log_file_is_an_error_not_a_panic() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("debug.log");
        fs::create_dir(&path).unwrap();

        let result = std::panic::catch_unwind(|| file_writer(&path).map(|_| ()));

        let err = result.expect("opening the log file must not panic").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open log file"));
    }
}
