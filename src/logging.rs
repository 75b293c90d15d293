use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt::time::UtcTime, prelude::*, EnvFilter};

use crate::config::{LogFormat, LogRotation, LoggingConfig};

/// Install the global subscriber: stdout plus an optional rolling log file.
///
/// The filter comes from `logging.level` when set, else `RUST_LOG`, else
/// "info". Keep the returned guard alive for the life of the process; dropping
/// it flushes and stops the file writer.
#[must_use = "dropping the guard stops file logging"]
pub fn init_with_config(cfg: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter = match &cfg.level {
        Some(level) => EnvFilter::new(level.as_str()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let file_writer = if cfg.enable_file_logging {
        open_file_writer(cfg)
    } else {
        None
    };
    let (file_writer, guard) = match file_writer {
        Some((writer, guard)) => (Some(writer), Some(guard)),
        None => (None, None),
    };

    match cfg.format {
        LogFormat::Json => {
            let stdout = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_timer(UtcTime::rfc_3339())
                .with_writer(std::io::stdout);
            let file = file_writer.map(|writer| {
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(writer)
            });
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout)
                .with(file)
                .try_init();
        }
        LogFormat::Text => {
            let stdout = tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_timer(UtcTime::rfc_3339())
                .with_writer(std::io::stdout);
            let file = file_writer.map(|writer| {
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(writer)
            });
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout)
                .with(file)
                .try_init();
        }
    }

    guard
}

fn open_file_writer(cfg: &LoggingConfig) -> Option<(NonBlocking, WorkerGuard)> {
    let rotation = match cfg.rotation {
        LogRotation::Daily => tracing_appender::rolling::Rotation::DAILY,
        LogRotation::Hourly => tracing_appender::rolling::Rotation::HOURLY,
        LogRotation::Never => tracing_appender::rolling::Rotation::NEVER,
    };

    if let Err(err) = std::fs::create_dir_all(&cfg.dir) {
        eprintln!(
            "Failed to create log directory '{}' ({err}), continuing with stdout logs",
            cfg.dir
        );
        return None;
    }

    let file_appender =
        tracing_appender::rolling::RollingFileAppender::new(rotation, &cfg.dir, &cfg.filename);
    Some(tracing_appender::non_blocking(file_appender))
}
