//! Tracing setup for the `arcana` binary.

use std::path::Path;

use anyhow::{Context, Result};
use arcana_core::config::LogSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

const LOG_FILE_PREFIX: &str = "arcana.log";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the configured level. With file logging enabled the
/// full log goes to a daily file under `logs_dir` and only warnings reach
/// stderr, so the chat prompt stays readable. The returned guard must live
/// until exit to flush the file writer.
pub fn init(settings: &LogSettings, logs_dir: &Path) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .with_context(|| format!("Invalid log level '{}'", settings.level))?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let mut guard = None;

    if settings.file_logging {
        std::fs::create_dir_all(logs_dir)
            .with_context(|| format!("Failed to create {}", logs_dir.display()))?;
        let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
        let (writer, worker) = tracing_appender::non_blocking(appender);
        guard = Some(worker);

        layers.push(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_filter(filter)
                .boxed(),
        );
        layers.push(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact()
                .with_filter(LevelFilter::WARN)
                .boxed(),
        );
    } else {
        layers.push(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact()
                .with_filter(filter)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(guard)
}
