use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants;

/// Explicit logging configuration, built by the orchestrator at startup
/// rather than assembled from process-wide state.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory receiving the log file
    pub dir: PathBuf,
    /// Log file name
    pub file_name: String,
    /// Also mirror log lines to stdout
    pub console: bool,
}

impl LogConfig {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            file_name: constants::LOG_FILE_NAME.to_string(),
            console: true,
        }
    }
}

/// Initializes the logging system with file output and optional console
/// output. The returned guard must stay alive for the duration of the run so
/// buffered log lines are flushed on exit.
pub fn init(config: &LogConfig) -> anyhow::Result<WorkerGuard> {
    fs::create_dir_all(&config.dir)?;

    let file_appender = tracing_appender::rolling::never(&config.dir, &config.file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    // JSON layer for the log file, human-readable layer for the console
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = if config.console {
        Some(fmt::layer().with_writer(std::io::stdout))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("sales_pipeline=info".parse()?))
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}
