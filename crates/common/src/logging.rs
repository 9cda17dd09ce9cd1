//! Logging and tracing initialization.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

const FALLBACK_LEVEL: &str = "info";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.level`; an unparsable level falls back to
/// `info`. Output goes to stderr, or is appended to `config.file` when set.
/// Only the first call has any effect.
pub fn init_logging(config: &LoggingConfig) {
    let filter = build_filter(&config.level);
    let to_file = config.file.is_some();

    let writer = match config.file.as_deref().map(open_log_file) {
        Some(Ok(file)) => BoxMakeWriter::new(Mutex::new(file)),
        Some(Err(e)) => {
            eprintln!("textbehind: cannot open log file, logging to stderr: {e}");
            BoxMakeWriter::new(std::io::stderr)
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(!to_file);

    if config.json {
        let subscriber = builder.json().finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = builder
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
