//! Logging setup.
//!
//! The TUI owns stdout/stderr while it runs, so logs only go to the terminal in
//! one-shot mode. With `--log-file` they go to that file in every mode.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{AppError, ErrorKind};

/// Where log lines should end up when no log file is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    Stderr,
    Off,
}

pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `verbose`.
pub fn init(verbose: u8, log_file: Option<&Path>, console: Console) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbose)));

    match (log_file, console) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    AppError::new(ErrorKind::Usage, format!("Failed to open log file '{}': {e}", path.display()))
                })?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        (None, Console::Stderr) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        (None, Console::Off) => return Ok(()),
    }

    tracing::debug!(level = level_for(verbose), "logging initialized");
    Ok(())
}
