//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so it logs to a file; the one-shot CLI logs to
//! stderr. `RUST_LOG` overrides the default filter in both cases.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error, for command-line use
    Stderr,
    /// Append to a file, for the terminal UI
    File(PathBuf),
}

impl LogTarget {
    /// Filter applied when `RUST_LOG` is not set.
    pub fn default_filter(&self) -> &'static str {
        match self {
            Self::Stderr => "warn",
            Self::File(_) => "info",
        }
    }
}

fn env_filter(target: &LogTarget) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(target.default_filter()))
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init(target: LogTarget) -> Result<()> {
    let filter = env_filter(&target);

    let installed = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            crate::utils::ensure_parent_directory(&path)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}
