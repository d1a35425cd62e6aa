//! Shared filesystem helpers.
//!
//! These functions are reused across the CLI and TUI interfaces.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const APP_DIR: &str = "voiceassist";
const LOG_FILE: &str = "voiceassist.log";

/// Gets the cross-platform log file path.
///
/// Returns the path as `{data_dir}/voiceassist/voiceassist.log` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn get_log_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join(APP_DIR).join(LOG_FILE))
}

/// Ensures the parent directory of a file exists.
///
/// Creates the directory structure if it doesn't exist using `create_dir_all`.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_parent_directory(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}
