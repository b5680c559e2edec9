//! Command handlers for the CLI.

mod add;
mod completions;
mod init;
mod list;
mod mtimes;
mod mv;
mod remove;
mod sync;


use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::config::Config;
use crate::index::Repository;

// Re-export public items
pub use add::handle_add;
pub use completions::handle_completions;
pub use init::handle_init;
pub use list::handle_list;
pub use mtimes::handle_sync_mtimes;
pub use mv::handle_mv;
pub use remove::handle_remove;
pub use sync::handle_sync;

// ===========================================
// Shared Utilities
// ===========================================

/// Opens the repository containing `dir`, searching parent directories.
pub(crate) fn open_repository(dir: &Path, config: &Config) -> Result<Repository> {
    let mut repo = Repository::open(dir, true)
        .with_context(|| format!("failed to open repository at {}", dir.display()))?;

    if let Some(timeout) = config.busy_timeout() {
        repo = repo
            .with_busy_timeout(timeout)
            .context("failed to set busy timeout")?;
    }

    Ok(repo)
}

/// Formats a byte count with a binary unit suffix.
pub(crate) fn format_size(bytes: i64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
