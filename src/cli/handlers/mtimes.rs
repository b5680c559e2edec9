//! Sync-mtimes command handler.

use anyhow::{Context, Result};
use std::path::Path;

use super::open_repository;
use crate::cli::SyncMtimesArgs;
use crate::cli::config::Config;

pub fn handle_sync_mtimes(args: &SyncMtimesArgs, dir: &Path, config: &Config) -> Result<()> {
    let repo = open_repository(dir, config)?;

    let touched = repo
        .sync_local_mtimes(&args.files)
        .context("failed to restore modification times")?;

    println!("Updated modified time of {} file(s)", touched);
    Ok(())
}
