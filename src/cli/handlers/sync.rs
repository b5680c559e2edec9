//! Sync command handler.

use anyhow::{Context, Result};
use std::path::Path;

use super::open_repository;
use crate::cli::SyncArgs;
use crate::cli::config::Config;
use crate::cli::output::{ChangeKind, ChangeListing, OutputFormat, print_changes};
use crate::index::SyncResult;

pub fn handle_sync(args: &SyncArgs, dir: &Path, config: &Config) -> Result<()> {
    let mut repo = open_repository(dir, config)?;
    let result = repo.sync_index().context("failed to sync index")?;

    if result.is_empty() && args.format == OutputFormat::Human {
        println!("Index is up to date");
        return Ok(());
    }

    print_changes(&sync_changes(&result), args.format)?;
    Ok(())
}

/// Flattens a sync result into listing rows, removals first.
pub(crate) fn sync_changes(result: &SyncResult) -> Vec<ChangeListing> {
    let removed = result
        .removed
        .iter()
        .map(|p| ChangeListing::new(ChangeKind::Removed, p.clone()));
    let updated = result
        .updated
        .iter()
        .map(|p| ChangeListing::new(ChangeKind::Updated, p.clone()));
    removed.chain(updated).collect()
}
