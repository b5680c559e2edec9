//! Remove command handler.

use anyhow::{Context, Result};
use std::path::Path;

use super::open_repository;
use crate::cli::RemoveArgs;
use crate::cli::config::Config;
use crate::cli::output::{ChangeKind, ChangeListing, print_changes};

pub fn handle_remove(args: &RemoveArgs, dir: &Path, config: &Config) -> Result<()> {
    let mut repo = open_repository(dir, config)?;
    let mut changes = Vec::new();

    let result = repo.remove_from_index_with(&args.paths, |path| {
        changes.push(ChangeListing::new(ChangeKind::Removed, path));
    });

    // Earlier patterns stay removed when a later one fails.
    print_changes(&changes, args.format)?;
    result.context("failed to remove from index")?;
    Ok(())
}
