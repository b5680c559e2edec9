//! Add command handler.

use anyhow::{Context, Result};
use std::ops::ControlFlow;
use std::path::Path;

use super::open_repository;
use crate::cli::AddArgs;
use crate::cli::config::Config;
use crate::cli::output::{ChangeKind, ChangeListing, print_changes};

pub fn handle_add(args: &AddArgs, dir: &Path, config: &Config) -> Result<()> {
    let mut repo = open_repository(dir, config)?;
    let mut changes = Vec::new();

    repo.add_to_index_with(&args.paths, |entry, is_update| {
        let kind = if is_update {
            ChangeKind::Updated
        } else {
            ChangeKind::Added
        };
        changes.push(ChangeListing::new(kind, entry.path.clone()));
        ControlFlow::Continue(())
    })
    .context("failed to add to index")?;

    print_changes(&changes, args.format)?;
    Ok(())
}
