//! Move command handler.

use anyhow::{Context, Result};
use std::path::Path;

use super::open_repository;
use crate::cli::MvArgs;
use crate::cli::config::Config;

pub fn handle_mv(args: &MvArgs, dir: &Path, config: &Config) -> Result<()> {
    let mut repo = open_repository(dir, config)?;

    repo.move_entry(&args.source, &args.dest)
        .with_context(|| format!("failed to move {} to {}", args.source, args.dest))?;

    println!("{} -> {}", args.source, args.dest);
    Ok(())
}
