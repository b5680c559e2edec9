//! Init command handler.

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::METADATA_DIR;
use crate::index::Repository;

pub fn handle_init(dir: &Path) -> Result<()> {
    let repo = Repository::init(dir)
        .with_context(|| format!("failed to initialize repository in {}", dir.display()))?;

    println!(
        "Initialized empty index in {}",
        repo.root().join(METADATA_DIR).display()
    );
    Ok(())
}
