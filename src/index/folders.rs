//! Folder-consistency maintenance.
//!
//! Every ancestor directory of a stored path must have a directory row of
//! its own. Moves and cancelled adds can leave gaps, which are filled here.

use crate::domain::EntryType;
use crate::index::{Entries, IndexResult};
use chrono::Utc;
use tracing::debug;

/// Walks every ancestor of every stored row (via the `parent_path` SQL
/// function) and keeps the ones that have no row at all.
const MISSING_FOLDERS_QUERY: &str = "WITH RECURSIVE ancestors(folder) AS (
        SELECT parent_path(path) FROM entries WHERE type != ?1
        UNION
        SELECT parent_path(folder) FROM ancestors WHERE folder != ''
    )
    SELECT folder FROM ancestors
    WHERE folder != ''
      AND NOT EXISTS (SELECT 1 FROM entries WHERE entries.path = ancestors.folder)
    ORDER BY folder";

/// Returns ancestor folders that have no row, sorted by path.
pub fn missing_folders(entries: &Entries<'_>) -> IndexResult<Vec<String>> {
    entries.query_strings(MISSING_FOLDERS_QUERY, EntryType::Repository.code())
}

/// Inserts a directory row for every missing ancestor folder.
///
/// Idempotent: a second call right after the first inserts nothing. Returns
/// the paths that were created.
pub fn create_missing_folders(entries: &Entries<'_>) -> IndexResult<Vec<String>> {
    let missing = missing_folders(entries)?;
    let now = Utc::now().timestamp();

    for folder in &missing {
        debug!("Creating missing folder '{}'", folder);
        entries.insert_folder(folder, now)?;
    }

    Ok(missing)
}
