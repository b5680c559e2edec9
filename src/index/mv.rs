//! Renaming entries inside the index.

use crate::domain::{ancestors, ends_with_separator, has_dot_notation};
use crate::index::folders::create_missing_folders;
use crate::index::{IndexError, IndexResult, Repository};
use tracing::{debug, info};

impl Repository {
    /// Moves the row at `source` (and, for a directory, every descendant) to
    /// `dest`. Both are repository-relative paths.
    ///
    /// Only the index is changed; files on disk are not touched. Moving a file
    /// onto another file replaces the destination row. Moving onto the same
    /// path is a no-op.
    ///
    /// # Errors
    ///
    /// - `IndexError::InvalidPath` if either path is empty, ends with a
    ///   separator, contains `.` or `..` segments, or `source` is not indexed.
    /// - `IndexError::InvalidMove` if a directory is moved onto an existing
    ///   row or into its own subtree, a file is moved onto a directory, or
    ///   `dest` would sit beneath a file.
    pub fn move_entry(&mut self, source: &str, dest: &str) -> IndexResult<()> {
        check_move_path("source", source)?;
        check_move_path("dest", dest)?;

        if source == dest {
            return Ok(());
        }

        let tx = self.index.exclusive_transaction()?;
        let entries = tx.entries();

        let source_entry = entries
            .get(source)?
            .ok_or_else(|| IndexError::invalid_path(source, "source path not found"))?;

        if let Some(dest_entry) = entries.get(dest)? {
            if source_entry.is_directory() {
                if dest_entry.is_directory() {
                    return Err(IndexError::invalid_move(
                        "cannot move a directory on another directory",
                    ));
                }
                return Err(IndexError::invalid_move("cannot move a folder on a file"));
            }
            if dest_entry.is_directory() {
                return Err(IndexError::invalid_move("cannot move a file on a directory"));
            }
        }

        if source_entry.is_directory() && dest.starts_with(&format!("{source}/")) {
            return Err(IndexError::invalid_move(
                "cannot move a directory inside itself",
            ));
        }

        for ancestor in ancestors(dest) {
            if let Some(existing) = entries.get(ancestor)?
                && !existing.is_directory()
            {
                return Err(IndexError::invalid_move(format!(
                    "cannot move beneath the file {ancestor}"
                )));
            }
        }

        if source_entry.is_directory() {
            for path in entries.folder_paths(source)? {
                let suffix = path.strip_prefix(source).ok_or_else(|| {
                    IndexError::InvalidData(format!("'{path}' is not beneath '{source}'"))
                })?;
                let new_path = format!("{dest}{suffix}");
                debug!("Replacing '{}' with '{}'", path, new_path);
                entries.delete(&new_path)?;
                entries.replace_path(&path, &new_path)?;
            }
        } else {
            entries.delete(dest)?;
            debug!("Replacing '{}' with '{}'", source, dest);
            entries.replace_path(source, dest)?;
        }

        create_missing_folders(&entries)?;
        tx.commit()?;
        self.set_last_update()?;

        info!("Moved '{}' to '{}'", source, dest);
        Ok(())
    }
}

fn check_move_path(what: &str, path: &str) -> IndexResult<()> {
    if path.is_empty() {
        return Err(IndexError::invalid_path(path, format!("{what} cannot be empty")));
    }
    if ends_with_separator(path) {
        return Err(IndexError::invalid_path(
            path,
            format!("{what} cannot end with path separator"),
        ));
    }
    if has_dot_notation(path) {
        return Err(IndexError::invalid_path(
            path,
            format!("{what} path cannot contain any dot notations"),
        ));
    }
    Ok(())
}
