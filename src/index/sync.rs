//! Index synchronization: add, remove, sync and query.

use crate::domain::{Entry, is_sane_filename, relative_generic};
use crate::index::change::{FileStatus, check_update};
use crate::index::folders::create_missing_folders;
use crate::index::paths::get_index_path_list;
use crate::index::{Entries, IndexError, IndexResult, LikePattern, Repository};
use crate::infra::{FsError, set_modified_time};
use serde::Serialize;
use std::ops::ControlFlow;
use std::path::Path;
use tracing::{debug, info, warn};

/// Paths changed by a [`Repository::sync_index`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    /// Rows dropped because their path no longer exists.
    pub removed: Vec<String>,
    /// Rows re-extracted because their content changed.
    pub updated: Vec<String>,
}

impl SyncResult {
    /// True if the run changed nothing.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.updated.is_empty()
    }
}

impl Repository {
    // ===========================================
    // Add
    // ===========================================

    /// Indexes `paths` (files or directories, recursively).
    ///
    /// See [`Repository::add_to_index_with`].
    pub fn add_to_index<P: AsRef<Path>>(&mut self, paths: &[P]) -> IndexResult<()> {
        self.add_to_index_with(paths, |_, _| ControlFlow::Continue(()))
    }

    /// Indexes `paths`, reporting every inserted or updated row.
    ///
    /// New paths are inserted, known paths go through change detection and are
    /// re-extracted only when their content changed. `on_entry` receives each
    /// applied row and whether it was an update; returning
    /// `ControlFlow::Break` stops processing further paths. What was applied
    /// up to that point is still committed.
    ///
    /// Filenames containing a backslash, and paths that are not valid UTF-8,
    /// are skipped.
    ///
    /// # Errors
    ///
    /// All paths are validated before the transaction begins; a path outside
    /// the root or one that does not exist fails the whole call with
    /// `IndexError::InvalidPath`. Store and extraction failures roll back
    /// everything.
    pub fn add_to_index_with<P, F>(&mut self, paths: &[P], mut on_entry: F) -> IndexResult<()>
    where
        P: AsRef<Path>,
        F: FnMut(&Entry, bool) -> ControlFlow<()>,
    {
        if paths.is_empty() {
            debug!("No paths provided");
            return Ok(());
        }

        let path_list = get_index_path_list(&self.root, paths, true)?;
        let tx = self.index.exclusive_transaction()?;
        let entries = tx.entries();
        let mut applied = 0usize;

        for p in &path_list {
            if let Some(name) = p.file_name().and_then(|n| n.to_str())
                && !is_sane_filename(name)
            {
                warn!("Skipping '{}'", p.display());
                continue;
            }

            // Containment was checked up front, so only non-UTF-8 names land here.
            let Some(rel) = relative_generic(p, &self.root) else {
                warn!("Skipping '{}': not a UTF-8 path", p.display());
                continue;
            };

            let mut entry = Entry::default();
            let is_update = match entries.state(&rel)? {
                None => false,
                Some(state) => match check_update(&mut entry, p, state.mtime, &state.hash)? {
                    FileStatus::Modified => true,
                    FileStatus::NotModified => {
                        refresh_touched_mtime(entries, &rel, &entry, state.mtime)?;
                        continue;
                    }
                    FileStatus::Deleted => {
                        warn!("'{}' disappeared while indexing", p.display());
                        continue;
                    }
                },
            };

            self.extractor.extract(p, &self.root, &mut entry, true)?;
            if is_update {
                debug!("Updating '{}'", entry.path);
                entries.update(&entry)?;
            } else {
                debug!("Adding '{}'", entry.path);
                entries.insert(&entry)?;
            }
            applied += 1;

            if on_entry(&entry, is_update).is_break() {
                info!("Add stopped after {} entries", applied);
                break;
            }
        }

        create_missing_folders(&entries)?;
        tx.commit()?;
        self.set_last_update()?;

        info!("Indexed {} entries", applied);
        Ok(())
    }

    // ===========================================
    // Remove
    // ===========================================

    /// Removes every row matching `patterns`.
    ///
    /// See [`Repository::remove_from_index_with`].
    pub fn remove_from_index<P: AsRef<Path>>(&mut self, patterns: &[P]) -> IndexResult<()> {
        self.remove_from_index_with(patterns, |_| {})
    }

    /// Removes every row matching `patterns`, reporting each deleted path.
    ///
    /// Patterns are filesystem paths and may contain `*`. A matched directory
    /// takes all of its descendants with it, and any build artifacts keyed by
    /// a removed row's hash are deleted.
    ///
    /// Each pattern runs in its own transaction. A pattern that matches
    /// nothing fails with `IndexError::NoMatch`, but what earlier patterns in
    /// the same call removed stays removed.
    pub fn remove_from_index_with<P, F>(&mut self, patterns: &[P], mut on_remove: F) -> IndexResult<()>
    where
        P: AsRef<Path>,
        F: FnMut(&str),
    {
        if patterns.is_empty() {
            debug!("No paths provided");
            return Ok(());
        }

        for p in patterns {
            let p = p.as_ref();
            let rel = relative_generic(p, &self.root).ok_or_else(|| {
                IndexError::invalid_path(
                    p.display().to_string(),
                    "not a UTF-8 path contained within root",
                )
            })?;
            debug!("Deleting path: {} (relative: {})", p.display(), rel);

            let tx = self.index.exclusive_transaction()?;
            let entries = tx.entries();
            let mut removed = Vec::new();

            for matched in entries.matching(&LikePattern::path(&rel), 0)? {
                if let Some(state) = entries.state(&matched.path)? {
                    entries.delete(&state.path)?;
                    removed.push((state.path, state.hash));
                }
                if matched.is_directory() {
                    removed.extend(delete_rows(
                        entries,
                        &LikePattern::literal_descendants_of(&matched.path),
                    )?);
                }
            }

            if removed.is_empty() {
                return Err(IndexError::NoMatch {
                    pattern: p.display().to_string(),
                });
            }
            tx.commit()?;

            for (path, hash) in &removed {
                self.clear_build_cache(hash);
                on_remove(path);
            }
            info!("Removed {} entries matching {}", removed.len(), rel);
        }

        self.set_last_update()
    }

    // ===========================================
    // Sync
    // ===========================================

    /// Reconciles every stored row with the filesystem.
    ///
    /// See [`Repository::sync_index_with`].
    pub fn sync_index(&mut self) -> IndexResult<SyncResult> {
        self.sync_index_with(|_, _| {})
    }

    /// Reconciles every stored row with the filesystem, reporting each change.
    ///
    /// Rows whose path vanished are deleted (with their build artifacts),
    /// rows whose content changed are re-extracted. Rows that were only
    /// touched get their stored mtime refreshed without counting as a change.
    /// The last-update marker moves only when something changed.
    pub fn sync_index_with<F>(&mut self, mut on_change: F) -> IndexResult<SyncResult>
    where
        F: FnMut(FileStatus, &str),
    {
        let tx = self.index.exclusive_transaction()?;
        let entries = tx.entries();
        let mut result = SyncResult::default();
        let mut stale_hashes = Vec::new();

        for state in entries.all_states()? {
            let path = self.root.join(&state.path);
            let mut entry = Entry::default();

            match check_update(&mut entry, &path, state.mtime, &state.hash)? {
                FileStatus::Deleted => {
                    entries.delete(&state.path)?;
                    stale_hashes.push(state.hash);
                    result.removed.push(state.path);
                }
                FileStatus::Modified => {
                    self.extractor.extract(&path, &self.root, &mut entry, true)?;
                    entries.update(&entry)?;
                    result.updated.push(entry.path);
                }
                FileStatus::NotModified => {
                    refresh_touched_mtime(entries, &state.path, &entry, state.mtime)?;
                }
            }
        }

        create_missing_folders(&entries)?;
        tx.commit()?;

        for hash in &stale_hashes {
            self.clear_build_cache(hash);
        }
        for path in &result.removed {
            on_change(FileStatus::Deleted, path);
        }
        for path in &result.updated {
            on_change(FileStatus::Modified, path);
        }

        if !result.is_empty() {
            self.set_last_update()?;
        }

        info!(
            "Sync complete: {} removed, {} updated",
            result.removed.len(),
            result.updated.len()
        );
        Ok(result)
    }

    /// Sets on-disk modification times to the stored ones.
    ///
    /// Applies to every file row, or only to the repository-relative paths in
    /// `files` when it is non-empty. Rows whose file is missing are skipped.
    /// Returns how many files were changed.
    pub fn sync_local_mtimes(&self, files: &[String]) -> IndexResult<usize> {
        let mut touched = 0;

        for (path, mtime) in self.index.entries().file_mtimes(files)? {
            let full = self.root.join(&path);
            match set_modified_time(&full, mtime) {
                Ok(true) => {
                    debug!("Updated mtime for {}", full.display());
                    touched += 1;
                }
                Ok(false) => {}
                Err(FsError::NotFound { .. }) => {
                    warn!("Cannot set mtime of missing file {}", full.display());
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(touched)
    }

    // ===========================================
    // Query
    // ===========================================

    /// Returns rows whose path matches `pattern`, sorted by path.
    ///
    /// `pattern` is repository-relative and may contain `*`; an empty
    /// pattern matches everything. With `is_folder` only strict descendants
    /// of `pattern` match. `max_depth` of 0 means all depths, `N` keeps rows
    /// with depth below `N`.
    pub fn get_matching_entries(
        &self,
        pattern: &str,
        max_depth: u32,
        is_folder: bool,
    ) -> IndexResult<Vec<Entry>> {
        let mut like = LikePattern::path(pattern);
        if is_folder {
            like = like.with_descendants();
        }
        debug!("Query: {} (sanitized: {})", pattern, like);
        self.index.entries().matching(&like, max_depth)
    }

    fn clear_build_cache(&self, hash: &str) {
        if hash.is_empty() {
            return;
        }
        if let Err(e) = self.cache.remove_for(hash) {
            warn!("Cannot remove build folder for {}: {}", hash, e);
        }
    }
}

/// Persists the new mtime of a file whose bytes did not change.
///
/// The change detector only hashes when the mtime moved, so a non-empty hash
/// on a `NotModified` entry means it was touched.
fn refresh_touched_mtime(
    entries: Entries<'_>,
    rel: &str,
    entry: &Entry,
    db_mtime: i64,
) -> IndexResult<()> {
    if !entry.hash.is_empty() && entry.mtime != db_mtime {
        debug!("Refreshing mtime of '{}'", rel);
        entries.update_mtime(rel, entry.mtime)?;
    }
    Ok(())
}

fn delete_rows(entries: Entries<'_>, pattern: &LikePattern) -> IndexResult<Vec<(String, String)>> {
    let rows = entries.matching_hashes(pattern)?;
    if !rows.is_empty() {
        entries.delete_matching(pattern)?;
    }
    Ok(rows)
}
