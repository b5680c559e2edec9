//! Expansion of add arguments into the full list of paths to index.

use crate::domain::{METADATA_DIR, is_contained_in, is_parent_of, normalize};
use crate::index::{IndexError, IndexResult};
use crate::infra::walk_tree;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expands `paths` into every file (and, with `include_dirs`, every
/// directory) that indexing them touches.
///
/// Directories are walked recursively with the metadata folder pruned, and
/// arguments inside a metadata folder are skipped.
/// With `include_dirs`, every ancestor of a listed path up to (but not
/// including) `root` is added too, so the folder rows exist for everything
/// inserted. Files come first in walk order, followed by the directories
/// sorted by path.
///
/// # Errors
///
/// Every argument is validated before anything is walked: an empty path, a
/// path outside `root`, or a path that does not exist is an
/// `IndexError::InvalidPath`.
pub fn get_index_path_list<P: AsRef<Path>>(
    root: &Path,
    paths: &[P],
    include_dirs: bool,
) -> IndexResult<Vec<PathBuf>> {
    let root = normalize(root);

    let mut inputs = Vec::with_capacity(paths.len());
    for p in paths {
        let p = p.as_ref();
        if p.as_os_str().is_empty() {
            return Err(IndexError::invalid_path("", "some paths are empty"));
        }
        let abs = normalize(p);
        if !is_contained_in(&root, &abs) {
            return Err(IndexError::invalid_path(
                p.display().to_string(),
                format!("not contained within {}", root.display()),
            ));
        }
        if !abs.exists() {
            return Err(IndexError::invalid_path(
                p.display().to_string(),
                "path does not exist",
            ));
        }
        inputs.push(abs);
    }

    let mut files = Vec::new();
    let mut directories = BTreeSet::new();

    for p in inputs {
        if inside_metadata_dir(&root, &p) {
            debug!("Skipping metadata path '{}'", p.display());
            continue;
        }

        if p.is_dir() {
            for item in walk_tree(&p) {
                let item = item?;
                if include_dirs {
                    add_ancestors(&root, &item.path, &mut directories);
                }
                if item.is_dir {
                    if include_dirs {
                        directories.insert(item.path);
                    }
                } else {
                    files.push(item.path);
                }
            }
            if include_dirs {
                add_ancestors(&root, &p, &mut directories);
                if p != root {
                    directories.insert(p);
                }
            }
        } else {
            if include_dirs {
                add_ancestors(&root, &p, &mut directories);
            }
            files.push(p);
        }
    }

    files.extend(directories);
    Ok(files)
}

/// True if any component of `path` below `root` is the metadata folder.
fn inside_metadata_dir(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .is_ok_and(|rel| rel.components().any(|c| c.as_os_str() == METADATA_DIR))
}

fn add_ancestors(root: &Path, path: &Path, directories: &mut BTreeSet<PathBuf>) {
    let mut current = path.parent();
    while let Some(dir) = current {
        if !is_parent_of(root, dir) {
            break;
        }
        directories.insert(dir.to_path_buf());
        current = dir.parent();
    }
}
