//! Repository-relative path rules.
//!
//! Index paths are POSIX-style strings relative to the repository root.
//! Conversion from filesystem paths is purely lexical so that paths which no
//! longer exist (removal patterns, deleted files) still resolve.

use std::path::{Component, Path, PathBuf};

/// Name of the repository's metadata folder.
pub const METADATA_DIR: &str = ".ddb";

/// Makes `path` absolute and removes `.` and `..` components without
/// touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Returns true if `parent` is a strict ancestor of `child`.
///
/// A path is never its own parent.
pub fn is_parent_of(parent: &Path, child: &Path) -> bool {
    let parent = normalize(parent);
    let child = normalize(child);
    child != parent && child.starts_with(&parent)
}

/// Returns true if `path` is `root` or lies beneath it.
pub fn is_contained_in(root: &Path, path: &Path) -> bool {
    normalize(path).starts_with(normalize(root))
}

/// Returns the `/`-joined path of `path` relative to `root`, or `None` if
/// `path` lies outside `root` or is not valid UTF-8 below it. The root itself
/// maps to an empty string.
pub fn relative_generic(path: &Path, root: &Path) -> Option<String> {
    let path = normalize(path);
    let root = normalize(root);
    let rel = path.strip_prefix(&root).ok()?;
    let segments = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(segments.join("/"))
}

/// Depth of a relative path: the number of `/` separators.
///
/// Top-level entries have depth 0.
pub fn depth(rel: &str) -> i32 {
    rel.trim_matches('/').matches('/').count() as i32
}

/// Returns the parent of a relative path, or an empty string at top level.
pub fn parent_path(rel: &str) -> &str {
    match rel.trim_end_matches('/').rfind('/') {
        Some(idx) => &rel[..idx],
        None => "",
    }
}

/// Iterates over the proper ancestors of a relative path, nearest first.
///
/// `"a/b/c.jpg"` yields `"a/b"` then `"a"`.
pub fn ancestors(rel: &str) -> impl Iterator<Item = &str> {
    let mut current = rel;
    std::iter::from_fn(move || {
        let parent = parent_path(current);
        if parent.is_empty() {
            return None;
        }
        current = parent;
        Some(parent)
    })
}

/// Returns true if any segment of `path` is `.` or `..`.
pub fn has_dot_notation(path: &str) -> bool {
    path.split(['/', '\\']).any(|seg| seg == "." || seg == "..")
}

/// Returns true if `path` ends with a `/` or `\` separator.
pub fn ends_with_separator(path: &str) -> bool {
    path.ends_with('/') || path.ends_with('\\')
}

/// Returns true if a filename is acceptable for indexing: it may not
/// contain a backslash.
pub fn is_sane_filename(name: &str) -> bool {
    !name.contains('\\')
}

/// Returns true if the final component of `path` is the metadata folder.
pub fn is_metadata_dir(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == METADATA_DIR)
}
