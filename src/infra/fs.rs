//! Filesystem traversal and modification-time helpers.

use crate::domain::is_metadata_dir;
use filetime::FileTime;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors during filesystem traversal.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Creates an appropriate FsError from an io::Error.
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path: path.into() },
            _ => FsError::Io {
                path: path.into(),
                source: error,
            },
        }
    }

    /// Returns the path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            FsError::NotFound { path } => path,
            FsError::PermissionDenied { path } => path,
            FsError::Io { path, .. } => path,
        }
    }
}

/// One item produced by [`walk_tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkItem {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Walks everything beneath `dir` (excluding `dir` itself).
///
/// The metadata folder is pruned together with its whole subtree. Symlinks
/// are reported but not followed.
pub fn walk_tree(dir: &Path) -> impl Iterator<Item = Result<WalkItem, FsError>> {
    WalkDir::new(dir)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_metadata_dir(e.path()))
        .map(|res| match res {
            Ok(e) => Ok(WalkItem {
                is_dir: e.file_type().is_dir(),
                path: e.into_path(),
            }),
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
                Err(FsError::from_io(&path, source))
            }
        })
}

/// Returns the modification time of `path` in whole seconds since the epoch.
pub fn modified_time(path: &Path) -> Result<i64, FsError> {
    let meta = std::fs::metadata(path).map_err(|e| FsError::from_io(path, e))?;
    Ok(FileTime::from_last_modification_time(&meta).unix_seconds())
}

/// Sets the modification time of `path`.
///
/// Returns `false` without touching the file if it already has that mtime.
pub fn set_modified_time(path: &Path, mtime: i64) -> Result<bool, FsError> {
    if modified_time(path)? == mtime {
        return Ok(false);
    }
    filetime::set_file_mtime(path, FileTime::from_unix_time(mtime, 0))
        .map_err(|e| FsError::from_io(path, e))?;
    Ok(true)
}

/// Removes a directory tree if it exists.
pub fn remove_dir_if_exists(path: &Path) -> Result<bool, FsError> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(FsError::from_io(path, e)),
    }
}
