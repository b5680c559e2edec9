//! Derived build artifacts (tiles, thumbnails) keyed by content hash.

use crate::infra::content_hash::ContentHash;
use crate::infra::fs::{FsError, remove_dir_if_exists};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Invalidates cached artifacts derived from an entry's content.
pub trait BuildCache {
    /// Removes whatever is cached for `hash`. A no-op when nothing is cached
    /// or `hash` is empty.
    fn remove_for(&self, hash: &str) -> Result<(), FsError>;
}

/// Cache stored as one folder per hash under `<root>/.ddb/build`.
#[derive(Debug, Clone)]
pub struct BuildFolderCache {
    build_dir: PathBuf,
}

impl BuildFolderCache {
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
        }
    }

    /// Returns the folder that holds artifacts for `hash`.
    pub fn folder_for(&self, hash: &str) -> PathBuf {
        self.build_dir.join(hash)
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }
}

impl BuildCache for BuildFolderCache {
    fn remove_for(&self, hash: &str) -> Result<(), FsError> {
        // Only well-formed digests name a build folder.
        let Ok(hash) = ContentHash::from_hex(hash) else {
            return Ok(());
        };

        let folder = self.folder_for(hash.as_str());
        if remove_dir_if_exists(&folder)? {
            debug!("Removed build folder {}", folder.display());
        }
        Ok(())
    }
}
