//! The repository handle and index error types.

use crate::domain::{Entry, METADATA_DIR};
use crate::index::SqliteIndex;
use crate::index::schema::table_exists;
use crate::infra::{BasicExtractor, BuildCache, BuildFolderCache, ExtractError, Extractor, FsError};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Database file name inside the metadata folder.
pub const DATABASE_FILE: &str = "dbase.sqlite";

/// Build artifact folder inside the metadata folder.
pub const BUILD_DIR: &str = "build";

const LAST_UPDATE: &str = "last_update";

// ===========================================
// IndexError Type
// ===========================================

/// Errors that can occur during index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A path argument is outside the root, malformed, or missing.
    #[error("invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// A removal pattern matched no rows.
    #[error("no matching entries for {pattern}")]
    NoMatch { pattern: String },

    /// The source and destination of a move are incompatible.
    #[error("invalid move: {reason}")]
    InvalidMove { reason: String },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The metadata extractor failed.
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    /// An I/O error occurred.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A filesystem operation failed.
    #[error(transparent)]
    Fs(#[from] FsError),

    /// No repository database was found.
    #[error("not a valid repository, {path} does not exist (did you run init?)")]
    NotARepository { path: PathBuf },

    /// `init` was run on an already initialized directory.
    #[error("cannot initialize repository: {path} already exists")]
    AlreadyInitialized { path: PathBuf },

    /// A stored value could not be decoded or encoded.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl IndexError {
    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        IndexError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_move(reason: impl Into<String>) -> Self {
        IndexError::InvalidMove {
            reason: reason.into(),
        }
    }
}

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

// ===========================================
// Repository Handle
// ===========================================

/// An indexed directory tree.
///
/// Owns the database connection for the repository rooted at `root` along
/// with the extraction and build-cache collaborators. Every index operation
/// takes the repository explicitly.
pub struct Repository {
    pub(crate) root: PathBuf,
    pub(crate) index: SqliteIndex,
    pub(crate) extractor: Box<dyn Extractor>,
    pub(crate) cache: Box<dyn BuildCache>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Initializes a new repository in `directory`.
    ///
    /// Creates the metadata folder and an empty database, then stamps the
    /// last-update marker.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidPath` if `directory` does not exist and
    /// `IndexError::AlreadyInitialized` if it already holds a metadata folder.
    pub fn init(directory: &Path) -> IndexResult<Self> {
        if !directory.is_dir() {
            return Err(IndexError::invalid_path(
                directory.display().to_string(),
                "directory does not exist",
            ));
        }

        let meta_dir = directory.join(METADATA_DIR);
        if meta_dir.exists() {
            return Err(IndexError::AlreadyInitialized { path: meta_dir });
        }

        std::fs::create_dir(&meta_dir).map_err(|e| IndexError::Io {
            path: meta_dir.clone(),
            source: e,
        })?;
        debug!("{} created", meta_dir.display());

        let repo = Self::with_index(directory, SqliteIndex::open(&meta_dir.join(DATABASE_FILE))?);
        repo.set_last_update()?;
        Ok(repo)
    }

    /// Opens the repository rooted at `directory`.
    ///
    /// With `traverse_up`, parent directories are searched until one holding
    /// a repository database is found.
    pub fn open(directory: &Path, traverse_up: bool) -> IndexResult<Self> {
        let dir = crate::domain::normalize(directory);
        let db_path = dir.join(METADATA_DIR).join(DATABASE_FILE);

        if !db_path.exists() {
            return match dir.parent() {
                Some(parent) if traverse_up => Self::open(parent, true).map_err(|e| match e {
                    IndexError::NotARepository { .. } => IndexError::NotARepository { path: db_path },
                    other => other,
                }),
                _ => Err(IndexError::NotARepository { path: db_path }),
            };
        }

        debug!("{} exists", db_path.display());
        let index = SqliteIndex::open(&db_path)?;
        if !table_exists(index.conn(), "entries")? {
            return Err(IndexError::InvalidData(format!(
                "table 'entries' not found in {}",
                db_path.display()
            )));
        }

        Ok(Self::with_index(&dir, index))
    }

    /// Wraps an already opened index rooted at `root`.
    pub fn with_index(root: &Path, index: SqliteIndex) -> Self {
        let root = crate::domain::normalize(root);
        let cache = BuildFolderCache::new(root.join(METADATA_DIR).join(BUILD_DIR));
        Self {
            root,
            index,
            extractor: Box::new(BasicExtractor),
            cache: Box::new(cache),
        }
    }

    /// Replaces the metadata extractor.
    pub fn with_extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Replaces the build cache.
    pub fn with_cache(mut self, cache: impl BuildCache + 'static) -> Self {
        self.cache = Box::new(cache);
        self
    }

    /// Changes how long operations wait for another writer to finish.
    pub fn with_busy_timeout(self, timeout: Duration) -> IndexResult<Self> {
        self.index.set_busy_timeout(timeout)?;
        Ok(self)
    }

    /// Returns the repository root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the underlying index.
    pub fn index(&self) -> &SqliteIndex {
        &self.index
    }

    /// Returns the stored entry at a repository-relative path.
    pub fn get_entry(&self, path: &str) -> IndexResult<Option<Entry>> {
        self.index.entries().get(path)
    }

    /// Returns true if a row exists at a repository-relative path.
    pub fn path_exists(&self, path: &str) -> IndexResult<bool> {
        Ok(self.index.entries().state(path)?.is_some())
    }

    /// Returns when the index was last changed, in seconds since the epoch.
    pub fn last_update(&self) -> IndexResult<Option<i64>> {
        let Some(value) = self.index.entries().attribute(LAST_UPDATE)? else {
            return Ok(None);
        };
        value
            .parse()
            .map(Some)
            .map_err(|_| IndexError::InvalidData(format!("invalid {LAST_UPDATE}: {value}")))
    }

    pub(crate) fn set_last_update(&self) -> IndexResult<()> {
        let now = Utc::now().timestamp();
        self.index
            .entries()
            .set_attribute(LAST_UPDATE, &now.to_string())
    }
}
