//! Connection management for SqliteIndex.

use super::SqliteIndex;
use super::entries::Entries;
use super::transaction::Transaction;
use crate::domain::parent_path;
use crate::index::{IndexError, IndexResult, create_schema};
use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// How long a writer waits for another writer's exclusive transaction.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

impl SqliteIndex {
    // ===========================================
    // In-Memory Connection
    // ===========================================

    /// Opens an in-memory SQLite database with the entries schema.
    ///
    /// This is useful for testing and temporary indexes that don't need persistence.
    pub fn open_in_memory() -> IndexResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::prepare(conn)
    }

    // ===========================================
    // File-Based Connection
    // ===========================================

    /// Opens or creates a SQLite database at the given path.
    ///
    /// Creates parent directories if they don't exist. Initializes the schema
    /// if this is a new database.
    pub fn open(path: &Path) -> IndexResult<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| IndexError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> IndexResult<Self> {
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
        // Paths are case-sensitive; LIKE must be too.
        conn.execute_batch("PRAGMA case_sensitive_like = ON;")?;
        conn.create_scalar_function(
            "parent_path",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let path: String = ctx.get(0)?;
                Ok(parent_path(&path).to_string())
            },
        )?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Changes how long writers wait on a locked database.
    pub fn set_busy_timeout(&self, timeout: Duration) -> IndexResult<()> {
        self.conn.busy_timeout(timeout)?;
        Ok(())
    }

    // ===========================================
    // Connection Accessors
    // ===========================================

    /// Returns a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Returns the statement layer for reads outside a transaction.
    pub fn entries(&self) -> Entries<'_> {
        Entries::new(&self.conn)
    }

    // ===========================================
    // Transaction Support
    // ===========================================

    /// Begins an exclusive transaction, blocking every other writer on the
    /// same database until it finishes.
    ///
    /// The transaction will automatically rollback on drop unless `commit()` is called.
    pub fn exclusive_transaction(&mut self) -> IndexResult<Transaction<'_>> {
        Transaction::begin_exclusive(&self.conn)
    }
}
