//! Exclusive transactions over the index database.

use super::entries::Entries;
use crate::index::IndexResult;
use rusqlite::Connection;
use tracing::{trace, warn};

/// An open `BEGIN EXCLUSIVE` transaction.
///
/// Dropping it without calling [`Transaction::commit`] rolls back, so an
/// operation that returns early with `?` leaves the index untouched.
pub struct Transaction<'a> {
    conn: &'a Connection,
    done: bool,
}

impl<'a> Transaction<'a> {
    pub(crate) fn begin_exclusive(conn: &'a Connection) -> IndexResult<Self> {
        conn.execute_batch("BEGIN EXCLUSIVE TRANSACTION")?;
        trace!("Exclusive transaction started");
        Ok(Self { conn, done: false })
    }

    /// Statements bound to this transaction.
    pub fn entries(&self) -> Entries<'a> {
        Entries::new(self.conn)
    }

    pub fn commit(mut self) -> IndexResult<()> {
        self.conn.execute_batch("COMMIT")?;
        self.done = true;
        trace!("Transaction committed");
        Ok(())
    }

    pub fn rollback(mut self) -> IndexResult<()> {
        self.done = true;
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            warn!("Rollback failed: {}", e);
        } else {
            trace!("Transaction rolled back");
        }
    }
}
