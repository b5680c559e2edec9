//! SQLite-backed entries index implementation.

mod connection;
mod entries;
mod transaction;

#[cfg(test)]
mod tests;

use rusqlite::Connection;

pub use connection::DEFAULT_BUSY_TIMEOUT;
pub use entries::{Entries, EntryState};
pub use transaction::Transaction;

// ===========================================
// SqliteIndex Struct
// ===========================================

/// SQLite-backed entries index.
///
/// Manages the database connection and provides access to the entries table.
pub struct SqliteIndex {
    pub(crate) conn: Connection,
}
