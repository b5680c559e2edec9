//! SQLite schema creation for the entries index.

use rusqlite::Connection;

/// Creates the database schema for the entries index.
///
/// This function creates all required tables and indexes.
/// It is idempotent - calling it multiple times is safe.
///
/// # Tables Created
/// - `entries` - One row per indexed file or folder
/// - `attributes` - Repository-level key/value markers (last update time)
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    // Geometry columns hold WKT text
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS entries (
            path TEXT NOT NULL PRIMARY KEY,
            hash TEXT NOT NULL DEFAULT '',
            type INTEGER NOT NULL,
            meta TEXT,
            mtime INTEGER NOT NULL,
            size INTEGER NOT NULL DEFAULT 0,
            depth INTEGER NOT NULL,
            point_geom TEXT,
            polygon_geom TEXT
        );",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS attributes (
            name TEXT NOT NULL PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS ix_entries_type ON entries(type);
         CREATE INDEX IF NOT EXISTS ix_entries_depth ON entries(depth);",
    )?;

    Ok(())
}

/// Returns true if `table` exists in the database.
pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
