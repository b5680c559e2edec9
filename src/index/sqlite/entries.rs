//! Statement layer over the `entries` and `attributes` tables.

use crate::domain::{Entry, EntryType, Geometry, depth};
use crate::index::{IndexResult, LikePattern};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};

const ENTRY_COLUMNS: &str =
    "path, hash, type, meta, mtime, size, depth, point_geom, polygon_geom";

const UPDATE_ENTRY: &str = "UPDATE entries SET hash = ?1, type = ?2, meta = ?3, mtime = ?4, \
     size = ?5, depth = ?6, point_geom = ?7, polygon_geom = ?8 WHERE path = ?9";

const INSERT_ENTRY: &str = "INSERT INTO entries \
     (path, hash, type, meta, mtime, size, depth, point_geom, polygon_geom) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

/// The change-detection columns of a stored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryState {
    pub path: String,
    pub mtime: i64,
    pub hash: String,
}

/// Typed statements against an open connection or transaction.
#[derive(Clone, Copy)]
pub struct Entries<'c> {
    conn: &'c Connection,
}

impl<'c> Entries<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    // ===========================================
    // Lookups
    // ===========================================

    /// Returns the stored mtime and hash for `path`.
    pub fn state(&self, path: &str) -> IndexResult<Option<EntryState>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT path, mtime, hash FROM entries WHERE path = ?1")?;
        let state = stmt.query_row([path], read_state).optional()?;
        Ok(state)
    }

    /// Returns the change-detection columns of every row.
    pub fn all_states(&self) -> IndexResult<Vec<EntryState>> {
        let mut stmt = self
            .conn
            .prepare("SELECT path, mtime, hash FROM entries ORDER BY path")?;
        let rows = stmt
            .query_map([], read_state)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Returns the full row stored at `path`.
    pub fn get(&self, path: &str) -> IndexResult<Option<Entry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE path = ?1 LIMIT 1");
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let entry = stmt.query_row([path], read_entry).optional()?;
        Ok(entry)
    }

    /// Returns `path` itself (if stored) and every descendant path.
    pub fn folder_paths(&self, path: &str) -> IndexResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT path FROM entries WHERE path = ?1 OR path LIKE ?2 ESCAPE '/' ORDER BY path",
        )?;
        let descendants = LikePattern::literal_descendants_of(path);
        let rows = stmt
            .query_map(params![path, descendants.as_str()], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(rows)
    }

    /// Returns rows matching `pattern`, excluding the metadata folder.
    ///
    /// With `max_depth > 0` only rows at depth `max_depth - 1` or shallower
    /// are returned.
    pub fn matching(&self, pattern: &LikePattern, max_depth: u32) -> IndexResult<Vec<Entry>> {
        let mut sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE path LIKE ?1 ESCAPE '/' AND type != {}",
            EntryType::Repository.code()
        );
        if max_depth > 0 {
            sql.push_str(&format!(" AND depth <= {}", max_depth - 1));
        }
        sql.push_str(" ORDER BY path");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([pattern.as_str()], read_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Returns `(path, hash)` for every row matching `pattern`.
    pub fn matching_hashes(&self, pattern: &LikePattern) -> IndexResult<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT path, hash FROM entries WHERE path LIKE ?1 ESCAPE '/'")?;
        let rows = stmt
            .query_map([pattern.as_str()], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Returns `(path, mtime)` for file rows, optionally limited to `only`.
    pub fn file_mtimes(&self, only: &[String]) -> IndexResult<Vec<(String, i64)>> {
        let mut sql = format!(
            "SELECT path, mtime FROM entries WHERE type != {} AND type != {}",
            EntryType::Directory.code(),
            EntryType::Repository.code()
        );
        if !only.is_empty() {
            let placeholders = vec!["?"; only.len()].join(",");
            sql.push_str(&format!(" AND path IN ({placeholders})"));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(only), |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Runs a single-column text query with one bound parameter.
    pub(crate) fn query_strings(&self, sql: &str, param: impl ToSql) -> IndexResult<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt
            .query_map([param], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(rows)
    }

    // ===========================================
    // Mutations
    // ===========================================

    pub fn insert(&self, entry: &Entry) -> IndexResult<()> {
        let mut stmt = self.conn.prepare_cached(INSERT_ENTRY)?;
        stmt.execute(params![
            entry.path,
            entry.hash,
            entry.entry_type,
            meta_json(entry)?,
            entry.mtime,
            entry.size,
            entry.depth,
            entry.point_geom,
            entry.polygon_geom,
        ])?;
        Ok(())
    }

    /// Rewrites every column of the row at `entry.path`.
    pub fn update(&self, entry: &Entry) -> IndexResult<usize> {
        let mut stmt = self.conn.prepare_cached(UPDATE_ENTRY)?;
        let changed = stmt.execute(params![
            entry.hash,
            entry.entry_type,
            meta_json(entry)?,
            entry.mtime,
            entry.size,
            entry.depth,
            entry.point_geom,
            entry.polygon_geom,
            entry.path,
        ])?;
        Ok(changed)
    }

    pub fn update_mtime(&self, path: &str, mtime: i64) -> IndexResult<usize> {
        let mut stmt = self
            .conn
            .prepare_cached("UPDATE entries SET mtime = ?1 WHERE path = ?2")?;
        Ok(stmt.execute(params![mtime, path])?)
    }

    /// Inserts a synthetic directory row.
    pub fn insert_folder(&self, path: &str, mtime: i64) -> IndexResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO entries (path, hash, type, meta, mtime, size, depth) \
             VALUES (?1, '', ?2, 'null', ?3, 0, ?4)",
        )?;
        stmt.execute(params![path, EntryType::Directory, mtime, depth(path)])?;
        Ok(())
    }

    pub fn delete(&self, path: &str) -> IndexResult<usize> {
        let mut stmt = self
            .conn
            .prepare_cached("DELETE FROM entries WHERE path = ?1")?;
        Ok(stmt.execute([path])?)
    }

    pub fn delete_matching(&self, pattern: &LikePattern) -> IndexResult<usize> {
        let mut stmt = self
            .conn
            .prepare_cached("DELETE FROM entries WHERE path LIKE ?1 ESCAPE '/'")?;
        Ok(stmt.execute([pattern.as_str()])?)
    }

    /// Renames the row at `source` to `dest`, recomputing its depth.
    pub fn replace_path(&self, source: &str, dest: &str) -> IndexResult<usize> {
        let mut stmt = self
            .conn
            .prepare_cached("UPDATE entries SET path = ?1, depth = ?2 WHERE path = ?3")?;
        Ok(stmt.execute(params![dest, depth(dest), source])?)
    }

    // ===========================================
    // Attributes
    // ===========================================

    pub fn attribute(&self, name: &str) -> IndexResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM attributes WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_attribute(&self, name: &str, value: &str) -> IndexResult<()> {
        self.conn.execute(
            "INSERT INTO attributes (name, value) VALUES (?1, ?2) \
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            [name, value],
        )?;
        Ok(())
    }
}

fn meta_json(entry: &Entry) -> IndexResult<String> {
    serde_json::to_string(&entry.meta).map_err(|e| {
        crate::index::IndexError::InvalidData(format!("cannot encode meta of {}: {}", entry.path, e))
    })
}

fn read_state(row: &Row<'_>) -> rusqlite::Result<EntryState> {
    Ok(EntryState {
        path: row.get(0)?,
        mtime: row.get(1)?,
        hash: row.get(2)?,
    })
}

fn read_entry(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let meta: Option<String> = row.get(3)?;
    let meta = match meta {
        Some(text) => serde_json::from_str(&text)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
        None => serde_json::Value::Null,
    };

    Ok(Entry {
        path: row.get(0)?,
        hash: row.get(1)?,
        entry_type: row.get(2)?,
        meta,
        mtime: row.get(4)?,
        size: row.get(5)?,
        depth: row.get(6)?,
        point_geom: row.get(7)?,
        polygon_geom: row.get(8)?,
    })
}

// ===========================================
// Column Conversions
// ===========================================

impl ToSql for EntryType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for EntryType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_i64()?;
        EntryType::from_code(code).ok_or(FromSqlError::OutOfRange(code))
    }
}

impl ToSql for Geometry {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_wkt()))
    }
}

impl FromSql for Geometry {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Geometry::from_wkt(value.as_str()?).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
