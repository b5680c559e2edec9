use super::*;
use crate::domain::{Coord, Entry, EntryType, Geometry, depth};
use crate::index::{IndexError, LikePattern};
use serde_json::json;
use tempfile::tempdir;

fn sample_entry(path: &str) -> Entry {
    Entry {
        path: path.to_string(),
        hash: format!("hash-of-{path}"),
        entry_type: EntryType::GeoImage,
        meta: json!({"make": "DJI"}),
        mtime: 1_600_000_000,
        size: 1024,
        depth: depth(path),
        point_geom: Some(Geometry::Point(Coord::with_z(12.5, 41.9, 120.0))),
        polygon_geom: None,
    }
}

fn seeded(paths: &[&str]) -> SqliteIndex {
    let index = SqliteIndex::open_in_memory().unwrap();
    for p in paths {
        index.entries().insert(&sample_entry(p)).unwrap();
    }
    index
}

fn all_paths(index: &SqliteIndex) -> Vec<String> {
    index
        .entries()
        .all_states()
        .unwrap()
        .into_iter()
        .map(|s| s.path)
        .collect()
}

// ===========================================
// Cycle 1: Connections
// ===========================================

#[test]
fn open_in_memory_initializes_schema() {
    let index = SqliteIndex::open_in_memory().unwrap();

    let table_exists: bool = index
        .conn()
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='entries'",
            [],
            |_| Ok(true),
        )
        .unwrap_or(false);

    assert!(table_exists, "entries table should exist after open_in_memory");
}

#[test]
fn like_is_case_sensitive() {
    let index = seeded(&["Photo.JPG"]);
    let rows = index
        .entries()
        .matching(&LikePattern::path("photo.jpg"), 0)
        .unwrap();
    assert!(rows.is_empty(), "LIKE must not fold case");
}

#[test]
fn parent_path_function_is_registered() {
    let index = SqliteIndex::open_in_memory().unwrap();
    let parent: String = index
        .conn()
        .query_row("SELECT parent_path('a/b/c.jpg')", [], |row| row.get(0))
        .unwrap();
    assert_eq!(parent, "a/b");
}

#[test]
fn open_creates_parent_directory() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join(".ddb").join("dbase.sqlite");

    let _index = SqliteIndex::open(&db_path).unwrap();

    assert!(db_path.exists(), "database file should be created");
}

#[test]
fn open_existing_preserves_data() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("dbase.sqlite");

    {
        let index = SqliteIndex::open(&db_path).unwrap();
        index.entries().insert(&sample_entry("a.jpg")).unwrap();
    }

    let index = SqliteIndex::open(&db_path).unwrap();
    assert!(index.entries().state("a.jpg").unwrap().is_some());
}

// ===========================================
// Cycle 2: Transactions
// ===========================================

#[test]
fn commit_persists_changes() {
    let mut index = SqliteIndex::open_in_memory().unwrap();

    let tx = index.exclusive_transaction().unwrap();
    tx.entries().insert(&sample_entry("a.jpg")).unwrap();
    tx.commit().unwrap();

    assert!(index.entries().state("a.jpg").unwrap().is_some());
}

#[test]
fn drop_without_commit_rolls_back() {
    let mut index = SqliteIndex::open_in_memory().unwrap();

    {
        let tx = index.exclusive_transaction().unwrap();
        tx.entries().insert(&sample_entry("a.jpg")).unwrap();
    }

    assert!(index.entries().state("a.jpg").unwrap().is_none());
}

#[test]
fn explicit_rollback_discards_changes() {
    let mut index = seeded(&["a.jpg"]);

    let tx = index.exclusive_transaction().unwrap();
    tx.entries().delete("a.jpg").unwrap();
    tx.rollback().unwrap();

    assert!(index.entries().state("a.jpg").unwrap().is_some());
}

#[test]
fn exclusive_transaction_blocks_second_writer() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("dbase.sqlite");
    let mut first = SqliteIndex::open(&db_path).unwrap();
    let mut second = SqliteIndex::open(&db_path).unwrap();
    second
        .set_busy_timeout(std::time::Duration::from_millis(10))
        .unwrap();

    let tx = first.exclusive_transaction().unwrap();
    let err = second.exclusive_transaction().err().unwrap();
    assert!(matches!(err, IndexError::Database(_)));
    tx.commit().unwrap();

    assert!(second.exclusive_transaction().is_ok());
}

// ===========================================
// Cycle 3: Row Round-Trips
// ===========================================

#[test]
fn insert_then_get_returns_all_columns() {
    let index = seeded(&["flight/DJI_0001.JPG"]);

    let entry = index.entries().get("flight/DJI_0001.JPG").unwrap().unwrap();

    assert_eq!(entry, sample_entry("flight/DJI_0001.JPG"));
}

#[test]
fn get_missing_returns_none() {
    let index = SqliteIndex::open_in_memory().unwrap();
    assert!(index.entries().get("nope").unwrap().is_none());
    assert!(index.entries().state("nope").unwrap().is_none());
}

#[test]
fn duplicate_insert_fails() {
    let index = seeded(&["a.jpg"]);
    let err = index.entries().insert(&sample_entry("a.jpg")).unwrap_err();
    assert!(matches!(err, IndexError::Database(_)));
}

#[test]
fn update_rewrites_columns() {
    let index = seeded(&["a.jpg"]);
    let mut entry = sample_entry("a.jpg");
    entry.hash = "new".to_string();
    entry.size = 7;
    entry.point_geom = None;

    assert_eq!(index.entries().update(&entry).unwrap(), 1);
    assert_eq!(index.entries().get("a.jpg").unwrap().unwrap(), entry);
}

#[test]
fn update_mtime_only_touches_mtime() {
    let index = seeded(&["a.jpg"]);
    index.entries().update_mtime("a.jpg", 42).unwrap();

    let state = index.entries().state("a.jpg").unwrap().unwrap();
    assert_eq!(state.mtime, 42);
    assert_eq!(state.hash, "hash-of-a.jpg");
}

#[test]
fn unknown_type_code_is_rejected_on_read() {
    let index = SqliteIndex::open_in_memory().unwrap();
    index
        .conn()
        .execute(
            "INSERT INTO entries (path, type, mtime, depth) VALUES ('x', 99, 0, 0)",
            [],
        )
        .unwrap();
    assert!(index.entries().get("x").is_err());
}

// ===========================================
// Cycle 4: Pattern Queries
// ===========================================

#[test]
fn matching_honors_max_depth() {
    let index = seeded(&["a.jpg", "d/b.jpg", "d/e/c.jpg"]);

    let top: Vec<_> = index
        .entries()
        .matching(&LikePattern::path(""), 1)
        .unwrap()
        .into_iter()
        .map(|e| e.path)
        .collect();
    assert_eq!(top, vec!["a.jpg"]);

    let two = index.entries().matching(&LikePattern::path(""), 2).unwrap();
    assert_eq!(two.len(), 2);

    let all = index.entries().matching(&LikePattern::path(""), 0).unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn matching_skips_metadata_rows() {
    let index = seeded(&["a.jpg"]);
    let mut meta = sample_entry(".ddb");
    meta.entry_type = EntryType::Repository;
    index.entries().insert(&meta).unwrap();

    let rows = index.entries().matching(&LikePattern::path("*"), 0).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn folder_paths_includes_self_and_descendants_only() {
    let index = seeded(&["a/x.jpg", "a/y/z.jpg", "ab/x.jpg"]);
    index.entries().insert_folder("a", 0).unwrap();

    assert_eq!(
        index.entries().folder_paths("a").unwrap(),
        vec!["a", "a/x.jpg", "a/y/z.jpg"]
    );
}

#[test]
fn folder_paths_treats_stored_names_literally() {
    let index = seeded(&["a*/x.jpg", "ab/y.jpg", "a%/z.jpg", "a_c/w.jpg"]);
    index.entries().insert_folder("a*", 0).unwrap();

    assert_eq!(
        index.entries().folder_paths("a*").unwrap(),
        vec!["a*", "a*/x.jpg"]
    );
    assert_eq!(
        index.entries().folder_paths("a%").unwrap(),
        vec!["a%/z.jpg"]
    );
}

#[test]
fn delete_matching_removes_descendants() {
    let index = seeded(&["a/x.jpg", "a/y/z.jpg", "b.jpg"]);

    let removed = index
        .entries()
        .delete_matching(&LikePattern::literal_descendants_of("a"))
        .unwrap();

    assert_eq!(removed, 2);
    assert_eq!(all_paths(&index), vec!["b.jpg"]);
}

#[test]
fn replace_path_recomputes_depth() {
    let index = seeded(&["a.jpg"]);
    index.entries().replace_path("a.jpg", "x/y/a.jpg").unwrap();

    let entry = index.entries().get("x/y/a.jpg").unwrap().unwrap();
    assert_eq!(entry.depth, 2);
    assert!(index.entries().state("a.jpg").unwrap().is_none());
}

#[test]
fn file_mtimes_excludes_folders_and_filters() {
    let index = seeded(&["a.jpg", "b.jpg"]);
    index.entries().insert_folder("d", 5).unwrap();

    let all = index.entries().file_mtimes(&[]).unwrap();
    assert_eq!(all.len(), 2);

    let only = index.entries().file_mtimes(&["b.jpg".to_string()]).unwrap();
    assert_eq!(only, vec![("b.jpg".to_string(), 1_600_000_000)]);
}

// ===========================================
// Cycle 5: Attributes
// ===========================================

#[test]
fn attributes_upsert() {
    let index = SqliteIndex::open_in_memory().unwrap();
    assert_eq!(index.entries().attribute("last_update").unwrap(), None);

    index.entries().set_attribute("last_update", "1").unwrap();
    index.entries().set_attribute("last_update", "2").unwrap();

    assert_eq!(
        index.entries().attribute("last_update").unwrap(),
        Some("2".to_string())
    );
}
