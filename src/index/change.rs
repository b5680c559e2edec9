//! Two-tier change detection: modification time first, content hash second.

use crate::domain::Entry;
use crate::index::IndexResult;
use crate::infra::{ContentHash, FsError, modified_time};
use std::path::Path;
use tracing::debug;

/// How a path on disk compares to its stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// The path no longer exists.
    Deleted,
    /// The content hash differs from the stored hash.
    Modified,
    /// Same mtime, or a different mtime but identical content.
    NotModified,
}

/// Classifies `path` against its stored `(mtime, hash)`.
///
/// Directories are always `NotModified`. For files the current mtime is
/// written to `entry.mtime`; only when it differs from `db_mtime` is the file
/// hashed, and the fresh hash is written to `entry.hash`.
///
/// A file whose bytes change while its mtime stays the same is reported as
/// `NotModified`: the mtime comparison is trusted and hashing is skipped.
/// Callers that see `NotModified` with `entry.mtime != db_mtime` should
/// persist the new mtime.
pub fn check_update(
    entry: &mut Entry,
    path: &Path,
    db_mtime: i64,
    db_hash: &str,
) -> IndexResult<FileStatus> {
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileStatus::Deleted),
        Err(e) => return Err(FsError::from_io(path, e).into()),
    };

    if meta.is_dir() {
        return Ok(FileStatus::NotModified);
    }

    entry.mtime = modified_time(path)?;
    if entry.mtime == db_mtime {
        return Ok(FileStatus::NotModified);
    }

    debug!(
        "{} modified time ({}) differs from file value: {}",
        path.display(),
        db_mtime,
        entry.mtime
    );

    entry.hash = ContentHash::of_file(path)
        .map_err(|e| FsError::from_io(path, e))?
        .into_string();

    if entry.hash != db_hash {
        debug!(
            "{} hash differs (old: {} | new: {})",
            path.display(),
            db_hash,
            entry.hash
        );
        return Ok(FileStatus::Modified);
    }

    Ok(FileStatus::NotModified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::set_modified_time;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const T0: i64 = 1_500_000_000;

    fn file_with(dir: &TempDir, name: &str, bytes: &[u8], mtime: i64) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        set_modified_time(&path, mtime).unwrap();
        path
    }

    #[test]
    fn missing_path_is_deleted() {
        let dir = TempDir::new().unwrap();
        let mut e = Entry::default();
        let status = check_update(&mut e, &dir.path().join("gone.jpg"), T0, "x").unwrap();
        assert_eq!(status, FileStatus::Deleted);
    }

    #[test]
    fn directory_is_never_modified() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let mut e = Entry::default();
        assert_eq!(
            check_update(&mut e, &sub, 0, "").unwrap(),
            FileStatus::NotModified
        );
    }

    #[test]
    fn same_mtime_skips_hashing() {
        let dir = TempDir::new().unwrap();
        let path = file_with(&dir, "a.jpg", b"original", T0);
        let stored = ContentHash::compute(b"original").into_string();

        // Corrupt the bytes offline but force the mtime back.
        fs::write(&path, b"corrupted").unwrap();
        set_modified_time(&path, T0).unwrap();

        let mut e = Entry::default();
        let status = check_update(&mut e, &path, T0, &stored).unwrap();

        assert_eq!(status, FileStatus::NotModified);
        assert!(e.hash.is_empty(), "hash must not be computed");
    }

    #[test]
    fn touched_file_with_same_bytes_is_not_modified() {
        let dir = TempDir::new().unwrap();
        let path = file_with(&dir, "a.jpg", b"same", T0 + 60);
        let stored = ContentHash::compute(b"same").into_string();

        let mut e = Entry::default();
        let status = check_update(&mut e, &path, T0, &stored).unwrap();

        assert_eq!(status, FileStatus::NotModified);
        assert_eq!(e.mtime, T0 + 60);
        assert_eq!(e.hash, stored);
    }

    #[test]
    fn changed_bytes_and_mtime_is_modified() {
        let dir = TempDir::new().unwrap();
        let path = file_with(&dir, "a.jpg", b"new bytes", T0 + 60);
        let stored = ContentHash::compute(b"old bytes").into_string();

        let mut e = Entry::default();
        let status = check_update(&mut e, &path, T0, &stored).unwrap();

        assert_eq!(status, FileStatus::Modified);
        assert_eq!(e.hash, ContentHash::compute(b"new bytes").as_str());
        assert_eq!(e.mtime, T0 + 60);
    }
}
