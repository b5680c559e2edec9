//! Entry metadata extraction.
//!
//! Full EXIF/XMP parsing and geometry computation live outside this crate;
//! the [`Extractor`] trait is the seam where they plug in.

use crate::domain::{Entry, EntryType, depth, is_metadata_dir, relative_generic};
use crate::infra::content_hash::ContentHash;
use crate::infra::fs::{FsError, modified_time};
use serde_json::json;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while extracting an entry's metadata.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("path is outside the repository root: {path}")]
    OutsideRoot { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Fs(#[from] FsError),
}

/// Populates an [`Entry`] from a file on disk.
pub trait Extractor {
    /// Fills `entry` with path, depth, type, size, mtime, hash, meta and
    /// geometry for `path`, which must lie within `root`.
    ///
    /// When `compute_hash` is set and `entry.hash` is still empty, the content
    /// hash is computed. A hash already filled in by the change detector is
    /// kept as is.
    fn extract(
        &self,
        path: &Path,
        root: &Path,
        entry: &mut Entry,
        compute_hash: bool,
    ) -> Result<(), ExtractError>;
}

/// Extractor that classifies files by extension and records filesystem
/// attributes only.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicExtractor;

impl Extractor for BasicExtractor {
    fn extract(
        &self,
        path: &Path,
        root: &Path,
        entry: &mut Entry,
        compute_hash: bool,
    ) -> Result<(), ExtractError> {
        let rel = relative_generic(path, root).ok_or_else(|| ExtractError::OutsideRoot {
            path: path.to_path_buf(),
        })?;
        let meta = std::fs::metadata(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        entry.depth = depth(&rel);
        entry.path = rel;
        entry.mtime = modified_time(path)?;

        if meta.is_dir() {
            entry.entry_type = if is_metadata_dir(path) {
                EntryType::Repository
            } else {
                EntryType::Directory
            };
            entry.hash.clear();
            entry.size = 0;
            entry.meta = serde_json::Value::Null;
            return Ok(());
        }

        entry.entry_type = classify_extension(path);
        entry.size = meta.len() as i64;
        entry.meta = json!({});

        if compute_hash && entry.hash.is_empty() {
            entry.hash = ContentHash::of_file(path)
                .map_err(|source| ExtractError::Io {
                    path: path.to_path_buf(),
                    source,
                })?
                .into_string();
        }

        Ok(())
    }
}

/// Infers an entry type from a file extension (case-insensitive).
pub fn classify_extension(path: &Path) -> EntryType {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" | "png" | "dng" => EntryType::Image,
        "tif" | "tiff" => EntryType::GeoRaster,
        "las" | "laz" | "ply" | "e57" => EntryType::PointCloud,
        "md" | "markdown" => EntryType::Markdown,
        "mp4" | "mov" | "avi" | "mkv" => EntryType::Video,
        "obj" | "glb" | "gltf" => EntryType::Model,
        "geojson" | "shp" | "kml" | "kmz" | "gpkg" | "dxf" => EntryType::Vector,
        _ => EntryType::Generic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn extracts_file_attributes() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("flight")).unwrap();
        let path = dir.path().join("flight/IMG_0001.JPG");
        fs::write(&path, b"hello world").unwrap();

        let mut entry = Entry::default();
        BasicExtractor
            .extract(&path, dir.path(), &mut entry, true)
            .unwrap();

        assert_eq!(entry.path, "flight/IMG_0001.JPG");
        assert_eq!(entry.depth, 1);
        assert_eq!(entry.entry_type, EntryType::Image);
        assert_eq!(entry.size, 11);
        assert_eq!(entry.hash, ContentHash::compute(b"hello world").as_str());
        assert_eq!(entry.meta, json!({}));
    }

    #[test]
    fn skips_hash_when_not_requested() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, b"# notes").unwrap();

        let mut entry = Entry::default();
        BasicExtractor
            .extract(&path, dir.path(), &mut entry, false)
            .unwrap();

        assert_eq!(entry.entry_type, EntryType::Markdown);
        assert!(entry.hash.is_empty());
    }

    #[test]
    fn keeps_precomputed_hash() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.bin");
        fs::write(&path, b"data").unwrap();

        let mut entry = Entry {
            hash: "precomputed".to_string(),
            ..Entry::default()
        };
        BasicExtractor
            .extract(&path, dir.path(), &mut entry, true)
            .unwrap();

        assert_eq!(entry.hash, "precomputed");
        assert_eq!(entry.entry_type, EntryType::Generic);
    }

    #[test]
    fn directories_have_no_hash_or_meta() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("survey");
        fs::create_dir(&path).unwrap();

        let mut entry = Entry::default();
        BasicExtractor
            .extract(&path, dir.path(), &mut entry, true)
            .unwrap();

        assert_eq!(entry.entry_type, EntryType::Directory);
        assert!(entry.hash.is_empty());
        assert_eq!(entry.meta, serde_json::Value::Null);
        assert_eq!(entry.size, 0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut entry = Entry::default();
        let err = BasicExtractor
            .extract(&dir.path().join("gone.jpg"), dir.path(), &mut entry, true)
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }

    #[test]
    fn outside_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let mut entry = Entry::default();
        let err = BasicExtractor
            .extract(other.path(), dir.path(), &mut entry, true)
            .unwrap_err();
        assert!(matches!(err, ExtractError::OutsideRoot { .. }));
    }
}
