//! Index entries and their type classification.

use crate::domain::Geometry;
use serde::{Serialize, Serializer};
use std::fmt;

/// Kind of filesystem object an entry describes.
///
/// Stored as a small integer in the `entries.type` column, so discriminants
/// must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum EntryType {
    #[default]
    Undefined = 0,
    Directory = 1,
    Generic = 2,
    GeoImage = 3,
    GeoRaster = 4,
    PointCloud = 5,
    Image = 6,
    /// The repository's own `.ddb` metadata folder.
    Repository = 7,
    Markdown = 8,
    Video = 9,
    GeoVideo = 10,
    Model = 11,
    Panorama = 12,
    GeoPanorama = 13,
    Vector = 14,
}

impl EntryType {
    const ALL: [EntryType; 15] = [
        EntryType::Undefined,
        EntryType::Directory,
        EntryType::Generic,
        EntryType::GeoImage,
        EntryType::GeoRaster,
        EntryType::PointCloud,
        EntryType::Image,
        EntryType::Repository,
        EntryType::Markdown,
        EntryType::Video,
        EntryType::GeoVideo,
        EntryType::Model,
        EntryType::Panorama,
        EntryType::GeoPanorama,
        EntryType::Vector,
    ];

    /// Returns the integer code stored in the database.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Looks up a type by its stored integer code.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| i64::from(t.code()) == code)
    }

    /// Returns a human-readable name for the type.
    pub fn human(self) -> &'static str {
        match self {
            EntryType::Undefined => "Undefined",
            EntryType::Directory => "Directory",
            EntryType::Generic => "Generic",
            EntryType::GeoImage => "GeoImage",
            EntryType::GeoRaster => "GeoRaster",
            EntryType::PointCloud => "PointCloud",
            EntryType::Image => "Image",
            EntryType::Repository => "Repository",
            EntryType::Markdown => "Markdown",
            EntryType::Video => "Video",
            EntryType::GeoVideo => "GeoVideo",
            EntryType::Model => "Model",
            EntryType::Panorama => "Panorama",
            EntryType::GeoPanorama => "GeoPanorama",
            EntryType::Vector => "Vector",
        }
    }

    /// Returns true for types that are never content-hashed.
    pub fn is_folder(self) -> bool {
        matches!(self, EntryType::Directory | EntryType::Repository)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.human())
    }
}

impl Serialize for EntryType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

/// One row of the index.
///
/// `path` is POSIX-style and relative to the repository root. Folder rows
/// carry an empty `hash` and a `null` `meta`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hash: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub meta: serde_json::Value,
    pub mtime: i64,
    pub size: i64,
    pub depth: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_geom: Option<Geometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon_geom: Option<Geometry>,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            path: String::new(),
            hash: String::new(),
            entry_type: EntryType::Undefined,
            meta: serde_json::Value::Null,
            mtime: 0,
            size: 0,
            depth: 0,
            point_geom: None,
            polygon_geom: None,
        }
    }
}

impl Entry {
    /// Creates a synthetic directory row for `path`.
    pub fn folder(path: impl Into<String>, mtime: i64) -> Self {
        let path = path.into();
        let depth = crate::domain::depth(&path);
        Self {
            path,
            entry_type: EntryType::Directory,
            mtime,
            depth,
            ..Self::default()
        }
    }

    /// Returns true if this entry is a directory row.
    pub fn is_directory(&self) -> bool {
        self.entry_type == EntryType::Directory
    }
}
