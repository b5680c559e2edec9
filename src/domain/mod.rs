//! Core types: Entry, EntryType, Geometry and repository-relative paths

mod entry;
mod geometry;
mod repo_path;

pub use entry::{Entry, EntryType};
pub use geometry::{Coord, Geometry, GeometryError};
pub use repo_path::{
    METADATA_DIR, ancestors, depth, ends_with_separator, has_dot_notation, is_contained_in,
    is_metadata_dir, is_parent_of, is_sane_filename, normalize, parent_path, relative_generic,
};
