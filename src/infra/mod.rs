//! Filesystem collaborators: hashing, traversal, extraction, build cache

mod build_cache;
mod content_hash;
mod extract;
mod fs;

pub use build_cache::{BuildCache, BuildFolderCache};
pub use content_hash::{ContentHash, ContentHashError};
pub use extract::{BasicExtractor, ExtractError, Extractor, classify_extension};
pub use fs::{FsError, WalkItem, modified_time, remove_dir_if_exists, set_modified_time, walk_tree};
