//! SQLite-backed entry index and the synchronization operations over it

mod change;
mod folders;
mod mv;
mod paths;
mod repository;
mod sanitize;
mod schema;
mod sqlite;
mod sync;

pub use change::{FileStatus, check_update};
pub use folders::{create_missing_folders, missing_folders};
pub use paths::get_index_path_list;
pub use repository::{BUILD_DIR, DATABASE_FILE, IndexError, IndexResult, Repository};
pub use sanitize::{LIKE_ESCAPE, LikePattern, escape_like_literal, sanitize_query_param};
pub use schema::{create_schema, table_exists};
pub use sqlite::{DEFAULT_BUSY_TIMEOUT, Entries, EntryState, SqliteIndex, Transaction};
pub use sync::SyncResult;
