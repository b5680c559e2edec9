//! Isolated test environment with temp directory.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use super::GeodexCommand;
use geodex::index::{IndexResult, Repository};
use geodex::infra::set_modified_time;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Base modification time for files written by the harness.
pub const BASE_MTIME: i64 = 1_500_000_000;

/// Isolated test environment with a temporary repository directory.
///
/// The repository lives in `repo/` and the CLI's config directory in
/// `config/`, both inside one temp directory that is removed on drop.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    /// Path to the repository directory
    repo_dir: PathBuf,
    /// Path used as the config home for CLI runs
    config_dir: PathBuf,
}

impl TestEnv {
    /// Creates a new environment with an empty, uninitialized repository
    /// directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let repo_dir = temp_dir.path().join("repo");
        let config_dir = temp_dir.path().join("config");
        std::fs::create_dir_all(&repo_dir).expect("Failed to create repo directory");
        std::fs::create_dir_all(&config_dir).expect("Failed to create config directory");
        Self {
            _temp_dir: temp_dir,
            repo_dir,
            config_dir,
        }
    }

    /// Creates a new environment and initializes the index in it.
    pub fn initialized() -> Self {
        let env = Self::new();
        Repository::init(&env.repo_dir).expect("Failed to init repository");
        env
    }

    /// Returns the path to the repository directory.
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Returns the directory used as the CLI's config home.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Returns the path of the index database.
    pub fn index_path(&self) -> PathBuf {
        self.repo_dir.join(".ddb").join("dbase.sqlite")
    }

    /// Returns the absolute path of a repository-relative path.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.repo_dir.join(rel)
    }

    /// Writes a file (creating parent folders) with `BASE_MTIME` and returns
    /// its path.
    pub fn write_file(&self, rel: &str, content: &[u8]) -> PathBuf {
        self.write_file_at(rel, content, BASE_MTIME)
    }

    /// Writes a file with a specific modification time.
    pub fn write_file_at(&self, rel: &str, content: &[u8], mtime: i64) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        set_modified_time(&path, mtime).expect("Failed to set mtime");
        path
    }

    /// Sets the modification time of a repository-relative path.
    pub fn set_mtime(&self, rel: &str, mtime: i64) {
        set_modified_time(&self.path(rel), mtime).expect("Failed to set mtime");
    }

    /// Opens the repository through the library.
    pub fn open(&self) -> IndexResult<Repository> {
        Repository::open(&self.repo_dir, false)
    }

    /// Returns every indexed path, sorted.
    pub fn indexed_paths(&self) -> Vec<String> {
        self.open()
            .expect("Failed to open repository")
            .get_matching_entries("", 0, false)
            .expect("Failed to list entries")
            .into_iter()
            .map(|e| e.path)
            .collect()
    }

    /// Creates a GeodexCommand configured for this test environment.
    pub fn cmd(&self) -> GeodexCommand {
        GeodexCommand::new()
            .current_dir(&self.repo_dir)
            .config_home(&self.config_dir)
            .dir(&self.repo_dir)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_creates_temp_directory() {
        let env = TestEnv::new();
        assert!(env.repo_dir().is_dir(), "repo directory should exist");
        assert!(!env.index_path().exists(), "index should not exist yet");
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.repo_dir().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_env_initialized_has_index() {
        let env = TestEnv::initialized();
        assert!(env.index_path().exists());
        assert!(env.indexed_paths().is_empty());
    }

    #[test]
    fn test_env_write_file_sets_mtime() {
        let env = TestEnv::new();
        let path = env.write_file("a/b/c.jpg", b"bytes");
        assert!(path.is_file());
        assert_eq!(geodex::infra::modified_time(&path).unwrap(), BASE_MTIME);
    }
}
