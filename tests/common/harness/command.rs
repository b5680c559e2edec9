//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since this is a test utility shared by several test binaries
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Fluent wrapper around `assert_cmd::Command` for the `geodex` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct GeodexCommand {
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    config_home: Option<PathBuf>,
}

impl GeodexCommand {
    /// Creates a new command for the `geodex` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            config_home: None,
        }
    }

    /// Sets the `--dir` option to specify the repository directory.
    pub fn dir(mut self, path: &Path) -> Self {
        self.args.push("--dir".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Runs the binary from `path`.
    pub fn current_dir(mut self, path: &Path) -> Self {
        self.current_dir = Some(path.to_path_buf());
        self
    }

    /// Points the config lookup at `path` so the user's real config is
    /// never read.
    pub fn config_home(mut self, path: &Path) -> Self {
        self.config_home = Some(path.to_path_buf());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("geodex").expect("Failed to find geodex binary");
        cmd.args(&self.args).env_remove("RUST_LOG");
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        if let Some(home) = &self.config_home {
            cmd.env("XDG_CONFIG_HOME", home).env("HOME", home);
        }
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `init` command.
    pub fn init(self) -> Self {
        self.args(["init"])
    }

    /// Configures for the `add` command with paths.
    pub fn add<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args(["add"]).args(paths)
    }

    /// Configures for the `rm` command with paths.
    pub fn rm<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args(["rm"]).args(paths)
    }

    /// Configures for the `sync` command.
    pub fn sync(self) -> Self {
        self.args(["sync"])
    }

    /// Configures for the `mv` command.
    pub fn mv(self, source: &str, dest: &str) -> Self {
        self.args(["mv", source, dest])
    }

    /// Configures for the `ls` command.
    pub fn ls(self) -> Self {
        self.args(["ls"])
    }

    // ===========================================
    // Format Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }

    /// Adds `--format paths` to the command.
    pub fn format_paths(self) -> Self {
        self.args(["--format", "paths"])
    }
}

impl Default for GeodexCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builds_args() {
        let cmd = GeodexCommand::new()
            .dir(Path::new("/data/repo"))
            .add(["a.jpg", "b"]);
        assert_eq!(cmd.get_args(), ["--dir", "/data/repo", "add", "a.jpg", "b"]);
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = GeodexCommand::new().ls().format_json();
        let args = cmd.get_args();
        assert!(args.contains(&"ls".to_string()));
        assert!(args.contains(&"--format".to_string()));
        assert!(args.contains(&"json".to_string()));
    }
}
