//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
    /// Plain file paths, one per line
    Paths,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// What happened to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Updated,
    Removed,
}

impl ChangeKind {
    /// Single-letter prefix used in human output.
    pub fn prefix(self) -> char {
        match self {
            ChangeKind::Added => 'A',
            ChangeKind::Updated => 'U',
            ChangeKind::Removed => 'D',
        }
    }
}

/// A single changed entry in command output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeListing {
    pub status: ChangeKind,
    pub path: String,
}

impl ChangeListing {
    pub fn new(status: ChangeKind, path: impl Into<String>) -> Self {
        Self {
            status,
            path: path.into(),
        }
    }
}

/// Prints changes in the requested format.
pub fn print_changes(changes: &[ChangeListing], format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Human => {
            for change in changes {
                println!("{}\t{}", change.status.prefix(), change.path);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&Output::new(changes))?);
        }
        OutputFormat::Paths => {
            for change in changes {
                println!("{}", change.path);
            }
        }
    }
    Ok(())
}
