//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod logging;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// geodex - index a directory tree of files into a local SQLite database
#[derive(Parser, Debug)]
#[command(name = "geodex", version, about, long_about = None)]
pub struct Cli {
    /// Repository directory (overrides config file)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty index in the repository directory
    Init,

    /// Add files and directories to the index
    Add(AddArgs),

    /// Remove entries from the index
    #[command(name = "rm")]
    Remove(RemoveArgs),

    /// Reconcile the index with the filesystem
    Sync(SyncArgs),

    /// Move or rename an entry inside the index
    Mv(MvArgs),

    /// List indexed entries
    #[command(name = "ls")]
    List(ListArgs),

    /// Restore on-disk modification times from the index
    SyncMtimes(SyncMtimesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `add` command
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Files or directories to add (directories are added recursively)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `rm` command
#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Paths to remove; `*` matches any run of characters
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `sync` command
#[derive(Parser, Debug)]
pub struct SyncArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `mv` command
#[derive(Parser, Debug)]
pub struct MvArgs {
    /// Current path, relative to the repository root
    pub source: String,

    /// New path, relative to the repository root
    pub dest: String,
}

/// Arguments for the `ls` command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Path pattern relative to the repository root; `*` is a wildcard
    #[arg(default_value = "")]
    pub pattern: String,

    /// Only list entries less than N levels deep (0 lists everything)
    #[arg(long, default_value_t = 0)]
    pub depth: u32,

    /// List the contents of the folder instead of the folder itself
    #[arg(long)]
    pub folder: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `sync-mtimes` command
#[derive(Parser, Debug)]
pub struct SyncMtimesArgs {
    /// Only these paths, relative to the repository root (default: all files)
    pub files: Vec<String>,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
