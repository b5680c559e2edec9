//! geodex - index a directory tree into a local SQLite database

pub mod cli;
pub mod domain;
pub mod index;
pub mod infra;

use anyhow::Result;
use clap::Parser;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        handle_add, handle_completions, handle_init, handle_list, handle_mv, handle_remove,
        handle_sync, handle_sync_mtimes,
    },
    logging,
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logging::init(cli.verbose, config.log.as_deref());
    let repo_dir = config.repo_dir(cli.dir.as_ref());

    match &cli.command {
        Command::Init => handle_init(&repo_dir),
        Command::Add(args) => handle_add(args, &repo_dir, &config),
        Command::Remove(args) => handle_remove(args, &repo_dir, &config),
        Command::Sync(args) => handle_sync(args, &repo_dir, &config),
        Command::Mv(args) => handle_mv(args, &repo_dir, &config),
        Command::List(args) => handle_list(args, &repo_dir, &config),
        Command::SyncMtimes(args) => handle_sync_mtimes(args, &repo_dir, &config),
        Command::Completions(args) => {
            handle_completions(args);
            Ok(())
        }
    }
}
