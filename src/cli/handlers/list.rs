//! List command handler.

use anyhow::{Context, Result};
use std::path::Path;

use super::{format_size, open_repository};
use crate::cli::ListArgs;
use crate::cli::config::Config;
use crate::cli::output::{Output, OutputFormat};
use crate::domain::Entry;

pub fn handle_list(args: &ListArgs, dir: &Path, config: &Config) -> Result<()> {
    let repo = open_repository(dir, config)?;

    let entries = repo
        .get_matching_entries(&args.pattern, args.depth, args.folder)
        .with_context(|| format!("failed to list entries matching '{}'", args.pattern))?;

    match args.format {
        OutputFormat::Human => {
            if entries.is_empty() {
                println!("No entries found.");
            } else {
                for entry in &entries {
                    println!("{}", format_row(entry));
                }
                println!();
                println!("{} entries", entries.len());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&Output::new(&entries))?);
        }
        OutputFormat::Paths => {
            for entry in &entries {
                println!("{}", repo.root().join(&entry.path).display());
            }
        }
    }

    Ok(())
}

/// One human-readable listing line: type, size, path.
pub(crate) fn format_row(entry: &Entry) -> String {
    let size = if entry.entry_type.is_folder() {
        "-".to_string()
    } else {
        format_size(entry.size)
    };
    format!("{:<12}  {:>9}  {}", entry.entry_type.human(), size, entry.path)
}
