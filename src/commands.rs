// src/commands.rs
//! Command handlers for the crawldb CLI

use crate::cli::Cli;
use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use crawldb::{ConversionJob, ConvertOptions};
use std::io;
use std::path::Path;
use tracing::info;

/// Convert a crawl database to the text key encoding and install the
/// result as the destination's current generation.
pub fn cmd_convert(old_db: &Path, new_db: &Path, with_metadata: bool) -> Result<()> {
    info!(
        "converting crawl database at {} (metadata keys: {})",
        old_db.display(),
        if with_metadata { "yes" } else { "no" }
    );

    let options = ConvertOptions {
        convert_metadata: with_metadata,
    };
    let summary = ConversionJob::new(old_db, new_db, options)
        .run()
        .with_context(|| format!("failed to convert crawl database at '{}'", old_db.display()))?;

    info!(
        "conversion finished: {} records in {:.2?}",
        summary.records, summary.elapsed
    );
    println!(
        "Converted {} record(s) into {}",
        summary.records,
        new_db.display()
    );
    if with_metadata {
        println!(
            "Rewrote {} legacy metadata key(s)",
            summary.metadata_keys_rewritten
        );
    }

    Ok(())
}

/// Print a completion script for the given shell to stdout.
pub fn cmd_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "crawldb", &mut io::stdout());
    Ok(())
}
