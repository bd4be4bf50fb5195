// src/cli.rs
//! CLI definitions for the crawldb tool
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crawldb")]
#[command(author, version)]
#[command(about = "Crawl database maintenance with atomic generation installs", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a database from the legacy key encoding to the text encoding
    Convert {
        /// Database whose current generation uses the legacy key encoding
        old_db: PathBuf,

        /// Database that receives the converted store as its current generation
        new_db: PathBuf,

        /// Also rewrite legacy-encoded metadata keys to the text encoding
        #[arg(long)]
        with_metadata: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}
