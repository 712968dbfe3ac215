//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// filebot - find library files and send them to a chat, uploading each content once
#[derive(Parser, Debug)]
#[command(name = "filebot")]
#[command(about = "Find library files and send them to a chat, uploading each content once", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (replaces ./filebot.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr instead of the log file
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List library files whose names contain every term
    Search {
        /// Search terms
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// Print the content digest of a file
    Digest {
        /// File to hash
        file: PathBuf,
    },

    /// Inspect the handle cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Print library statistics
    Stats,

    /// Run a chat command locally, printing replies instead of sending them
    Exec {
        /// Command name without the leading slash (e.g. "pic")
        command: String,

        /// Command arguments
        args: Vec<String>,

        /// Sender user id (defaults to the first configured admin)
        #[arg(long)]
        user: Option<i64>,
    },
}

/// Handle cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// List every cached digest and handle
    List,

    /// Show the cached handle for a file's contents
    Lookup {
        /// File to look up
        file: PathBuf,
    },
}
