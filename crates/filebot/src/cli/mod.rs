//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the filebot binary.

mod commands;
mod console;
mod handlers;

pub use commands::{CacheCommands, Cli, Commands};
pub use console::ConsoleTransport;
pub use handlers::{handle_cache_command, run_digest, run_exec, run_search, run_stats};
