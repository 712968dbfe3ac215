//! filebot CLI binary.
//!
//! Local access to the pieces the chat bot is built from:
//! - Search the library and print statistics
//! - Hash files and inspect the handle cache
//! - Run chat commands against a console transport

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, handle_cache_command, run_digest, run_exec, run_search, run_stats,
    };

    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = filebot::FilebotConfig::load(cli.config.as_deref())?;
    filebot::init_logging(&config.logging, cli.verbose)?;

    // Execute the requested command
    match cli.command {
        Commands::Search { terms } => {
            run_search(&config, &terms)?;
        }

        Commands::Digest { file } => {
            run_digest(&file).await?;
        }

        Commands::Cache(cache_cmd) => {
            handle_cache_command(&config, cache_cmd).await?;
        }

        Commands::Stats => {
            run_stats(&config)?;
        }

        Commands::Exec {
            command,
            args,
            user,
        } => {
            run_exec(&config, &command, &args, user).await?;
        }
    }

    Ok(())
}
