//! Command handlers for the filebot binary.

use super::{CacheCommands, ConsoleTransport};
use filebot::{
    AccessPolicy, ChatTransport, CommandContext, CommandRouter, ContentDigest, DispatchOutcome,
    FileCommands, FilebotConfig, FilebotResult, IncomingCommand, LibraryStats, MediaHandleStore,
    UploadMemoizer, locate, register_file_commands,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

const STATS_TOP_NAMES: usize = 10;

/// Print library files matching `terms`.
#[instrument(skip(config))]
pub fn run_search(config: &FilebotConfig, terms: &[String]) -> FilebotResult<()> {
    config.validate()?;
    let result = locate(terms, &config.source.dir)?;

    if result.is_empty() {
        println!("No files found for search term '{}'", result.query);
        return Ok(());
    }

    println!("Results for '{}':", result.query);
    let base = config.dest.public_url.trim_end_matches('/');
    for relative in result.sorted() {
        println!("  {}  {}/{}", relative.display(), base, relative.display());
    }
    Ok(())
}

/// Print the content digest of `file`.
pub async fn run_digest(file: &Path) -> FilebotResult<()> {
    let digest = ContentDigest::from_file(file).await?;
    println!("{}  {}", digest, file.display());
    Ok(())
}

/// Handle `filebot cache ...`. Never modifies the store file.
#[instrument(skip(config))]
pub async fn handle_cache_command(config: &FilebotConfig, command: CacheCommands) -> FilebotResult<()> {
    let memoizer = UploadMemoizer::new(MediaHandleStore::load_read_only(&config.cache.path).await?);

    match command {
        CacheCommands::List => {
            let records = memoizer.records().await;
            for (digest, handle) in &records {
                println!("{}  {}", digest, handle);
            }
            println!("{} cached handle(s) in {}", records.len(), config.cache.path.display());
        }
        CacheCommands::Lookup { file } => match memoizer.lookup(&file).await? {
            Some(handle) => println!("{}", handle),
            None => println!("{} has not been uploaded yet", file.display()),
        },
    }
    Ok(())
}

/// Print library statistics.
pub fn run_stats(config: &FilebotConfig) -> FilebotResult<()> {
    config.validate()?;
    let stats = LibraryStats::collect(&config.source.dir)?;
    print!("{}", stats.render_markdown(STATS_TOP_NAMES));
    Ok(())
}

/// Dispatch one chat command through the router, printing the replies.
///
/// Uses an ephemeral handle store: console handles never reach the real
/// cache.
#[instrument(skip(config, args))]
pub async fn run_exec(
    config: &FilebotConfig,
    command: &str,
    args: &[String],
    user: Option<i64>,
) -> FilebotResult<DispatchOutcome> {
    config.validate()?;

    let memoizer = Arc::new(UploadMemoizer::new(MediaHandleStore::ephemeral()));
    let commands = Arc::new(FileCommands::new(
        &config.source.dir,
        &config.dest.public_url,
        &config.logging.file,
        memoizer,
    ));

    let mut router = CommandRouter::new();
    register_file_commands(
        &mut router,
        commands,
        Arc::new(AccessPolicy::new(config.bot.admins.iter().copied())),
    );

    let user_id = user
        .or_else(|| config.bot.admins.first().copied())
        .unwrap_or_default();
    let text = std::iter::once(format!("/{}", command.trim_start_matches('/')))
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ");
    let message = match IncomingCommand::parse(&text, 0, 0, user_id) {
        Ok(message) => message,
        Err(e) => {
            println!("{}", e.kind);
            return Ok(DispatchOutcome::Unknown);
        }
    };

    let transport: Arc<dyn ChatTransport> = Arc::new(ConsoleTransport::new());
    let outcome = router.dispatch(&CommandContext::new(message, transport)).await;
    info!(?outcome, "Local command finished");

    if outcome == DispatchOutcome::Unknown {
        println!("Unknown command '{}'. Available: {}", command, router.commands().join(", "));
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with_cache(path: &Path) -> FilebotConfig {
        let mut config = FilebotConfig::from_toml_str("").unwrap();
        config.cache.path = path.to_path_buf();
        config
    }

    #[tokio::test]
    async fn test_cache_list_leaves_corrupt_store_untouched() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("tg_file_ids.json");
        std::fs::write(&store, [0x80, 0xff, b'{']).unwrap();

        handle_cache_command(&config_with_cache(&store), CacheCommands::List)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&store).unwrap(), vec![0x80, 0xff, b'{']);
        assert!(!dir.path().join("tg_file_ids.json.corrupt").exists());
    }

    #[tokio::test]
    async fn test_cache_lookup_does_not_create_store() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("tg_file_ids.json");
        let file = dir.path().join("alice_trip.jpg");
        std::fs::write(&file, b"jpeg").unwrap();

        handle_cache_command(&config_with_cache(&store), CacheCommands::Lookup { file })
            .await
            .unwrap();

        assert!(!store.exists());
    }
}
