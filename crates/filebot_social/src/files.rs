//! File library commands: `/search`, `/pic`, `/getfile`, `/stats`, `/log`.

use crate::{
    AccessPolicy, ChatAction, CommandContext, CommandError, CommandErrorKind, CommandHandler,
    CommandResult, CommandRouter, InputFile, Restricted, TextFormat, WithChatAction,
};
use async_trait::async_trait;
use filebot_core::{LibraryStats, SearchResult, UploadMode, locate, pick_one};
use filebot_error::FilebotResult;
use filebot_storage::{Memoized, UploadMemoizer};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

const MISSING_QUERY: &str = "Please specify who to search for!";
const STATS_TOP_NAMES: usize = 10;

/// Shared state of the file commands.
pub struct FileCommands {
    library_root: PathBuf,
    public_url: String,
    log_file: PathBuf,
    memoizer: Arc<UploadMemoizer>,
    rng: parking_lot::Mutex<Box<dyn RngCore + Send>>,
}

impl FileCommands {
    /// Serve files from `library_root`, linking them under `public_url`.
    ///
    /// Random picks use an entropy-seeded generator; see
    /// [`with_rng`](Self::with_rng) for deterministic picks.
    pub fn new(
        library_root: impl Into<PathBuf>,
        public_url: impl Into<String>,
        log_file: impl Into<PathBuf>,
        memoizer: Arc<UploadMemoizer>,
    ) -> Self {
        Self {
            library_root: library_root.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
            log_file: log_file.into(),
            memoizer,
            rng: parking_lot::Mutex::new(Box::new(StdRng::from_entropy())),
        }
    }

    /// Replace the randomness source used to pick among matches.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = parking_lot::Mutex::new(Box::new(rng));
        self
    }

    /// The memoizer shared by `/pic` and `/getfile`.
    pub fn memoizer(&self) -> &Arc<UploadMemoizer> {
        &self.memoizer
    }

    /// Markdown link to `relative` under the public URL.
    pub fn caption(&self, relative: &Path) -> String {
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        format!("[{0}]({1}/{0})", name, self.public_url)
    }

    async fn search(&self, args: &[String]) -> CommandResult<SearchResult> {
        let root = self.library_root.clone();
        let tokens = args.to_vec();
        tokio::task::spawn_blocking(move || locate(tokens.as_slice(), &root))
            .await
            .map_err(|e| CommandError::new(CommandErrorKind::TaskFailed(e.to_string())))?
            .map_err(|e| CommandError::failed("search", &e))
    }

    /// Resolve the arguments to one random file, replying when there is none.
    async fn pick_file(&self, ctx: &CommandContext) -> CommandResult<Option<(PathBuf, String)>> {
        if ctx.message.args.is_empty() {
            reply_plain(ctx, MISSING_QUERY).await?;
            return Ok(None);
        }

        let result = self.search(&ctx.message.args).await?;
        let picked = {
            let mut rng = self.rng.lock();
            pick_one(&result.matches, &mut **rng).cloned()
        };
        let Some(relative) = picked else {
            reply_plain(
                ctx,
                &format!("No files found for search term '{}'", result.query),
            )
            .await?;
            return Ok(None);
        };

        debug!(file = %relative.display(), candidates = result.matches.len(), "Picked file");
        let caption = self.caption(&relative);
        Ok(Some((self.library_root.join(relative), caption)))
    }

    /// Send `path` in `mode`, reusing a cached handle when one exists.
    #[instrument(skip(self, ctx, caption), fields(path = %path.display(), mode = %mode))]
    async fn send_file(
        &self,
        ctx: &CommandContext,
        path: &Path,
        caption: &str,
        mode: UploadMode,
    ) -> FilebotResult<Memoized> {
        if let Err(e) = ctx
            .transport
            .send_action(ctx.message.chat_id, ChatAction::for_mode(mode))
            .await
        {
            debug!(error = %e, "Failed to send chat action");
        }

        let uploader = |file: PathBuf| {
            ctx.transport
                .reply_media(mode, &ctx.message, InputFile::Path(file), caption)
        };
        let memoized = self.memoizer.upload_or_fetch(path, &uploader).await?;

        if memoized.is_cached() {
            debug!(handle = %memoized.handle, "Re-sending cached handle");
            ctx.transport
                .reply_media(
                    mode,
                    &ctx.message,
                    InputFile::Handle(memoized.handle.clone()),
                    caption,
                )
                .await?;
        }
        Ok(memoized)
    }

    /// Send as photo when small enough, falling back to a document when the
    /// platform rejects the photo.
    async fn send_preferring_photo(
        &self,
        ctx: &CommandContext,
        path: &Path,
        caption: &str,
    ) -> FilebotResult<Memoized> {
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| {
                filebot_error::StorageError::new(filebot_error::StorageErrorKind::FileRead(
                    format!("{}: {}", path.display(), e),
                ))
            })?
            .len();

        match UploadMode::for_size(size) {
            UploadMode::Document => self.send_file(ctx, path, caption, UploadMode::Document).await,
            UploadMode::Photo => match self.send_file(ctx, path, caption, UploadMode::Photo).await {
                Err(e) if e.is_upload_rejection() => {
                    debug!(error = %e, "Photo rejected, falling back to document");
                    self.send_file(ctx, path, caption, UploadMode::Document).await
                }
                other => other,
            },
        }
    }
}

async fn reply_plain(ctx: &CommandContext, text: &str) -> CommandResult<()> {
    ctx.transport
        .reply_text(&ctx.message, text, TextFormat::Plain)
        .await
        .map_err(|e| CommandError::failed(&ctx.message.name, &e))
}

/// `/search <terms>`: list every matching file as a link.
pub struct SearchCommand(pub Arc<FileCommands>);

#[async_trait]
impl CommandHandler for SearchCommand {
    async fn handle(&self, ctx: &CommandContext) -> CommandResult<()> {
        if ctx.message.args.is_empty() {
            return reply_plain(ctx, MISSING_QUERY).await;
        }

        let result = self.0.search(&ctx.message.args).await?;
        if result.is_empty() {
            return reply_plain(
                ctx,
                &format!("No files found for search term '{}'", result.query),
            )
            .await;
        }

        let mut message = format!("Results for '{}':\n", result.query);
        for relative in result.sorted() {
            message.push_str(&self.0.caption(&relative));
            message.push('\n');
        }
        info!(matches = result.matches.len(), "Search answered");
        ctx.transport
            .reply_text(&ctx.message, &message, TextFormat::Markdown)
            .await
            .map_err(|e| CommandError::failed("search", &e))
    }
}

/// `/pic <terms>`: send one random match, as a photo when possible.
pub struct PicCommand(pub Arc<FileCommands>);

#[async_trait]
impl CommandHandler for PicCommand {
    async fn handle(&self, ctx: &CommandContext) -> CommandResult<()> {
        let Some((path, caption)) = self.0.pick_file(ctx).await? else {
            return Ok(());
        };
        let memoized = self
            .0
            .send_preferring_photo(ctx, &path, &caption)
            .await
            .map_err(|e| CommandError::failed("pic", &e))?;
        info!(source = %memoized.source, "Picture sent");
        Ok(())
    }
}

/// `/getfile <terms>`: send one random match as a document.
pub struct GetFileCommand(pub Arc<FileCommands>);

#[async_trait]
impl CommandHandler for GetFileCommand {
    async fn handle(&self, ctx: &CommandContext) -> CommandResult<()> {
        let Some((path, caption)) = self.0.pick_file(ctx).await? else {
            return Ok(());
        };
        let memoized = self
            .0
            .send_file(ctx, &path, &caption, UploadMode::Document)
            .await
            .map_err(|e| CommandError::failed("getfile", &e))?;
        info!(source = %memoized.source, "File sent");
        Ok(())
    }
}

/// `/stats`: summary of the library.
pub struct StatsCommand(pub Arc<FileCommands>);

#[async_trait]
impl CommandHandler for StatsCommand {
    async fn handle(&self, ctx: &CommandContext) -> CommandResult<()> {
        let root = self.0.library_root.clone();
        let stats = tokio::task::spawn_blocking(move || LibraryStats::collect(&root))
            .await
            .map_err(|e| CommandError::new(CommandErrorKind::TaskFailed(e.to_string())))?
            .map_err(|e| CommandError::failed("stats", &e))?;

        ctx.transport
            .reply_text(
                &ctx.message,
                &stats.render_markdown(STATS_TOP_NAMES),
                TextFormat::Markdown,
            )
            .await
            .map_err(|e| CommandError::failed("stats", &e))
    }
}

/// `/log`: send the bot's log file. Never cached, the log keeps changing.
pub struct LogCommand(pub Arc<FileCommands>);

#[async_trait]
impl CommandHandler for LogCommand {
    async fn handle(&self, ctx: &CommandContext) -> CommandResult<()> {
        let log_file = &self.0.log_file;
        if !tokio::fs::try_exists(log_file).await.unwrap_or(false) {
            return reply_plain(ctx, "No log file has been written yet.").await;
        }

        ctx.transport
            .reply_document(&ctx.message, InputFile::Path(log_file.clone()), "")
            .await
            .map_err(|e| CommandError::failed("log", &e))?;
        Ok(())
    }
}

/// Register the file commands with their middleware.
///
/// `/stats` and `/log` are restricted to the admins of `policy`.
pub fn register_file_commands(
    router: &mut CommandRouter,
    commands: Arc<FileCommands>,
    policy: Arc<AccessPolicy>,
) {
    router.register(
        "search",
        WithChatAction::new(SearchCommand(Arc::clone(&commands)), ChatAction::Typing),
    );
    router.register("pic", PicCommand(Arc::clone(&commands)));
    router.register("getfile", GetFileCommand(Arc::clone(&commands)));
    router.register(
        "stats",
        Restricted::new(
            WithChatAction::new(StatsCommand(Arc::clone(&commands)), ChatAction::Typing),
            Arc::clone(&policy),
        ),
    );
    router.register(
        "log",
        Restricted::new(
            WithChatAction::new(LogCommand(commands), ChatAction::UploadDocument),
            policy,
        ),
    );
}
