//! Boundary to the messaging platform.

use crate::{CommandError, CommandErrorKind, CommandResult};
use async_trait::async_trait;
use filebot_core::UploadMode;
use filebot_error::FilebotResult;
use filebot_storage::RemoteHandle;
use std::path::PathBuf;

/// A `/command arg arg` message received from a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCommand {
    /// Chat the command was sent in
    pub chat_id: i64,
    /// Message to reply to
    pub message_id: i64,
    /// Sender's platform user id
    pub user_id: i64,
    /// Command name without the leading `/` or `@botname` suffix
    pub name: String,
    /// Whitespace-separated arguments
    pub args: Vec<String>,
}

impl IncomingCommand {
    /// Parse message text such as `/pic@filebot alice trip`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandErrorKind::NotACommand`] when the text does not start
    /// with `/` followed by a name.
    pub fn parse(text: &str, chat_id: i64, message_id: i64, user_id: i64) -> CommandResult<Self> {
        let mut parts = text.split_whitespace();
        let name = parts
            .next()
            .and_then(|head| head.strip_prefix('/'))
            .map(|head| head.split('@').next().unwrap_or(head).to_lowercase())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| CommandError::new(CommandErrorKind::NotACommand(text.to_string())))?;

        Ok(Self {
            chat_id,
            message_id,
            user_id,
            name,
            args: parts.map(str::to_string).collect(),
        })
    }
}

/// Status shown in the chat while a command works ("typing…").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ChatAction {
    /// Preparing a text reply
    #[display("typing")]
    Typing,
    /// Uploading a photo
    #[display("upload_photo")]
    UploadPhoto,
    /// Uploading a document
    #[display("upload_document")]
    UploadDocument,
}

impl ChatAction {
    /// Action matching an upload mode.
    pub fn for_mode(mode: UploadMode) -> Self {
        match mode {
            UploadMode::Photo => Self::UploadPhoto,
            UploadMode::Document => Self::UploadDocument,
        }
    }
}

/// Markup used for a text reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    /// Plain text
    #[default]
    Plain,
    /// Markdown with link previews disabled
    Markdown,
}

/// Media attached to a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFile {
    /// Upload the bytes of a local file
    Path(PathBuf),
    /// Re-send content the platform already holds
    Handle(RemoteHandle),
}

/// Messaging platform operations used by the commands.
///
/// Implementations wrap a platform SDK. Uploads that the platform refuses
/// because of the payload (too large, bad dimensions) must fail with an
/// upload error whose kind reports `is_rejection()`; the `/pic` command
/// relies on that to retry as a document.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Show a chat action until the next message is sent.
    async fn send_action(&self, chat_id: i64, action: ChatAction) -> FilebotResult<()>;

    /// Reply to `message` with text.
    async fn reply_text(
        &self,
        message: &IncomingCommand,
        text: &str,
        format: TextFormat,
    ) -> FilebotResult<()>;

    /// Reply with a photo and return the platform's handle for it.
    async fn reply_photo(
        &self,
        message: &IncomingCommand,
        photo: InputFile,
        caption: &str,
    ) -> FilebotResult<RemoteHandle>;

    /// Reply with a document and return the platform's handle for it.
    async fn reply_document(
        &self,
        message: &IncomingCommand,
        document: InputFile,
        caption: &str,
    ) -> FilebotResult<RemoteHandle>;

    /// Reply with `file` using the given upload mode.
    async fn reply_media(
        &self,
        mode: UploadMode,
        message: &IncomingCommand,
        file: InputFile,
        caption: &str,
    ) -> FilebotResult<RemoteHandle> {
        match mode {
            UploadMode::Photo => self.reply_photo(message, file, caption).await,
            UploadMode::Document => self.reply_document(message, file, caption).await,
        }
    }
}
