//! filebot: find files in a local library and send them to a chat, uploading
//! each distinct file content only once.
//!
//! This facade re-exports the workspace crates and adds the process-level
//! pieces: layered configuration ([`FilebotConfig`]) and log setup
//! ([`init_logging`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod logging;

pub use config::{
    BotSection, CacheSection, DestSection, FilebotConfig, LoggingConfig, SourceSection,
};
pub use logging::init_logging;

pub use filebot_core::{
    LibraryStats, PHOTO_SIZE_THRESHOLD, SearchResult, UploadMode, locate, normalize_query,
    pick_one,
};
pub use filebot_error::{
    ConfigError, FilebotError, FilebotErrorKind, FilebotResult, LibraryError, StorageError,
    StorageErrorKind, UploadError, UploadErrorKind,
};
pub use filebot_social::{
    AccessPolicy, ChatAction, ChatTransport, CommandContext, CommandError, CommandErrorKind,
    CommandHandler, CommandResult, CommandRouter, DispatchOutcome, FileCommands,
    IncomingCommand, InputFile, Restricted, TextFormat, WithChatAction, register_file_commands,
};
pub use filebot_storage::{
    ContentDigest, HandleSource, MediaHandleStore, Memoized, RemoteHandle, UploadMemoizer,
    Uploader,
};
