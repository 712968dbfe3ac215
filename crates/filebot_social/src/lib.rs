//! Chat command layer for filebot.
//!
//! The messaging platform itself stays behind the [`ChatTransport`] trait;
//! any SDK that can send text, photos and documents plugs in there. This
//! crate provides everything between an incoming command and the transport:
//!
//! - [`CommandRouter`] - registry and dispatch with user-facing error recovery
//! - [`CommandHandler`] - trait implemented by every command
//! - [`Restricted`] / [`WithChatAction`] - middleware composed at registration
//! - [`FileCommands`] - `/search`, `/pic`, `/getfile`, `/stats` and `/log`
//!
//! # Example
//!
//! ```rust,ignore
//! let commands = Arc::new(FileCommands::new(root, public_url, log_file, memoizer));
//! let mut router = CommandRouter::new();
//! register_file_commands(&mut router, commands, Arc::new(AccessPolicy::new(admins)));
//!
//! let message = IncomingCommand::parse("/pic alice", chat_id, message_id, user_id)?;
//! router.dispatch(&CommandContext::new(message, transport)).await;
//! ```

#![warn(missing_docs)]

mod error;
mod files;
mod handler;
mod middleware;
mod router;
mod transport;

pub use error::{CommandError, CommandErrorKind, CommandResult};
pub use files::{
    FileCommands, GetFileCommand, LogCommand, PicCommand, SearchCommand, StatsCommand,
    register_file_commands,
};
pub use handler::{CommandContext, CommandHandler};
pub use middleware::{AccessPolicy, Restricted, WithChatAction};
pub use router::{CommandRouter, DispatchOutcome};
pub use transport::{ChatAction, ChatTransport, IncomingCommand, InputFile, TextFormat};
