//! Command handler trait and per-command context.

use crate::{ChatTransport, CommandResult, IncomingCommand};
use async_trait::async_trait;
use std::sync::Arc;

/// Everything a handler needs to answer one command.
#[derive(Clone)]
pub struct CommandContext {
    /// The command being handled
    pub message: IncomingCommand,
    /// Transport to reply through
    pub transport: Arc<dyn ChatTransport>,
}

impl CommandContext {
    /// Bundle a command with the transport it arrived on.
    pub fn new(message: IncomingCommand, transport: Arc<dyn ChatTransport>) -> Self {
        Self { message, transport }
    }
}

/// Handles one named command.
///
/// Handlers send their own replies. Errors are returned to the
/// [`CommandRouter`](crate::CommandRouter), which logs them and tells the
/// user something went wrong.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command.
    async fn handle(&self, ctx: &CommandContext) -> CommandResult<()>;
}

#[async_trait]
impl<H: CommandHandler + ?Sized> CommandHandler for Arc<H> {
    async fn handle(&self, ctx: &CommandContext) -> CommandResult<()> {
        (**self).handle(ctx).await
    }
}
