//! Command registry and dispatch.

use crate::{CommandContext, CommandHandler, TextFormat};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// What happened to a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Handler ran to completion
    Handled,
    /// Handler failed; the user was told
    Failed,
    /// No handler is registered under that name
    Unknown,
}

/// Maps command names to handlers.
///
/// Dispatch never lets a handler error escape: it is logged and the user
/// receives a readable message instead.
#[derive(Default)]
pub struct CommandRouter {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous handler.
    pub fn register(&mut self, name: impl Into<String>, handler: impl CommandHandler + 'static) {
        let name = name.into().to_lowercase();
        if self.handlers.insert(name.clone(), Arc::new(handler)).is_some() {
            warn!(command = %name, "Replaced existing command handler");
        } else {
            debug!(command = %name, "Registered command handler");
        }
    }

    /// Whether a handler exists for `name`.
    pub fn supports(&self, name: &str) -> bool {
        self.handlers.contains_key(&name.to_lowercase())
    }

    /// Registered command names, sorted.
    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the handler for `ctx.message`.
    #[instrument(
        skip(self, ctx),
        fields(
            command = %ctx.message.name,
            chat_id = ctx.message.chat_id,
            arg_count = ctx.message.args.len()
        )
    )]
    pub async fn dispatch(&self, ctx: &CommandContext) -> DispatchOutcome {
        let Some(handler) = self.handlers.get(&ctx.message.name) else {
            debug!("Ignoring unknown command");
            return DispatchOutcome::Unknown;
        };

        info!("Handling command");
        match handler.handle(ctx).await {
            Ok(()) => DispatchOutcome::Handled,
            Err(e) => {
                error!(error = %e, "Command failed");
                let text = format!(
                    "Sorry, something went wrong while running /{}.",
                    ctx.message.name
                );
                if let Err(e) = ctx
                    .transport
                    .reply_text(&ctx.message, &text, TextFormat::Plain)
                    .await
                {
                    warn!(error = %e, "Failed to report command failure");
                }
                DispatchOutcome::Failed
            }
        }
    }
}
