//! Middleware wrapped around command handlers at registration time.

use crate::{ChatAction, CommandContext, CommandHandler, CommandResult, TextFormat};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Users allowed to run restricted commands.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    admins: HashSet<i64>,
}

impl AccessPolicy {
    /// Policy admitting exactly `admins`.
    pub fn new(admins: impl IntoIterator<Item = i64>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }

    /// Whether `user_id` may run restricted commands.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admins.contains(&user_id)
    }
}

/// Runs the inner handler only for admins.
///
/// Everyone else gets a short refusal and the attempt is logged.
pub struct Restricted<H> {
    inner: H,
    policy: Arc<AccessPolicy>,
}

impl<H> Restricted<H> {
    /// Restrict `inner` to the admins of `policy`.
    pub fn new(inner: H, policy: Arc<AccessPolicy>) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<H: CommandHandler> CommandHandler for Restricted<H> {
    #[instrument(skip(self, ctx), fields(command = %ctx.message.name, user_id = ctx.message.user_id))]
    async fn handle(&self, ctx: &CommandContext) -> CommandResult<()> {
        if !self.policy.is_admin(ctx.message.user_id) {
            warn!("Unauthorized access denied");
            if let Err(e) = ctx
                .transport
                .reply_text(&ctx.message, "You are not allowed to use this command.", TextFormat::Plain)
                .await
            {
                warn!(error = %e, "Failed to send refusal");
            }
            return Ok(());
        }
        debug!("Access granted");
        self.inner.handle(ctx).await
    }
}

/// Shows a chat action before running the inner handler.
///
/// Failing to show the action never fails the command.
pub struct WithChatAction<H> {
    inner: H,
    action: ChatAction,
}

impl<H> WithChatAction<H> {
    /// Show `action` before every run of `inner`.
    pub fn new(inner: H, action: ChatAction) -> Self {
        Self { inner, action }
    }
}

#[async_trait]
impl<H: CommandHandler> CommandHandler for WithChatAction<H> {
    async fn handle(&self, ctx: &CommandContext) -> CommandResult<()> {
        if let Err(e) = ctx
            .transport
            .send_action(ctx.message.chat_id, self.action)
            .await
        {
            debug!(error = %e, action = %self.action, "Failed to send chat action");
        }
        self.inner.handle(ctx).await
    }
}
