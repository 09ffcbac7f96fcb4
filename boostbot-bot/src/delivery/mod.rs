//! Update delivery.
//!
//! Updates reach the bot either by webhook ([`push`]) or by long-polling
//! ([`pull`]); the mode is picked once from configuration. Either way each
//! update is processed on its own task and answered with `sendMessage`.

pub mod pull;
pub mod push;

use std::sync::Arc;

use anyhow::Result;
use boostbot_core::SnapshotSource;
use boostbot_store::DeliveryMode;
use tracing::{error, info, warn};

use crate::dispatcher::Dispatcher;
use crate::telegram::{TelegramClient, Update};

/// Everything an update handler needs.
pub struct BotContext<S: SnapshotSource> {
    /// Command routing.
    pub dispatcher: Dispatcher<S>,
    /// Chat platform client for replies.
    pub client: TelegramClient,
}

/// Runs the configured delivery mode until shutdown.
pub async fn run<S: SnapshotSource>(
    ctx: Arc<BotContext<S>>,
    mode: &DeliveryMode,
    token: &str,
    webhook_endpoint: Option<&str>,
) -> Result<()> {
    info!(mode = mode.name(), "Starting update delivery");
    match mode {
        DeliveryMode::Push { port, .. } => {
            let endpoint = webhook_endpoint
                .ok_or_else(|| anyhow::anyhow!("push delivery needs a webhook URL"))?;
            push::serve(ctx, *port, token, endpoint).await
        }
        DeliveryMode::Pull { poll_timeout } => {
            pull::run(ctx, *poll_timeout, shutdown_signal()).await
        }
    }
}

/// Processes one update on its own task.
pub fn spawn_update<S: SnapshotSource>(ctx: Arc<BotContext<S>>, update: Update) {
    tokio::spawn(async move { process_update(&ctx, &update).await });
}

/// Dispatches one update and sends the reply, if any.
pub async fn process_update<S: SnapshotSource>(ctx: &BotContext<S>, update: &Update) {
    let Some((chat_id, reply)) = ctx.dispatcher.handle_update(update).await else {
        return;
    };

    if let Err(e) = ctx.client.send_message(chat_id, &reply).await {
        warn!(error = %e, chat_id, update_id = update.update_id, "Failed to send reply");
    }
}

/// Resolves when the process is asked to stop.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
