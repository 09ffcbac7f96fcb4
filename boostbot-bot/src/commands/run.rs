//! Run command implementation: starts the bot.

use std::sync::Arc;

use anyhow::{Context, Result};
use boostbot_store::{BotConfig, SnapshotCache};
use tracing::info;

use crate::delivery::{self, BotContext};
use crate::dispatcher::Dispatcher;
use crate::telegram::TelegramClient;

use super::build_fetcher;

/// Runs the bot until shutdown.
pub async fn run() -> Result<()> {
    let config = BotConfig::from_env().context("invalid configuration")?;
    info!(
        token = %config.redacted_token(),
        delivery = config.delivery.name(),
        strategy = %config.site.strategy,
        cooldown_secs = config.cache_cooldown.as_secs(),
        "Starting bot"
    );

    let fetcher = build_fetcher(&config.site)?;
    let cache = SnapshotCache::new(fetcher, config.cache_cooldown);
    let client = TelegramClient::new(config.telegram_api_url.as_str(), &config.token)
        .context("failed to create chat client")?;

    let ctx = Arc::new(BotContext {
        dispatcher: Dispatcher::new(cache),
        client,
    });

    delivery::run(
        ctx,
        &config.delivery,
        &config.token,
        config.webhook_endpoint().as_deref(),
    )
    .await?;

    info!("Bot stopped");
    Ok(())
}
