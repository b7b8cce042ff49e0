// This is the entry point of GuhBot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (file stores)
// - `discord/` = Discord-specific adapters (cogs, commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register cogs, commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::config::BotConfig;
use crate::core::prefixes::PrefixService;
use crate::core::readiness::ReadinessTracker;
use crate::discord::{cogs, lifecycle, Data, Error};
use crate::infra::prefixes::JsonPrefixStore;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio_cron_scheduler::JobScheduler;
use tracing_subscriber::EnvFilter;

/// Resolves the command prefix for every inbound message. Direct messages use
/// the default; a broken prefix store surfaces as a framework error.
async fn dynamic_prefix(
    ctx: poise::PartialContext<'_, Data, Error>,
) -> Result<Option<String>, Error> {
    let prefix = ctx
        .data
        .prefixes
        .resolve_for(ctx.guild_id.map(|g| g.get()))
        .await?;
    Ok(Some(prefix))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening. RUST_LOG overrides
    // the default `info` level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BotConfig::from_env().context("Failed to load configuration")?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let prefix_store = JsonPrefixStore::new(config.prefix_store_path());
    prefix_store
        .ensure_exists()
        .await
        .context("Failed to prepare prefix store")?;
    tracing::info!(path = %prefix_store.path().display(), "Using prefix store");

    let prefix_service = Arc::new(PrefixService::with_default(
        prefix_store,
        config.default_prefix.clone(),
    ));

    let readiness = Arc::new(ReadinessTracker::new(cogs::cog_names()));

    let scheduler = JobScheduler::new()
        .await
        .context("Failed to create scheduler")?;

    let token = config.token.clone();
    let data = Data {
        config: Arc::new(config),
        prefixes: prefix_service,
        readiness,
        scheduler,
        announced: Arc::new(AtomicBool::new(false)),
        started_at: chrono::Utc::now(),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read prefix commands
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_PRESENCES;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: cogs::all_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                dynamic_prefix: Some(|ctx| Box::pin(dynamic_prefix(ctx))),
                mention_as_prefix: true,
                case_insensitive_commands: true,
                ..Default::default()
            },
            on_error: |error| Box::pin(cogs::errors::on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(lifecycle::event_handler(ctx, event, framework, data))
            },
            pre_command: |ctx| {
                Box::pin(async move {
                    tracing::debug!(
                        command = %ctx.command().qualified_name,
                        user_id = ctx.author().id.get(),
                        "Running command"
                    );
                })
            },
            ..Default::default()
        })
        .setup(|ctx, ready, _framework| {
            Box::pin(async move {
                tracing::info!(user = %ready.user.name, "Running setup...");
                lifecycle::start_cogs(ctx, &data);
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    tracing::info!("Running your bot...");
    client.start().await.context("Error running bot")?;
    Ok(())
}
