// Gateway lifecycle: cog startup, the one-time "online" announcement and the
// non-command events the bot reacts to.

use crate::discord::cogs::COGS;
use crate::discord::commands::presence;
use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;
use std::sync::atomic::Ordering;
use std::time::Duration;

const READY_POLL: Duration = Duration::from_millis(500);
const MENTION_REPLY_TTL: Duration = Duration::from_secs(10);

/// Runs every cog's `on_ready` hook and spawns the watcher that announces the
/// bot once all of them have reported ready.
pub fn start_cogs(ctx: &serenity::Context, data: &Data) {
    for cog in COGS {
        let ctx = ctx.clone();
        let data = data.clone();
        tokio::spawn(async move {
            tracing::info!(cog = cog.name, "Initial setup for {}", cog.name);
            if let Err(e) = (cog.on_ready)(&ctx, &data).await {
                tracing::error!(cog = cog.name, "Cog setup failed: {}", e);
            }
        });
    }

    let ctx = ctx.clone();
    let data = data.clone();
    tokio::spawn(async move {
        data.readiness.wait_until_ready(READY_POLL).await;
        announce_ready(&ctx, &data).await;
    });
}

async fn announce_ready(ctx: &serenity::Context, data: &Data) {
    if data.announced.swap(true, Ordering::SeqCst) {
        return;
    }

    tracing::info!("Your bot is online and ready to go!");

    if let Err(e) = data.scheduler.start().await {
        tracing::error!("Failed to start scheduler: {}", e);
    }
    presence::refresh_presence(ctx, &data.config.presence, &data.config.version);
}

/// Event handler for non-command Discord events.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            if data.announced.load(Ordering::SeqCst) {
                tracing::info!("Reconnecting...");
            } else {
                tracing::info!(user = %data_about_bot.user.name, "Gateway ready, waiting for cogs");
            }
        }
        serenity::FullEvent::Resume { .. } => {
            tracing::info!("Resumed gateway session");
        }
        serenity::FullEvent::ShardStageUpdate { event } => match event.new {
            serenity::ConnectionStage::Connected => {
                tracing::info!(shard = ?event.shard_id, "Connected")
            }
            serenity::ConnectionStage::Disconnected => {
                tracing::warn!(shard = ?event.shard_id, "Disconnected")
            }
            _ => tracing::debug!(
                shard = ?event.shard_id,
                stage = ?event.new,
                "Shard stage changed"
            ),
        },
        serenity::FullEvent::Message { new_message } => {
            if new_message.author.bot {
                return Ok(());
            }
            if is_bare_mention(&new_message.content, framework.bot_id.get()) {
                reply_with_prefix(ctx, new_message, data).await?;
            }
        }
        serenity::FullEvent::GuildDelete { incomplete, .. } => {
            if should_prune_guild(incomplete.unavailable) {
                let guild_id = incomplete.id.get();
                tracing::info!(guild_id, "Removed from server");
                if let Err(e) = data.prefixes.forget_guild(guild_id).await {
                    tracing::error!(guild_id, "Failed to prune guild prefix: {}", e);
                }
            }
        }
        _ => {}
    }

    Ok(())
}

/// True when the message is nothing but a mention of the bot.
pub fn is_bare_mention(content: &str, bot_id: u64) -> bool {
    let content = content.trim();
    content == format!("<@{}>", bot_id) || content == format!("<@!{}>", bot_id)
}

/// A `GuildDelete` for an unavailable guild is an outage, not a removal, so
/// its prefix is kept.
pub fn should_prune_guild(unavailable: bool) -> bool {
    !unavailable
}

async fn reply_with_prefix(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    let prefix = data
        .prefixes
        .resolve_for(message.guild_id.map(|g| g.get()))
        .await?;

    let reply = message
        .channel_id
        .say(
            &ctx.http,
            format!(
                "Hey {}! My prefix here is `{}`\nDo `{}help` to get started.",
                message.author.mention(),
                prefix,
                prefix
            ),
        )
        .await?;

    let http = ctx.http.clone();
    tokio::spawn(async move {
        tokio::time::sleep(MENTION_REPLY_TTL).await;
        if let Err(e) = reply.delete(&*http).await {
            tracing::debug!("Failed to delete prefix reply: {}", e);
        }
    });

    Ok(())
}
