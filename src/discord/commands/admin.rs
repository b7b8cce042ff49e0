use crate::discord::{Context, Error};
use poise::serenity_prelude::Mentionable;

/// This command disconnects the bot from all services.
#[poise::command(
    prefix_command,
    aliases("close", "disconnect"),
    owners_only,
    hide_in_help,
    category = "Meta"
)]
pub async fn logout(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(format!(
        ":wave: Goodbye {}! I'm shutting down...",
        ctx.author().mention()
    ))
    .await?;

    tracing::warn!(owner = %ctx.author().name, "Logout requested, shutting down all shards");
    ctx.framework().shard_manager().shutdown_all().await;
    Ok(())
}
