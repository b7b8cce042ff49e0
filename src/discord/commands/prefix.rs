use crate::discord::{Context, Error};
use poise::serenity_prelude::Mentionable;

/// Set a custom prefix for your server
///
/// Leave the prefix out to go back to the default.
#[poise::command(
    prefix_command,
    aliases("change_prefix"),
    guild_only,
    required_permissions = "MANAGE_GUILD",
    guild_cooldown = 3,
    category = "Meta"
)]
pub async fn prefix(
    ctx: Context<'_>,
    #[rest]
    #[description = "New prefix (omit to reset)"]
    new_prefix: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be in a guild")?.get();
    let prefixes = &ctx.data().prefixes;
    let bot_mention = ctx.framework().bot_id.mention();

    let message = match new_prefix {
        Some(new_prefix) => {
            prefixes.set_prefix(guild_id, &new_prefix).await?;
            format!(
                "Set the custom prefix to `{0}`\n\
                 Do `{0}prefix` to set it back to the default prefix.\n\
                 Ping {1} to check the current prefix.",
                new_prefix, bot_mention
            )
        }
        None => {
            prefixes.reset(guild_id).await?;
            format!(
                "Reset the prefix to the default `{}`\nPing {} to check the current prefix.",
                prefixes.default_prefix(),
                bot_mention
            )
        }
    };

    ctx.say(message).await?;
    Ok(())
}
