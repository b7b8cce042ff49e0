// Error reporting for every command.
//
// The framework routes all command failures here. Anything the user can act
// on (cooldowns, permissions, bad arguments) gets an embed; everything else is
// logged and reported as a generic failure.

use super::CogDescriptor;
use crate::core::prefixes::PrefixError;
use crate::discord::embeds;
use crate::discord::{BoxFuture, Context, Data, Error};
use poise::serenity_prelude as serenity;
use std::time::Duration;

pub const NAME: &str = "Errors";

const RICKROLL_GIF: &str = "https://media.giphy.com/media/lgcUUCXgC8mEo/giphy.gif";

pub const COG: CogDescriptor = CogDescriptor {
    name: NAME,
    description: "Command error reporting",
    hidden: true,
    commands: Vec::new,
    on_ready,
};

fn on_ready<'a>(_ctx: &'a serenity::Context, data: &'a Data) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        data.readiness.mark_ready(NAME)?;
        Ok(())
    })
}

/// Whole seconds left on a cooldown, rounded up and never below one.
fn cooldown_seconds(remaining: Duration) -> u64 {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    secs.max(1)
}

async fn send_embed(ctx: Context<'_>, embed: serenity::CreateEmbed) {
    if let Err(e) = ctx.send(poise::CreateReply::default().embed(embed)).await {
        tracing::warn!(
            command = %ctx.command().qualified_name,
            "Failed to send error embed: {}",
            e
        );
    }
}

/// Message shown to the user for a failed command body.
pub fn describe_command_error(error: &Error) -> String {
    match error.downcast_ref::<PrefixError>() {
        Some(PrefixError::InvalidPrefix(reason)) => format!("That prefix won't work: {}.", reason),
        Some(PrefixError::Configuration(_)) => {
            "I couldn't read this server's prefix settings, so nothing was changed. \
             Please let the bot owner know."
                .to_string()
        }
        None => format!("Something went wrong running that command: {}", error),
    }
}

pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().qualified_name,
                guild_id = ?ctx.guild_id(),
                "Command failed: {}",
                error
            );
            send_embed(ctx, embeds::error_embed("Error!", describe_command_error(&error))).await;
        }
        poise::FrameworkError::CooldownHit {
            remaining_cooldown,
            ctx,
            ..
        } => {
            let secs = cooldown_seconds(remaining_cooldown);
            send_embed(
                ctx,
                embeds::error_embed(
                    "Slow down!",
                    format!(
                        "This command is rate-limited, please try this again in {} seconds.",
                        secs
                    ),
                ),
            )
            .await;
        }
        poise::FrameworkError::MissingUserPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            let needed = missing_permissions
                .map(|p| p.get_permission_names().join(", "))
                .unwrap_or_else(|| "the required permissions".to_string());
            send_embed(
                ctx,
                embeds::error_embed(
                    "Missing permissions",
                    format!("You need {} to use this command.", needed),
                ),
            )
            .await;
        }
        poise::FrameworkError::NotAnOwner { ctx, .. } => {
            let embed = serenity::CreateEmbed::new()
                .colour(embeds::author_colour(ctx).await)
                .field(
                    "You Silly Billy 😜",
                    format!(
                        "You thought you can actually use the {} command!",
                        ctx.command().name
                    ),
                    false,
                )
                .image(RICKROLL_GIF)
                .author(embeds::user_author(ctx.author()))
                .timestamp(serenity::Timestamp::now());
            send_embed(ctx, embed).await;
        }
        poise::FrameworkError::ArgumentParse {
            error, input, ctx, ..
        } => {
            let detail = match input {
                Some(input) => format!("Couldn't understand `{}`: {}", input, error),
                None => error.to_string(),
            };
            let hint = format!("Try `{}help {}`.", ctx.prefix(), ctx.command().name);
            send_embed(
                ctx,
                embeds::error_embed("Bad argument", format!("{}\n{}", detail, hint)),
            )
            .await;
        }
        poise::FrameworkError::DynamicPrefix { error, msg, .. } => {
            // Commands in this guild can't be parsed until the store is fixed.
            tracing::error!(
                guild_id = ?msg.guild_id,
                "Failed to resolve guild prefix: {}",
                error
            );
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prefixes::StoreError;
    use std::path::PathBuf;

    #[test]
    fn invalid_prefix_is_explained() {
        let error: Error = Box::new(PrefixError::InvalidPrefix("prefix cannot be empty".into()));
        assert_eq!(
            describe_command_error(&error),
            "That prefix won't work: prefix cannot be empty."
        );
    }

    #[test]
    fn store_failures_do_not_leak_paths() {
        let error: Error = Box::new(PrefixError::Configuration(StoreError::Missing(
            PathBuf::from("/srv/secret/prefixes.json"),
        )));
        let message = describe_command_error(&error);
        assert!(message.contains("nothing was changed"));
        assert!(!message.contains("/srv/secret"));
    }

    #[test]
    fn cooldowns_round_up_to_whole_seconds() {
        assert_eq!(cooldown_seconds(Duration::from_secs(2)), 2);
        assert_eq!(cooldown_seconds(Duration::from_millis(2100)), 3);
        assert_eq!(cooldown_seconds(Duration::from_millis(300)), 1);
        assert_eq!(cooldown_seconds(Duration::ZERO), 1);
    }

    #[test]
    fn other_errors_pass_through() {
        let error: Error = "Must be in a guild".into();
        assert!(describe_command_error(&error).ends_with("Must be in a guild"));
    }
}
