// This module handles bot presence.
//
// Discord-layer glue between the core presence template and serenity's
// ActivityData. The template is rendered from cache stats and pushed to the
// gateway once at startup and then every minute by the scheduler.

use crate::core::presence::{ActivityKind, Presence, PresenceStats, PresenceTemplate};
use crate::discord::Error;
use poise::serenity_prelude as serenity;
use tokio_cron_scheduler::{Job, JobScheduler};

/// Every minute, on the minute.
pub const PRESENCE_SCHEDULE: &str = "0 * * * * *";

const STREAM_URL: &str = "https://www.twitch.tv/guhbot";

/// Guild and unique user counts as the cache currently sees them.
pub fn current_stats(ctx: &serenity::Context, version: &str) -> PresenceStats {
    PresenceStats {
        guilds: ctx.cache.guild_count(),
        users: ctx.cache.user_count(),
        version: version.to_string(),
    }
}

fn to_activity(presence: &Presence) -> serenity::ActivityData {
    let text = presence.text.clone();
    match presence.kind {
        ActivityKind::Playing => serenity::ActivityData::playing(text),
        ActivityKind::Watching => serenity::ActivityData::watching(text),
        ActivityKind::ListeningTo => serenity::ActivityData::listening(text),
        ActivityKind::Streaming => serenity::ActivityData::streaming(text.clone(), STREAM_URL)
            .unwrap_or_else(|_| serenity::ActivityData::watching(text)),
    }
}

/// Renders the template against live stats and sets it as the bot's presence.
pub fn refresh_presence(ctx: &serenity::Context, template: &PresenceTemplate, version: &str) {
    let presence = template.render(&current_stats(ctx, version));
    tracing::debug!(kind = %presence.kind, text = %presence.text, "Updating presence");
    ctx.set_presence(Some(to_activity(&presence)), serenity::OnlineStatus::Online);
}

/// Registers the periodic presence refresh. The job only starts firing once
/// the scheduler itself is started.
pub async fn register_presence_job(
    scheduler: &JobScheduler,
    ctx: serenity::Context,
    template: PresenceTemplate,
    version: String,
) -> Result<(), Error> {
    let job = Job::new_async(PRESENCE_SCHEDULE, move |_uuid, _lock| {
        let ctx = ctx.clone();
        let template = template.clone();
        let version = version.clone();

        Box::pin(async move {
            refresh_presence(&ctx, &template, &version);
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(schedule = PRESENCE_SCHEDULE, "Presence job registered");
    Ok(())
}
