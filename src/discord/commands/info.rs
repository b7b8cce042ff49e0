use crate::core::presence::presence_template::group_thousands;
use crate::discord::embeds;
use crate::discord::{Context, Error};
use chrono::Utc;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;

const SUPPORT_GIF: &str = "https://media.giphy.com/media/9ZOyRdXL7ZVKg/giphy.gif";
const UPVOTE_GIF: &str = "https://media.giphy.com/media/4eQFLKTo1Tymc/giphy.gif";

/// Everything `whois` shows that has to come from the cached guild.
struct MemberSummary {
    role_mentions: Vec<String>,
    top_role: Option<String>,
    status: Option<String>,
    acknowledgement: Option<&'static str>,
    guild_name: String,
    guild_icon: Option<String>,
}

/// Get info on a specific user
#[poise::command(
    prefix_command,
    aliases("user_info", "who_is"),
    guild_only,
    user_cooldown = 3,
    category = "Meta"
)]
pub async fn whois(
    ctx: Context<'_>,
    #[description = "Member to look up (defaults to you)"] member: Option<serenity::Member>,
) -> Result<(), Error> {
    let member = match member {
        Some(member) => member,
        None => ctx
            .author_member()
            .await
            .ok_or("Couldn't find you in this server")?
            .into_owned(),
    };
    let bot_id = ctx.framework().bot_id;

    // Keep the cache guard inside this block; it must not live across an await.
    let summary = {
        let guild = ctx.guild().ok_or("Guild not found")?;

        let mut roles: Vec<&serenity::Role> = member
            .roles
            .iter()
            .filter_map(|id| guild.roles.get(id))
            .collect();
        roles.sort_by(|a, b| b.position.cmp(&a.position));

        let is_admin = roles.iter().any(|r| r.permissions.administrator());
        let acknowledgement = if member.user.id == guild.owner_id {
            Some("Server Owner")
        } else if member.user.id == bot_id {
            Some("Hey that's me!")
        } else if member.user.bot {
            Some("Discord Bot")
        } else if is_admin {
            Some("Server Admin")
        } else {
            None
        };

        MemberSummary {
            role_mentions: roles.iter().map(|r| r.mention().to_string()).collect(),
            top_role: roles.first().map(|r| r.mention().to_string()),
            status: guild
                .presences
                .get(&member.user.id)
                .map(|p| p.status.name().to_string()),
            acknowledgement,
            guild_name: guild.name.clone(),
            guild_icon: guild.icon_url(),
        }
    };

    let roles_value = if summary.role_mentions.is_empty() {
        "@everyone".to_string()
    } else {
        summary.role_mentions.join(" ")
    };
    let joined = member
        .joined_at
        .map(|t| discord_timestamp(t.unix_timestamp()))
        .unwrap_or_else(|| "Unknown".to_string());
    let registered = discord_timestamp(member.user.id.created_at().unix_timestamp());

    let colour = member
        .colour(ctx.cache())
        .unwrap_or_else(|| embeds::palette("BLUE").unwrap_or_default());

    let mut embed = serenity::CreateEmbed::new()
        .description(format!("{}\nID: {}", member.mention(), member.user.id))
        .colour(colour)
        .field("Nickname", member.display_name().to_string(), true)
        .field(
            "Status",
            summary.status.unwrap_or_else(|| "offline".to_string()),
            true,
        )
        .field("Joined", joined, false)
        .field("Registered", registered, true)
        .field(
            format!("Roles [{}]", summary.role_mentions.len()),
            roles_value,
            false,
        )
        .field(
            "Highest Role",
            summary.top_role.unwrap_or_else(|| "@everyone".to_string()),
            true,
        );

    if let Some(acknowledgement) = summary.acknowledgement {
        embed = embed.field("Acknowledgements", acknowledgement, false);
    }

    let mut footer = serenity::CreateEmbedFooter::new(summary.guild_name);
    if let Some(icon) = summary.guild_icon {
        footer = footer.icon_url(icon);
    }

    let embed = embed
        .thumbnail(member.face())
        .author(embeds::user_author(&member.user))
        .footer(footer)
        .timestamp(serenity::Timestamp::now());

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Displays GuhBot's statistics
#[poise::command(
    prefix_command,
    aliases("status", "statistics", "info", "bot"),
    user_cooldown = 5,
    category = "Meta"
)]
pub async fn stats(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let latency = latency_ms(ctx.ping().await);
    let guilds = ctx.cache().guild_count();
    let users = ctx.cache().user_count();
    let (bot_name, bot_face) = {
        let bot = ctx.cache().current_user();
        (bot.name.clone(), bot.face())
    };
    let uptime = format_uptime((Utc::now() - data.started_at).num_seconds());

    let fields = [
        ("🏓 Pong", format!("Websocket Latency: **{}ms**", latency), true),
        (
            "🔢 Server Count",
            format!("Working in **{}** servers.", group_thousands(guilds)),
            true,
        ),
        (
            "👥 Member Count",
            format!("Serving **{}** members.", group_thousands(users)),
            true,
        ),
        (
            "🌐 Version",
            format!("GuhBot Version **{}**", data.config.version),
            true,
        ),
        ("⏱️ Uptime", format!("Online for **{}**", uptime), true),
        (
            "🦀 Library",
            format!("{} runs on **poise** and **serenity**.", bot_name),
            true,
        ),
        (
            "🙋 Support Server",
            format!(
                "Join {} [Support Server]({})",
                bot_name, data.config.support_url
            ),
            false,
        ),
    ];

    let embed = embeds::reply_embed(ctx)
        .await
        .title("Stats")
        .description(format!("List of {}'s statistics", bot_name))
        .fields(fields)
        .footer(serenity::CreateEmbedFooter::new(format!("GuhBean#8433 | {}", bot_name)))
        .author(serenity::CreateEmbedAuthor::new(bot_name.clone()).icon_url(bot_face.clone()))
        .thumbnail(bot_face);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Returns the Discord API / Websocket latency
#[poise::command(prefix_command, aliases("latency"), user_cooldown = 2, category = "Meta")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let latency = latency_ms(ctx.ping().await);
    let (bot_name, bot_face) = {
        let bot = ctx.cache().current_user();
        (bot.name.clone(), bot.face())
    };

    let embed = embeds::reply_embed(ctx)
        .await
        .title("🏓 Pong")
        .description(format!("Websocket Latency: **{}ms**", latency))
        .author(serenity::CreateEmbedAuthor::new(bot_name).icon_url(bot_face));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Returns both support server invite and the bot invite hyperlink
#[poise::command(prefix_command, user_cooldown = 5, category = "Meta")]
pub async fn support(ctx: Context<'_>) -> Result<(), Error> {
    let config = &ctx.data().config;

    let embed = embeds::reply_embed(ctx)
        .await
        .title("Need Help❓")
        .description("Use the hyperlinks below to get access to the GuhBot support server")
        .field(
            "🙋 Support Server",
            format!("[Server Link]({})", config.support_url),
            true,
        )
        .field(
            "🤖 Bot Invite",
            format!("[GuhBot invite]({})", config.invite_url),
            true,
        )
        .thumbnail(SUPPORT_GIF)
        .footer(serenity::CreateEmbedFooter::new("GuhBean#8433 | GuhBot"));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Support GuhBot? Upvote using this command!
#[poise::command(prefix_command, user_cooldown = 5, category = "Meta")]
pub async fn upvote(ctx: Context<'_>) -> Result<(), Error> {
    let embed = embeds::reply_embed(ctx)
        .await
        .title("🔺Upvote GuhBot")
        .description(
            "Provided hyperlinks bring you to GuhBot's upvote links.\n\
             Upvoting the bot gets us more users 😀",
        )
        .field(
            "Discord Bot List",
            "[discordbotlist.com](https://discordbotlist.com/bots/guhbot/upvote)",
            true,
        )
        .field(
            "Bots For Discord",
            "[botsfordiscord.com](https://botsfordiscord.com/bot/624754986248831017)",
            true,
        )
        .thumbnail(UPVOTE_GIF)
        .footer(serenity::CreateEmbedFooter::new("Thanks for upvoting GuhBot!👍"));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Discord renders `<t:...:F>` in the reader's own timezone.
fn discord_timestamp(unix: i64) -> String {
    format!("<t:{}:F>", unix)
}

fn latency_ms(latency: std::time::Duration) -> String {
    format!("{:.3}", latency.as_secs_f64() * 1000.0)
}

/// `93784` -> `1d 2h 3m 4s`. Leading zero units are dropped.
fn format_uptime(total_secs: i64) -> String {
    let total_secs = total_secs.max(0);
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let parts = [(days, "d"), (hours, "h"), (minutes, "m")];
    let mut out: Vec<String> = parts
        .iter()
        .skip_while(|(value, _)| *value == 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();
    out.push(format!("{}s", seconds));
    out.join(" ")
}
