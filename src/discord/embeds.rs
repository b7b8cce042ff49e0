// Shared embed styling: the named colour palette and the author-colour helper
// every command reply uses.

use crate::discord::Context;
use poise::serenity_prelude as serenity;

pub const PALETTE: &[(&str, u32)] = &[
    ("WHITE", 0xFFFFFF),
    ("AQUA", 0x1ABC9C),
    ("GREEN", 0x2ECC71),
    ("BLUE", 0x3498DB),
    ("PURPLE", 0x9B59B6),
    ("LUMINOUS_VIVID_PINK", 0xE91E63),
    ("GOLD", 0xF1C40F),
    ("ORANGE", 0xE67E22),
    ("RED", 0xE74C3C),
    ("NAVY", 0x34495E),
    ("DARK_AQUA", 0x11806A),
    ("DARK_GREEN", 0x1F8B4C),
    ("DARK_BLUE", 0x206694),
    ("DARK_PURPLE", 0x71368A),
    ("DARK_VIVID_PINK", 0xAD1457),
    ("DARK_GOLD", 0xC27C0E),
    ("DARK_ORANGE", 0xA84300),
    ("DARK_RED", 0x992D22),
    ("DARK_NAVY", 0x2C3E50),
];

pub fn palette(name: &str) -> Option<serenity::Colour> {
    PALETTE
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, value)| serenity::Colour::new(*value))
}

pub fn error_colour() -> serenity::Colour {
    palette("RED").unwrap_or_default()
}

/// Colour of the invoking member's highest coloured role, falling back to blue
/// in DMs or for members without a coloured role.
pub async fn author_colour(ctx: Context<'_>) -> serenity::Colour {
    let fallback = palette("BLUE").unwrap_or_default();

    match ctx.author_member().await {
        Some(member) => member.colour(ctx.cache()).unwrap_or(fallback),
        None => fallback,
    }
}

/// `name#1234` (or just `name` for migrated usernames) with the avatar.
pub fn user_author(user: &serenity::User) -> serenity::CreateEmbedAuthor {
    serenity::CreateEmbedAuthor::new(user.tag()).icon_url(user.face())
}

/// Base embed for command replies: author colour, invoking user and timestamp.
pub async fn reply_embed(ctx: Context<'_>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .colour(author_colour(ctx).await)
        .author(user_author(ctx.author()))
        .timestamp(serenity::Timestamp::now())
}

pub fn error_embed(title: &str, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("⛔{}", title))
        .description(description)
        .colour(error_colour())
        .timestamp(serenity::Timestamp::now())
}
