use crate::discord::cogs::{self, CogDescriptor, COGS};
use crate::discord::embeds;
use crate::discord::{Context, Data, Error};
use poise::serenity_prelude as serenity;

type Command = poise::Command<Data, Error>;

/// What a `help` query refers to.
pub enum HelpTopic<'a> {
    /// No query: list the modules.
    Overview,
    /// More than one word was given.
    TooManyTopics,
    Cog {
        cog: &'static CogDescriptor,
        commands: Vec<&'a Command>,
    },
    Command(&'a Command),
    NotFound(String),
}

/// Resolves a help query against the registered cogs and commands. Cog names
/// win over command names; commands match by name or alias, ignoring case.
pub fn lookup_topic<'a>(query: Option<&str>, commands: &'a [Command]) -> HelpTopic<'a> {
    let words: Vec<&str> = query
        .map(|q| q.split_whitespace().collect())
        .unwrap_or_default();

    let topic = match words.as_slice() {
        [] => return HelpTopic::Overview,
        [topic] => *topic,
        _ => return HelpTopic::TooManyTopics,
    };

    if let Some(cog) = cogs::find_cog(topic).filter(|cog| !cog.hidden) {
        let commands = commands
            .iter()
            .filter(|c| !c.hide_in_help && c.category.as_deref() == Some(cog.name))
            .collect();
        return HelpTopic::Cog { cog, commands };
    }

    let wanted = topic.to_lowercase();
    commands
        .iter()
        .find(|c| c.name == wanted || c.aliases.iter().any(|a| *a == wanted))
        .map(HelpTopic::Command)
        .unwrap_or_else(|| HelpTopic::NotFound(topic.to_string()))
}

/// `whois [member]` style usage line. Required parameters use `<>`.
pub fn command_signature(command: &Command) -> String {
    let mut signature = command.qualified_name.clone();
    for param in &command.parameters {
        if param.required {
            signature.push_str(&format!(" <{}>", param.name));
        } else {
            signature.push_str(&format!(" [{}]", param.name));
        }
    }
    signature
}

fn command_description(command: &Command) -> &str {
    command
        .description
        .as_deref()
        .or(command.help_text.as_deref())
        .unwrap_or("No description provided.")
}

/// Displays this message
#[poise::command(prefix_command, hide_in_help, user_cooldown = 2, category = "Meta")]
pub async fn help(
    ctx: Context<'_>,
    #[rest]
    #[description = "Module or command to explain"]
    topic: Option<String>,
) -> Result<(), Error> {
    let prefix = ctx.prefix().to_string();
    let framework = ctx.framework();
    let commands = &framework.options().commands;

    let embed = match lookup_topic(topic.as_deref(), commands) {
        HelpTopic::Overview => {
            let modules = COGS
                .iter()
                .filter(|cog| !cog.hidden)
                .map(|cog| format!("**{}** - {}", cog.name, cog.description))
                .collect::<Vec<_>>()
                .join("\n");

            with_bot_thumbnail(ctx, embeds::reply_embed(ctx).await)
                .await
                .title("🔧Modules List")
                .description(format!(
                    "Do `{}help [module]` for more info on a specific module.",
                    prefix
                ))
                .field("⚙️Modules", modules, false)
        }
        HelpTopic::TooManyTopics => embeds::error_embed("Error!", "That is way too many cogs!"),
        HelpTopic::Cog { cog, commands } => {
            let entries: Vec<String> = commands
                .iter()
                .map(|c| format!("**{}** - {}", c.name, command_description(c)))
                .collect();

            let mut embed = with_bot_thumbnail(ctx, embeds::reply_embed(ctx).await)
                .await
                .title("🚧Commands List")
                .description(format!(
                    "List of GuhBot's Modular Commands.\nDo `{}help [command]` for more info on a command",
                    prefix
                ));

            let title = format!("{} Module - {}", cog.name, cog.description);
            for (i, chunk) in chunk_entries(&entries).iter().enumerate() {
                let field_name = if i == 0 {
                    title.clone()
                } else {
                    format!("{} (cont.)", title)
                };
                embed = embed.field(field_name, chunk.join("\n"), false);
            }

            if let poise::Context::Prefix(prefix_ctx) = ctx {
                if let Err(e) = prefix_ctx.msg.react(&ctx, '👍').await {
                    tracing::debug!("Failed to react to help request: {}", e);
                }
            }
            embed
        }
        HelpTopic::Command(command) => {
            let aliases = if command.aliases.is_empty() {
                "No Aliases".to_string()
            } else {
                command.aliases.join(", ")
            };

            with_bot_thumbnail(ctx, embeds::reply_embed(ctx).await)
                .await
                .title("🔧Command Syntax")
                .description("GuhBot's commands and how to use them.")
                .field(
                    format!("{} - {}", command.name, command_description(command)),
                    format!("Proper Syntax:\n`{}{}`", prefix, command_signature(command)),
                    false,
                )
                .field("Command Aliases", aliases, false)
        }
        HelpTopic::NotFound(topic) => embeds::error_embed(
            "Error!",
            format!(
                "How would you even use the command or module \"{0}\"?\n\
                 Sorry, but I don't see a command or module called \"{0}\"",
                topic
            ),
        ),
    };

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

async fn with_bot_thumbnail(
    ctx: Context<'_>,
    embed: serenity::CreateEmbed,
) -> serenity::CreateEmbed {
    match ctx.framework().bot_id.to_user(&ctx).await {
        Ok(user) => embed.thumbnail(user.face()),
        Err(_) => embed,
    }
}

fn chunk_entries(entries: &[String]) -> Vec<Vec<String>> {
    let mut chunks = Vec::new();
    let mut current_chunk = Vec::new();
    let mut current_length = 0;

    for entry in entries {
        let entry_len = entry.len();
        // Discord field value limit is 1024. We leave a bit of buffer.
        if current_length + entry_len + 1 > 1000 && !current_chunk.is_empty() {
            chunks.push(current_chunk);
            current_chunk = Vec::new();
            current_length = 0;
        }

        current_chunk.push(entry.clone());
        current_length += entry_len + 1;
    }

    if !current_chunk.is_empty() {
        chunks.push(current_chunk);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discord::cogs::all_commands;

    #[test]
    fn empty_query_is_overview() {
        let commands = all_commands();
        assert!(matches!(lookup_topic(None, &commands), HelpTopic::Overview));
        assert!(matches!(
            lookup_topic(Some("   "), &commands),
            HelpTopic::Overview
        ));
    }

    #[test]
    fn several_words_are_rejected() {
        let commands = all_commands();
        assert!(matches!(
            lookup_topic(Some("meta ping"), &commands),
            HelpTopic::TooManyTopics
        ));
    }

    #[test]
    fn cog_lists_visible_commands_only() {
        let commands = all_commands();
        match lookup_topic(Some("META"), &commands) {
            HelpTopic::Cog { cog, commands } => {
                assert_eq!(cog.name, "Meta");
                let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
                assert!(names.contains(&"ping"));
                assert!(names.contains(&"prefix"));
                assert!(!names.contains(&"help"));
                assert!(!names.contains(&"logout"));
            }
            _ => panic!("expected the Meta cog"),
        }
    }

    #[test]
    fn commands_resolve_by_name_or_alias() {
        let commands = all_commands();
        match lookup_topic(Some("Latency"), &commands) {
            HelpTopic::Command(command) => assert_eq!(command.name, "ping"),
            _ => panic!("expected ping"),
        }
        match lookup_topic(Some("change_prefix"), &commands) {
            HelpTopic::Command(command) => assert_eq!(command.name, "prefix"),
            _ => panic!("expected prefix"),
        }
    }

    #[test]
    fn hidden_cogs_and_unknown_names_are_not_found() {
        let commands = all_commands();
        match lookup_topic(Some("errors"), &commands) {
            HelpTopic::NotFound(topic) => assert_eq!(topic, "errors"),
            _ => panic!("hidden cog should not be a help topic"),
        }
        assert!(matches!(
            lookup_topic(Some("dance"), &commands),
            HelpTopic::NotFound(_)
        ));
    }

    #[test]
    fn signature_marks_optional_parameters() {
        let commands = all_commands();
        let find = |name: &str| commands.iter().find(|c| c.name == name).unwrap();
        assert_eq!(command_signature(find("ping")), "ping");
        assert_eq!(command_signature(find("whois")), "whois [member]");
        assert_eq!(command_signature(find("prefix")), "prefix [new_prefix]");
    }

    #[test]
    fn chunks_respect_field_limit() {
        let entries: Vec<String> = (0..30).map(|i| format!("{:0>60}", i)).collect();
        let chunks = chunk_entries(&entries);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.join("\n").len() <= 1024);
        }
        assert_eq!(chunks.iter().map(Vec::len).sum::<usize>(), 30);
    }
}
