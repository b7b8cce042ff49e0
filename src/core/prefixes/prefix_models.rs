use std::collections::BTreeMap;

/// Prefix used wherever a guild has no override, and in direct messages.
pub const DEFAULT_PREFIX: &str = "guh ";

/// Longest prefix a guild may configure.
pub const MAX_PREFIX_LEN: usize = 32;

/// Guild ID (as a decimal string, the way it is keyed on disk) to prefix.
///
/// A `BTreeMap` keeps the persisted file ordered so manual edits and diffs
/// stay readable.
pub type GuildPrefixMap = BTreeMap<String, String>;

pub fn guild_key(guild_id: u64) -> String {
    guild_id.to_string()
}
