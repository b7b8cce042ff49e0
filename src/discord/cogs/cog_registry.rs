// Static cog registry.
//
// A cog bundles related commands with an `on_ready` hook. The set of cogs is
// fixed at compile time; the readiness tracker is built from `cog_names()` and
// the framework's command list from `all_commands()`.

pub mod errors;
pub mod meta;

use crate::discord::{BoxFuture, Data, Error};
use poise::serenity_prelude as serenity;

pub type ReadyHook =
    for<'a> fn(&'a serenity::Context, &'a Data) -> BoxFuture<'a, Result<(), Error>>;

pub struct CogDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// Hidden cogs are left out of the help module list.
    pub hidden: bool,
    pub commands: fn() -> Vec<poise::Command<Data, Error>>,
    /// Runs once after the gateway is ready. Must call `mark_ready` for this
    /// cog when its setup is done.
    pub on_ready: ReadyHook,
}

pub static COGS: &[CogDescriptor] = &[meta::COG, errors::COG];

pub fn cog_names() -> Vec<&'static str> {
    COGS.iter().map(|cog| cog.name).collect()
}

pub fn find_cog(name: &str) -> Option<&'static CogDescriptor> {
    COGS.iter().find(|cog| cog.name.eq_ignore_ascii_case(name))
}

pub fn all_commands() -> Vec<poise::Command<Data, Error>> {
    COGS.iter().flat_map(|cog| (cog.commands)()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn cog_names_are_unique() {
        let names = cog_names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert!(names.contains(&"Meta"));
        assert!(names.contains(&"Errors"));
    }

    #[test]
    fn commands_are_categorised_by_their_cog() {
        for cog in COGS {
            for command in (cog.commands)() {
                assert_eq!(
                    command.category.as_deref(),
                    Some(cog.name),
                    "command {} is filed under the wrong cog",
                    command.name
                );
            }
        }
    }

    #[test]
    fn command_names_and_aliases_do_not_collide() {
        let mut seen = HashSet::new();
        for command in all_commands() {
            assert!(seen.insert(command.name.clone()), "{}", command.name);
            for alias in &command.aliases {
                assert!(seen.insert(alias.clone()), "{}", alias);
            }
        }
    }

    #[test]
    fn find_cog_ignores_case() {
        assert_eq!(find_cog("meta").map(|c| c.name), Some("Meta"));
        assert!(find_cog("music").is_none());
    }
}
