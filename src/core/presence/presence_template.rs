// Presence text shown under the bot's name.
//
// The template's first word picks the activity kind, the rest is the text.
// Placeholders are filled from live stats every time the scheduler ticks.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PRESENCE: &str =
    "watching @GuhBot help | {guilds} servers & {users} users | version {version}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Playing,
    Watching,
    ListeningTo,
    Streaming,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Playing => "playing",
            ActivityKind::Watching => "watching",
            ActivityKind::ListeningTo => "listening-to",
            ActivityKind::Streaming => "streaming",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = PresenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "playing" => Ok(ActivityKind::Playing),
            "watching" => Ok(ActivityKind::Watching),
            "listening-to" => Ok(ActivityKind::ListeningTo),
            "streaming" => Ok(ActivityKind::Streaming),
            other => Err(PresenceError::InvalidActivity(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PresenceError {
    #[error("Invalid activity type `{0}` (expected playing, watching, listening-to or streaming)")]
    InvalidActivity(String),
    #[error("Presence template has no text after the activity type")]
    MissingText,
}

/// Numbers substituted into the template.
#[derive(Debug, Clone, Default)]
pub struct PresenceStats {
    pub guilds: usize,
    pub users: usize,
    pub version: String,
}

/// A rendered presence ready to hand to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    pub kind: ActivityKind,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct PresenceTemplate {
    kind: ActivityKind,
    text: String,
}

impl PresenceTemplate {
    pub fn new(template: &str) -> Result<Self, PresenceError> {
        let template = template.trim();
        let (kind, text) = template.split_once(' ').unwrap_or((template, ""));
        let kind: ActivityKind = kind.parse()?;

        let text = text.trim();
        if text.is_empty() {
            return Err(PresenceError::MissingText);
        }

        Ok(Self {
            kind,
            text: text.to_string(),
        })
    }

    #[cfg(test)]
    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn render(&self, stats: &PresenceStats) -> Presence {
        let text = self
            .text
            .replace("{guilds}", &group_thousands(stats.guilds))
            .replace("{users}", &group_thousands(stats.users))
            .replace("{version}", &stats.version);

        Presence {
            kind: self.kind,
            text,
        }
    }
}

impl Default for PresenceTemplate {
    fn default() -> Self {
        Self {
            kind: ActivityKind::Watching,
            text: DEFAULT_PRESENCE
                .trim_start_matches("watching ")
                .to_string(),
        }
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_matches_parsed_default() {
        let parsed = PresenceTemplate::new(DEFAULT_PRESENCE).unwrap();
        let builtin = PresenceTemplate::default();
        assert_eq!(parsed.kind(), builtin.kind());
        assert_eq!(parsed.text, builtin.text);
    }

    #[test]
    fn renders_stats_into_text() {
        let template = PresenceTemplate::default();
        let presence = template.render(&PresenceStats {
            guilds: 1520,
            users: 1_234_567,
            version: "0.1.0".to_string(),
        });

        assert_eq!(presence.kind, ActivityKind::Watching);
        assert_eq!(
            presence.text,
            "@GuhBot help | 1,520 servers & 1,234,567 users | version 0.1.0"
        );
    }

    #[test]
    fn parses_every_activity_kind() {
        for kind in [
            ActivityKind::Playing,
            ActivityKind::Watching,
            ActivityKind::ListeningTo,
            ActivityKind::Streaming,
        ] {
            let template = PresenceTemplate::new(&format!("{} something", kind)).unwrap();
            assert_eq!(template.kind(), kind);
        }
    }

    #[test]
    fn rejects_unknown_activity_and_missing_text() {
        assert_eq!(
            PresenceTemplate::new("dancing with {users} users").unwrap_err(),
            PresenceError::InvalidActivity("dancing".to_string())
        );
        assert_eq!(
            PresenceTemplate::new("watching").unwrap_err(),
            PresenceError::MissingText
        );
        assert_eq!(
            PresenceTemplate::new("playing    ").unwrap_err(),
            PresenceError::MissingText
        );
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(100_000), "100,000");
    }
}
