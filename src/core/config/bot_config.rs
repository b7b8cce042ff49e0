// Runtime configuration, read from the environment (and `.env` via dotenv in
// main). Only the token is required; everything else has a default.

use crate::core::prefixes::DEFAULT_PREFIX;
use crate::core::presence::{PresenceError, PresenceTemplate};
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_SUPPORT_URL: &str = "https://discord.gg/gKvM8mE";
pub const DEFAULT_INVITE_URL: &str = "https://discord.com/api/oauth2/authorize?client_id=624754986248831017&permissions=536210679&scope=bot";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {0} environment variable! Create a .env file with your bot token.")]
    MissingToken(&'static str),
    #[error("GUHBOT_DEFAULT_PREFIX cannot be empty")]
    EmptyPrefix,
    #[error("Invalid GUHBOT_PRESENCE: {0}")]
    Presence(#[from] PresenceError),
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub data_dir: PathBuf,
    pub default_prefix: String,
    pub presence: PresenceTemplate,
    pub support_url: String,
    pub invite_url: String,
    pub version: String,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).filter(|v| !v.is_empty()).cloned();

        let token = get("DISCORD_TOKEN").ok_or(ConfigError::MissingToken("DISCORD_TOKEN"))?;

        // The default prefix usually ends in a space, so it is not trimmed.
        let default_prefix = match vars.get("GUHBOT_DEFAULT_PREFIX") {
            Some(p) if p.trim().is_empty() => return Err(ConfigError::EmptyPrefix),
            Some(p) => p.clone(),
            None => DEFAULT_PREFIX.to_string(),
        };

        let presence = match get("GUHBOT_PRESENCE") {
            Some(template) => PresenceTemplate::new(&template)?,
            None => PresenceTemplate::default(),
        };

        Ok(Self {
            token,
            data_dir: get("GUHBOT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            default_prefix,
            presence,
            support_url: get("GUHBOT_SUPPORT_URL")
                .unwrap_or_else(|| DEFAULT_SUPPORT_URL.to_string()),
            invite_url: get("GUHBOT_INVITE_URL").unwrap_or_else(|| DEFAULT_INVITE_URL.to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    pub fn prefix_store_path(&self) -> PathBuf {
        self.data_dir.join("prefixes.json")
    }
}
