use super::prefix_models::GuildPrefixMap;
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Prefix store not found at {0}")]
    Missing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed prefix store: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Whole-map persistence for guild prefixes. Lookups and upserts are done by
/// the service on top of `load_all`/`save_all`.
#[async_trait]
pub trait PrefixStore: Send + Sync {
    async fn load_all(&self) -> Result<GuildPrefixMap, StoreError>;
    async fn save_all(&self, prefixes: &GuildPrefixMap) -> Result<(), StoreError>;
}
