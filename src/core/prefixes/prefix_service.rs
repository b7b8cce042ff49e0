use super::prefix_models::{guild_key, MAX_PREFIX_LEN};
use super::prefix_store::{PrefixStore, StoreError};
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum PrefixError {
    #[error("Prefix configuration error: {0}")]
    Configuration(#[from] StoreError),
    #[error("Invalid prefix: {0}")]
    InvalidPrefix(String),
}

/// Resolves and updates per-guild command prefixes.
///
/// The store is re-read on every `resolve`, so an operator editing the file by
/// hand sees the change on the next message without restarting the bot.
/// Writes hold `write_lock` for the whole load/modify/save cycle so two guilds
/// changing their prefix at the same time cannot clobber each other.
pub struct PrefixService<S: PrefixStore> {
    store: S,
    default_prefix: String,
    write_lock: Mutex<()>,
}

impl<S: PrefixStore> PrefixService<S> {
    #[cfg(test)]
    pub fn new(store: S) -> Self {
        Self::with_default(store, super::prefix_models::DEFAULT_PREFIX)
    }

    pub fn with_default(store: S, default_prefix: impl Into<String>) -> Self {
        Self {
            store,
            default_prefix: default_prefix.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn default_prefix(&self) -> &str {
        &self.default_prefix
    }

    /// Effective prefix for a guild. A guild without an override gets the
    /// default; a missing or unreadable store is an error, never a default.
    pub async fn resolve(&self, guild_id: u64) -> Result<String, PrefixError> {
        let prefixes = self.store.load_all().await?;
        Ok(prefixes
            .get(&guild_key(guild_id))
            .cloned()
            .unwrap_or_else(|| self.default_prefix.clone()))
    }

    /// Prefix for an optional guild. Direct messages always use the default.
    pub async fn resolve_for(&self, guild_id: Option<u64>) -> Result<String, PrefixError> {
        match guild_id {
            Some(guild_id) => self.resolve(guild_id).await,
            None => Ok(self.default_prefix.clone()),
        }
    }

    pub async fn set_prefix(&self, guild_id: u64, new_prefix: &str) -> Result<(), PrefixError> {
        validate_prefix(new_prefix)?;

        let _guard = self.write_lock.lock().await;
        let mut prefixes = self.store.load_all().await?;
        prefixes.insert(guild_key(guild_id), new_prefix.to_string());
        self.store.save_all(&prefixes).await?;

        tracing::info!(guild_id, prefix = new_prefix, "Guild prefix updated");
        Ok(())
    }

    /// Drops a guild's override so it falls back to the default prefix.
    pub async fn reset(&self, guild_id: u64) -> Result<(), PrefixError> {
        self.remove_entry(guild_id).await?;
        tracing::info!(guild_id, "Guild prefix reset to default");
        Ok(())
    }

    /// Removes all prefix state for a guild the bot has left. Returns whether
    /// an entry existed.
    pub async fn forget_guild(&self, guild_id: u64) -> Result<bool, PrefixError> {
        let removed = self.remove_entry(guild_id).await?;
        if removed {
            tracing::info!(guild_id, "Pruned prefix for departed guild");
        }
        Ok(removed)
    }

    async fn remove_entry(&self, guild_id: u64) -> Result<bool, PrefixError> {
        let _guard = self.write_lock.lock().await;
        let mut prefixes = self.store.load_all().await?;
        if prefixes.remove(&guild_key(guild_id)).is_none() {
            return Ok(false);
        }
        self.store.save_all(&prefixes).await?;
        Ok(true)
    }
}

fn validate_prefix(prefix: &str) -> Result<(), PrefixError> {
    if prefix.trim().is_empty() {
        return Err(PrefixError::InvalidPrefix(
            "prefix cannot be empty".to_string(),
        ));
    }
    if prefix.chars().count() > MAX_PREFIX_LEN {
        return Err(PrefixError::InvalidPrefix(format!(
            "prefix cannot be longer than {} characters",
            MAX_PREFIX_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prefixes::GuildPrefixMap;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Arc;

    /// In-memory store for testing. `None` behaves like a missing file.
    struct MockPrefixStore {
        data: std::sync::Mutex<Option<GuildPrefixMap>>,
    }

    impl MockPrefixStore {
        fn with(entries: &[(&str, &str)]) -> Self {
            let map = entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Self {
                data: std::sync::Mutex::new(Some(map)),
            }
        }

        fn missing() -> Self {
            Self {
                data: std::sync::Mutex::new(None),
            }
        }

        fn snapshot(&self) -> GuildPrefixMap {
            self.data.lock().unwrap().clone().unwrap_or_default()
        }
    }

    #[async_trait]
    impl PrefixStore for MockPrefixStore {
        async fn load_all(&self) -> Result<GuildPrefixMap, StoreError> {
            let loaded = self.data.lock().unwrap().clone();
            // Give other tasks a chance to interleave between load and save.
            tokio::task::yield_now().await;
            loaded.ok_or_else(|| StoreError::Missing(PathBuf::from("memory")))
        }

        async fn save_all(&self, prefixes: &GuildPrefixMap) -> Result<(), StoreError> {
            *self.data.lock().unwrap() = Some(prefixes.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn unknown_guild_gets_default_prefix() {
        let service = PrefixService::new(MockPrefixStore::with(&[("111", "!")]));
        assert_eq!(service.resolve(999).await.unwrap(), "guh ");
    }

    #[tokio::test]
    async fn direct_messages_use_default_without_touching_store() {
        let service = PrefixService::new(MockPrefixStore::missing());
        assert_eq!(service.resolve_for(None).await.unwrap(), "guh ");
    }

    #[tokio::test]
    async fn stored_overrides_and_upsert() {
        let service = PrefixService::new(MockPrefixStore::with(&[("111", "!"), ("222", "?")]));

        assert_eq!(service.resolve(111).await.unwrap(), "!");
        assert_eq!(service.resolve(222).await.unwrap(), "?");
        assert_eq!(service.resolve(333).await.unwrap(), "guh ");

        service.set_prefix(333, "$").await.unwrap();
        assert_eq!(service.resolve(333).await.unwrap(), "$");
        assert_eq!(service.store.snapshot().len(), 3);

        service.set_prefix(111, ">>").await.unwrap();
        assert_eq!(service.resolve(111).await.unwrap(), ">>");
        assert_eq!(service.store.snapshot().len(), 3);
    }

    #[tokio::test]
    async fn missing_store_is_a_configuration_error() {
        let service = PrefixService::new(MockPrefixStore::missing());
        let err = service.resolve(111).await.unwrap_err();
        assert!(matches!(
            err,
            PrefixError::Configuration(StoreError::Missing(_))
        ));

        let err = service.set_prefix(111, "!").await.unwrap_err();
        assert!(matches!(err, PrefixError::Configuration(_)));
    }

    #[tokio::test]
    async fn rejects_blank_and_oversized_prefixes() {
        let service = PrefixService::new(MockPrefixStore::with(&[]));
        assert!(matches!(
            service.set_prefix(1, "   ").await,
            Err(PrefixError::InvalidPrefix(_))
        ));
        let long = "x".repeat(MAX_PREFIX_LEN + 1);
        assert!(matches!(
            service.set_prefix(1, &long).await,
            Err(PrefixError::InvalidPrefix(_))
        ));
        assert!(service.store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn reset_and_forget_remove_the_entry() {
        let service = PrefixService::new(MockPrefixStore::with(&[("111", "!"), ("222", "?")]));

        service.reset(111).await.unwrap();
        assert_eq!(service.resolve(111).await.unwrap(), "guh ");

        assert!(service.forget_guild(222).await.unwrap());
        assert!(!service.forget_guild(222).await.unwrap());
        assert!(service.store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn custom_default_prefix() {
        let service = PrefixService::with_default(MockPrefixStore::with(&[]), "!");
        assert_eq!(service.default_prefix(), "!");
        assert_eq!(service.resolve(5).await.unwrap(), "!");
    }

    #[tokio::test]
    async fn concurrent_writers_keep_every_guild() {
        let service = Arc::new(PrefixService::new(MockPrefixStore::with(&[])));

        let mut handles = Vec::new();
        for guild_id in 0..16u64 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .set_prefix(guild_id, &format!("{}!", guild_id))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = service.store.snapshot();
        assert_eq!(stored.len(), 16);
        assert_eq!(stored.get("7").map(String::as_str), Some("7!"));
    }
}
