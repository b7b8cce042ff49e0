use crate::core::prefixes::{GuildPrefixMap, PrefixStore, StoreError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// JSON file store for guild prefixes: a single object `{ "guild_id": "prefix" }`.
///
/// Nothing is cached; every call hits the file.
pub struct JsonPrefixStore {
    path: PathBuf,
}

impl JsonPrefixStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seeds an empty `{}` store when none exists yet. An existing file is
    /// left alone, even if it is malformed.
    pub async fn ensure_exists(&self) -> Result<(), StoreError> {
        if fs::try_exists(&self.path).await? {
            return Ok(());
        }

        tracing::info!(path = %self.path.display(), "Creating empty prefix store");
        self.save_all(&GuildPrefixMap::new()).await
    }
}

#[async_trait]
impl PrefixStore for JsonPrefixStore {
    async fn load_all(&self) -> Result<GuildPrefixMap, StoreError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::Missing(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&text)?)
    }

    async fn save_all(&self, prefixes: &GuildPrefixMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Readers take no lock, so the file is replaced with a rename and is
        // never seen truncated.
        let text = serde_json::to_string_pretty(prefixes)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, text).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}
