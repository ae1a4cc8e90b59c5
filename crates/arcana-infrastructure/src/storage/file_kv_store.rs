//! Key-value store persisted as one JSON object.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use arcana_core::error::{ArcanaError, Result};
use arcana_core::storage::KeyValueStore;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::atomic_file::AtomicFile;

type Entries = BTreeMap<String, String>;

/// File-backed [`KeyValueStore`].
///
/// All entries live in memory; every mutation rewrites the whole file
/// atomically under the `store.lock` advisory lock. Mutations are serialized
/// through the cache lock, so the file always reflects the last completed
/// write; another process writing the same file wins or loses as a whole.
pub struct FileKeyValueStore {
    file: Arc<AtomicFile<Entries>>,
    entries: Mutex<Entries>,
}

impl FileKeyValueStore {
    /// Opens the store at `path`, creating nothing until the first write.
    ///
    /// # Returns
    ///
    /// - `Ok(FileKeyValueStore)`: Existing entries loaded (or none)
    /// - `Err(_)`: The file exists but could not be read or parsed
    pub async fn open(path: PathBuf) -> Result<Self> {
        let file = Arc::new(AtomicFile::<Entries>::json(path));
        let loader = Arc::clone(&file);
        let entries = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|e| ArcanaError::internal(format!("store loader panicked: {e}")))??
            .unwrap_or_default();

        tracing::debug!(path = %file.path().display(), entries = entries.len(), "key-value store opened");
        Ok(Self {
            file,
            entries: Mutex::new(entries),
        })
    }

    async fn persist(&self, snapshot: Entries) -> Result<()> {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || file.save(&snapshot))
            .await
            .map_err(|e| ArcanaError::internal(format!("store writer panicked: {e}")))??;
        Ok(())
    }

    /// Applies `mutate` and writes the result; the cache keeps the old state
    /// when the write fails.
    async fn write_with<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Entries) -> bool,
    {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        if !mutate(&mut next) {
            return Ok(());
        }
        self.persist(next.clone()).await?;
        *entries = next;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.write_with(|entries| {
            entries.insert(key.to_string(), value);
            true
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.write_with(|entries| entries.remove(key).is_some())
            .await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .lock()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
