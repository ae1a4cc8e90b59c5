//! Transcript repository over the key-value store.
//!
//! Each transcript is a JSON array under `session_<id>`; the history index is a
//! JSON array of entries under `@chat_sessions`.

use std::sync::Arc;

use arcana_core::error::Result;
use arcana_core::session::{ChatMessage, ChatSessionMeta, TranscriptRepository};
use arcana_core::storage::{KeyValueStore, KeyValueStoreExt, keys};
use async_trait::async_trait;

pub struct KvTranscriptRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvTranscriptRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn save_index(&self, index: &[ChatSessionMeta]) -> Result<()> {
        self.store.set_json(keys::CHAT_SESSIONS, &index).await
    }
}

#[async_trait]
impl TranscriptRepository for KvTranscriptRepository {
    async fn load_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        Ok(self
            .store
            .get_json::<Vec<ChatMessage>>(&keys::transcript_key(session_id))
            .await?
            .unwrap_or_default())
    }

    async fn save_messages(&self, session_id: &str, messages: &[ChatMessage]) -> Result<()> {
        self.store
            .set_json(&keys::transcript_key(session_id), &messages)
            .await
    }

    async fn delete_messages(&self, session_id: &str) -> Result<()> {
        self.store.remove(&keys::transcript_key(session_id)).await
    }

    async fn list_index(&self) -> Result<Vec<ChatSessionMeta>> {
        Ok(self
            .store
            .get_json::<Vec<ChatSessionMeta>>(keys::CHAT_SESSIONS)
            .await?
            .unwrap_or_default())
    }

    async fn find_index_entry(&self, session_id: &str) -> Result<Option<ChatSessionMeta>> {
        Ok(self
            .list_index()
            .await?
            .into_iter()
            .find(|meta| meta.id == session_id))
    }

    async fn insert_index_entry(&self, meta: ChatSessionMeta) -> Result<()> {
        let mut index = self.list_index().await?;
        if index.iter().any(|existing| existing.id == meta.id) {
            return Ok(());
        }
        index.push(meta);
        self.save_index(&index).await
    }

    async fn remove_index_entry(&self, session_id: &str) -> Result<()> {
        let mut index = self.list_index().await?;
        let before = index.len();
        index.retain(|meta| meta.id != session_id);
        if index.len() == before {
            return Ok(());
        }
        self.save_index(&index).await
    }
}
