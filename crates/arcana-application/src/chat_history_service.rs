//! Browsing and deleting past chat sessions.

use std::sync::Arc;

use arcana_core::error::{ArcanaError, Result};
use arcana_core::session::{
    ChatMessage, ChatSessionMeta, ChatTranscript, TranscriptRepository, delete_session,
};

pub struct ChatHistoryService {
    repository: Arc<dyn TranscriptRepository>,
}

impl ChatHistoryService {
    pub fn new(repository: Arc<dyn TranscriptRepository>) -> Self {
        Self { repository }
    }

    /// Past sessions, newest first, optionally filtered by a case-insensitive
    /// title substring.
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<ChatSessionMeta>> {
        let needle = filter
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty());

        let mut sessions: Vec<ChatSessionMeta> = self
            .repository
            .list_index()
            .await?
            .into_iter()
            .filter(|meta| match &needle {
                Some(needle) => meta.title.to_lowercase().contains(needle),
                None => true,
            })
            .collect();
        sessions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(sessions)
    }

    /// Messages of a listed session.
    pub async fn open(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        if self.repository.find_index_entry(session_id).await?.is_none() {
            return Err(ArcanaError::not_found("chat session", session_id));
        }
        let transcript = ChatTranscript::load(session_id, self.repository.clone()).await?;
        Ok(transcript.messages().to_vec())
    }

    pub async fn delete(&self, session_id: &str) -> Result<()> {
        delete_session(self.repository.as_ref(), session_id).await
    }
}
