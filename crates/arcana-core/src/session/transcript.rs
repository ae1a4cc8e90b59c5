//! Append-only message log of one session.

use std::sync::Arc;

use super::message::ChatMessage;
use super::meta::ChatSessionMeta;
use super::repository::TranscriptRepository;
use crate::error::Result;

/// Ordered message log bound to a session id.
///
/// Every append persists the full list under the session's key. Storage
/// failures are logged and swallowed; the in-memory list stays the source of
/// truth for the lifetime of the session view.
pub struct ChatTranscript {
    session_id: String,
    messages: Vec<ChatMessage>,
    indexed: bool,
    repository: Arc<dyn TranscriptRepository>,
}

impl ChatTranscript {
    /// Starts an empty transcript for a new session.
    pub fn new(session_id: impl Into<String>, repository: Arc<dyn TranscriptRepository>) -> Self {
        Self {
            session_id: session_id.into(),
            messages: Vec::new(),
            indexed: false,
            repository,
        }
    }

    /// Restores a previously persisted transcript.
    ///
    /// A session that was never stored yields an empty transcript, not an error.
    pub async fn load(
        session_id: impl Into<String>,
        repository: Arc<dyn TranscriptRepository>,
    ) -> Result<Self> {
        let session_id = session_id.into();
        let messages = repository.load_messages(&session_id).await?;
        let indexed = repository.find_index_entry(&session_id).await?.is_some();
        Ok(Self {
            session_id,
            messages,
            indexed,
            repository,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Appends a message and persists the whole list.
    ///
    /// The first append of a session also registers its history index entry.
    pub async fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);

        if let Err(e) = self
            .repository
            .save_messages(&self.session_id, &self.messages)
            .await
        {
            tracing::warn!(session_id = %self.session_id, error = %e, "failed to persist transcript");
        }

        if !self.indexed {
            if let Some(meta) = self.summarize() {
                match self.repository.insert_index_entry(meta).await {
                    Ok(()) => self.indexed = true,
                    Err(e) => {
                        tracing::warn!(session_id = %self.session_id, error = %e, "failed to index session")
                    }
                }
            }
        }
    }

    /// History index entry for this transcript, `None` while empty.
    pub fn summarize(&self) -> Option<ChatSessionMeta> {
        ChatSessionMeta::from_messages(&self.session_id, &self.messages)
    }
}

/// Removes a session's transcript and then its history index entry.
///
/// The two writes are not atomic: a failure between them can leave an orphaned
/// index entry, which is not repaired automatically.
pub async fn delete_session(repository: &dyn TranscriptRepository, session_id: &str) -> Result<()> {
    repository.delete_messages(session_id).await?;
    repository.remove_index_entry(session_id).await?;
    tracing::info!(session_id, "chat session deleted");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::MockTranscriptRepository;
    use super::*;
    use crate::session::message::CardFace;

    #[tokio::test]
    async fn test_append_then_load_preserves_order_and_fields() {
        let repo = Arc::new(MockTranscriptRepository::default());
        let mut transcript = ChatTranscript::new("s_1", repo.clone());

        let sent = vec![
            ChatMessage::user_text("Will I travel soon?"),
            ChatMessage::bot_text("The road opens before you."),
            ChatMessage::bot_card(CardFace {
                name: "The Chariot".to_string(),
                image: "chariot.jpg".to_string(),
                meaning: "Control, willpower, victory".to_string(),
            }),
            ChatMessage::user_text("When?"),
        ];
        for msg in sent.clone() {
            transcript.append(msg).await;
        }

        let loaded = ChatTranscript::load("s_1", repo.clone()).await.unwrap();
        assert_eq!(loaded.messages(), sent.as_slice());
        assert_eq!(*repo.save_calls.lock().unwrap(), 4);
    }

    #[tokio::test]
    async fn test_first_append_creates_single_index_entry() {
        let repo = Arc::new(MockTranscriptRepository::default());
        let mut transcript = ChatTranscript::new("s_2", repo.clone());
        assert!(transcript.summarize().is_none());

        transcript.append(ChatMessage::user_text("First question")).await;
        transcript.append(ChatMessage::user_text("Second question")).await;

        let index = repo.list_index().await.unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].title, "First question");
    }

    #[tokio::test]
    async fn test_load_unknown_session_is_empty() {
        let repo = Arc::new(MockTranscriptRepository::default());
        let transcript = ChatTranscript::load("missing", repo).await.unwrap();
        assert!(transcript.is_empty());
    }

    #[tokio::test]
    async fn test_delete_session_removes_transcript_and_index() {
        let repo = Arc::new(MockTranscriptRepository::default());
        let mut transcript = ChatTranscript::new("s_3", repo.clone());
        transcript.append(ChatMessage::user_text("Hello")).await;

        delete_session(repo.as_ref(), "s_3").await.unwrap();

        assert!(repo.find_index_entry("s_3").await.unwrap().is_none());
        let reloaded = ChatTranscript::load("s_3", repo.clone()).await.unwrap();
        assert!(reloaded.is_empty());
    }
}
