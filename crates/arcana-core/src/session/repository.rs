//! Transcript repository trait.
//!
//! Defines the interface for transcript and history index persistence.

use super::message::ChatMessage;
use super::meta::ChatSessionMeta;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for chat transcripts and their history index.
///
/// This trait decouples the transcript logic from the specific storage
/// mechanism (key-value store, files, remote API).
#[async_trait]
pub trait TranscriptRepository: Send + Sync {
    /// Loads the messages of a session.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec)`: Stored messages in append order, empty if none were stored
    /// - `Err(_)`: Error occurred during retrieval
    async fn load_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>>;

    /// Replaces the stored messages of a session with `messages`.
    async fn save_messages(&self, session_id: &str, messages: &[ChatMessage]) -> Result<()>;

    /// Deletes the stored messages of a session (missing is not an error).
    async fn delete_messages(&self, session_id: &str) -> Result<()>;

    /// Lists the history index in insertion order.
    async fn list_index(&self) -> Result<Vec<ChatSessionMeta>>;

    /// Finds the index entry of a session.
    async fn find_index_entry(&self, session_id: &str) -> Result<Option<ChatSessionMeta>>;

    /// Adds an index entry unless one with the same id already exists.
    async fn insert_index_entry(&self, meta: ChatSessionMeta) -> Result<()>;

    /// Removes the index entry of a session (missing is not an error).
    async fn remove_index_entry(&self, session_id: &str) -> Result<()>;
}
