//! History index entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

/// Maximum number of characters kept from the first user message.
pub const TITLE_MAX_CHARS: usize = 40;
/// Title used when a transcript has no user text yet.
pub const UNTITLED: &str = "Untitled Tarot Chat";

/// Entry of the chat history index.
///
/// Created once, when a session first holds a message; only ever removed
/// afterwards, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSessionMeta {
    pub id: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatSessionMeta {
    /// Builds the index entry for `session_id` from its messages.
    ///
    /// Returns `None` for an empty transcript.
    pub fn from_messages(session_id: &str, messages: &[ChatMessage]) -> Option<Self> {
        if messages.is_empty() {
            return None;
        }

        let title = messages
            .iter()
            .filter(|m| m.is_from_user())
            .find_map(|m| m.text())
            .map(derive_title)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        Some(Self {
            id: session_id.to_string(),
            title,
            timestamp: Utc::now(),
        })
    }
}

/// Trimmed message text, cut to [`TITLE_MAX_CHARS`] characters plus an ellipsis.
pub fn derive_title(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        let head: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}…")
    } else {
        trimmed.to_string()
    }
}
