//! Chat message types.

use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A tarot card shown inside the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFace {
    pub name: String,
    pub image: String,
    pub meaning: String,
}

/// Payload of a message.
///
/// Serialized flat next to the envelope fields, so the stored form is
/// `{"id":..,"sender":"bot","type":"card","card":{..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageBody {
    Text { text: String },
    Card { card: CardFace },
}

/// A single immutable chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique, timestamp-derived identifier (UUIDv7)
    pub id: String,
    pub sender: Sender,
    #[serde(flatten)]
    pub body: MessageBody,
}

impl ChatMessage {
    fn new(sender: Sender, body: MessageBody) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            sender,
            body,
        }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Sender::User, MessageBody::Text { text: text.into() })
    }

    pub fn bot_text(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, MessageBody::Text { text: text.into() })
    }

    pub fn bot_card(card: CardFace) -> Self {
        Self::new(Sender::Bot, MessageBody::Card { card })
    }

    /// Text content, if this is a text message.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text { text } => Some(text),
            MessageBody::Card { .. } => None,
        }
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}
