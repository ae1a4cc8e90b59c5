use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::language::Language;

/// One question for the remote tarot bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotRequest {
    pub question: String,
    pub system: String,
    pub lang: Language,
}

/// Reply body of the bot endpoint.
///
/// Different deployments answer under different field names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl BotResponse {
    /// First non-empty of `answer`, `reply`, `message`.
    pub fn into_text(self) -> Option<String> {
        [self.answer, self.reply, self.message]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }
}

#[async_trait]
pub trait TarotBot: Send + Sync {
    /// Asks the bot and returns its reply text.
    async fn ask(&self, request: &BotRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_field_precedence() {
        let body: BotResponse =
            serde_json::from_str(r#"{"answer":"","reply":"The moon rises.","message":"ignored"}"#)
                .unwrap();
        assert_eq!(body.into_text().as_deref(), Some("The moon rises."));

        let only_message: BotResponse = serde_json::from_str(r#"{"message":"Hi"}"#).unwrap();
        assert_eq!(only_message.into_text().as_deref(), Some("Hi"));

        let empty: BotResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.into_text().is_none());
    }

    #[test]
    fn test_request_shape() {
        let request = BotRequest {
            question: "Will it rain?".to_string(),
            system: "You are Luna".to_string(),
            lang: Language::Zh,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["lang"], "zh");
        assert_eq!(value["question"], "Will it rain?");
    }
}
