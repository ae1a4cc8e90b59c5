use serde::{Deserialize, Serialize};

use crate::error::{ArcanaError, Result};

/// Name and speaking style the user gave the bot.
///
/// Stored as JSON under `@tarot_bot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotPersonality {
    pub name: String,
    pub style: String,
}

impl BotPersonality {
    pub fn new(name: &str, style: &str) -> Result<Self> {
        let (name, style) = (name.trim(), style.trim());
        if name.is_empty() || style.is_empty() {
            return Err(ArcanaError::validation("Please fill both name and style."));
        }
        Ok(Self {
            name: name.to_string(),
            style: style.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_name_and_style() {
        assert!(BotPersonality::new("Mystic Luna", "").is_err());
        assert!(BotPersonality::new("  ", "poetic").is_err());
        let persona = BotPersonality::new(" Mystic Luna ", "poetic").unwrap();
        assert_eq!(persona.name, "Mystic Luna");
    }
}
