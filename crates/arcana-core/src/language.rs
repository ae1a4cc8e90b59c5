//! Display/answer language of the client.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

static CJK_IDEOGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{4e00}-\u{9fff}]").expect("static regex"));

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    /// Picks the language from a locale string such as `zh_CN.UTF-8`.
    pub fn from_locale(locale: &str) -> Self {
        if locale.to_ascii_lowercase().starts_with("zh") {
            Language::Zh
        } else {
            Language::En
        }
    }

    /// Language implied by the `LANG` environment variable.
    pub fn from_env() -> Self {
        std::env::var("LANG")
            .map(|l| Self::from_locale(&l))
            .unwrap_or_default()
    }
}

/// Detects the language of free text: any CJK unified ideograph means Chinese.
pub fn detect_language(text: &str) -> Language {
    if CJK_IDEOGRAPH.is_match(text) {
        Language::Zh
    } else {
        Language::En
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("Will I find love this year?"), Language::En);
        assert_eq!(detect_language("我今年会遇到爱情吗"), Language::Zh);
        assert_eq!(detect_language("Tarot 塔罗"), Language::Zh);
        assert_eq!(detect_language(""), Language::En);
    }

    #[test]
    fn test_from_locale() {
        assert_eq!(Language::from_locale("zh_CN.UTF-8"), Language::Zh);
        assert_eq!(Language::from_locale("en_US.UTF-8"), Language::En);
        assert_eq!(Language::from_locale("C"), Language::En);
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(Language::Zh.to_string(), "zh");
        assert_eq!(Language::from_str("ZH").unwrap(), Language::Zh);
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
    }
}
