//! Application configuration model.
//!
//! The file lives at `~/.config/arcana/config.toml`; every field has a default
//! so a missing or partial file still yields a usable configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default functions endpoint of the hosted backend.
pub const DEFAULT_BACKEND_URL: &str = "https://backend-tarot-app.netlify.app/.netlify/functions";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub billing: BillingSettings,
    #[serde(default)]
    pub logging: LogSettings,
}

/// Remote backend location.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds. `None` keeps the HTTP client default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

/// Pricing and time budget of chat sessions.
///
/// # Fields
///
/// * `session_budget_secs` - chat seconds granted before a recharge is required
/// * `extension_secs` - seconds bought back by one paid extension
/// * `extension_price` - price of one extension
/// * `personality_change_price` - price of changing the bot personality after the free first setup
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BillingSettings {
    #[serde(default = "default_session_budget_secs")]
    pub session_budget_secs: u64,
    #[serde(default = "default_extension_secs")]
    pub extension_secs: u64,
    #[serde(default = "default_extension_price")]
    pub extension_price: Decimal,
    #[serde(default = "default_personality_change_price")]
    pub personality_change_price: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            session_budget_secs: default_session_budget_secs(),
            extension_secs: default_extension_secs(),
            extension_price: default_extension_price(),
            personality_change_price: default_personality_change_price(),
            currency: default_currency(),
        }
    }
}

fn default_session_budget_secs() -> u64 {
    180
}

fn default_extension_secs() -> u64 {
    60
}

fn default_extension_price() -> Decimal {
    Decimal::from(6)
}

fn default_personality_change_price() -> Decimal {
    Decimal::from(5)
}

fn default_currency() -> String {
    "RMB".to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_file_logging")]
    pub file_logging: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_logging: default_file_logging(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_file_logging() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.billing.session_budget_secs, 180);
        assert_eq!(config.billing.extension_price, Decimal::from(6));
        assert!(config.backend.request_timeout().is_none());
    }

    #[test]
    fn test_partial_billing_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [billing]
            session_budget_secs = 60
            extension_price = 5

            [backend]
            base_url = "http://localhost:8888"
            request_timeout_secs = 15
            "#,
        )
        .unwrap();

        assert_eq!(config.billing.session_budget_secs, 60);
        assert_eq!(config.billing.extension_secs, 60);
        assert_eq!(config.billing.extension_price, Decimal::from(5));
        assert_eq!(config.backend.base_url, "http://localhost:8888");
        assert_eq!(
            config.backend.request_timeout(),
            Some(Duration::from_secs(15))
        );
    }
}
