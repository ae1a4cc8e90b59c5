use rust_decimal::Decimal;

use crate::config::BillingSettings;

/// Budget and prices applied to chat sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingPolicy {
    /// Seconds of chat granted per billed interval.
    pub budget_secs: u64,
    /// Seconds given back by one paid extension.
    pub extension_secs: u64,
    /// Price of one extension.
    pub extension_price: Decimal,
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self::from(&BillingSettings::default())
    }
}

impl From<&BillingSettings> for BillingPolicy {
    fn from(settings: &BillingSettings) -> Self {
        Self {
            budget_secs: settings.session_budget_secs.max(1),
            extension_secs: settings.extension_secs,
            extension_price: settings.extension_price,
        }
    }
}
