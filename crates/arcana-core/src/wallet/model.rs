use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// Spendable balance, always in RMB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Balance {
    pub amount: Decimal,
}

impl Balance {
    pub const CURRENCY: &'static str = "RMB";

    pub fn new(amount: Decimal) -> Self {
        Self { amount }
    }

    pub fn covers(&self, price: Decimal) -> bool {
        self.amount >= price
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount.normalize(), Self::CURRENCY)
    }
}

/// External payment providers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum PaymentMethod {
    #[strum(serialize = "wechat")]
    WeChat,
    #[strum(serialize = "alipay")]
    Alipay,
    #[strum(serialize = "paypal")]
    PayPal,
    #[strum(serialize = "stripe")]
    Stripe,
}

/// How the front end continues a payment the backend has prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentRedirect {
    /// Open this URL (WeChat H5, PayPal approval).
    Url(String),
    /// Render this HTML form in a web view (Alipay).
    HtmlForm(String),
    /// Hand this secret to the card field (Stripe).
    ClientSecret(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub redirect: PaymentRedirect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
}

/// Out-of-band confirmation reported by a payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub status: PaymentStatus,
    pub amount: Decimal,
    pub method: PaymentMethod,
}

/// One line of the recharge history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeEntry {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default, alias = "timestamp", alias = "date")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Proof that the backend accepted a debit.
///
/// Only [`super::BalanceLedger::debit`] creates receipts, so holding one means
/// the money was actually taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebitReceipt {
    amount: Decimal,
    balance: Balance,
}

impl DebitReceipt {
    pub(crate) fn new(amount: Decimal, balance: Balance) -> Self {
        Self { amount, balance }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Balance reported by the backend after the debit.
    pub fn balance(&self) -> Balance {
        self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_balance_display() {
        assert_eq!(Balance::new(Decimal::new(400, 2)).to_string(), "4 RMB");
        assert_eq!(Balance::new(Decimal::new(1050, 2)).to_string(), "10.5 RMB");
    }

    #[test]
    fn test_balance_covers_exact_price() {
        let balance = Balance::new(Decimal::from(6));
        assert!(balance.covers(Decimal::from(6)));
        assert!(!balance.covers(Decimal::new(601, 2)));
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!(PaymentMethod::from_str("WeChat").unwrap(), PaymentMethod::WeChat);
        assert_eq!(PaymentMethod::from_str("paypal").unwrap(), PaymentMethod::PayPal);
        assert_eq!(PaymentMethod::Alipay.to_string(), "alipay");
        assert!(PaymentMethod::from_str("cash").is_err());
    }

    #[test]
    fn test_recharge_entry_accepts_backend_shapes() {
        let entry: RechargeEntry = serde_json::from_str(
            r#"{"amount": 30, "method": "PayPal", "createdAt": "2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(entry.amount, Decimal::from(30));
        assert_eq!(entry.method.as_deref(), Some("PayPal"));
        assert!(entry.created_at.is_some());

        let legacy: RechargeEntry =
            serde_json::from_str(r#"{"amount": 12.5, "timestamp": "2024-05-01T10:00:00Z"}"#).unwrap();
        assert_eq!(legacy.amount, Decimal::new(125, 1));
        assert!(legacy.method.is_none());
    }
}
