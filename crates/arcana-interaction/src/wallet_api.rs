//! Balance and recharge history endpoints.

use arcana_core::error::{ArcanaError, Result};
use arcana_core::wallet::{RechargeEntry, WalletBackend};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::client::{BackendClient, decimal_field, error_message};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeductRequest<'a> {
    user_id: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
}

#[derive(Deserialize)]
struct HistoryReply {
    #[serde(default)]
    history: Option<Vec<RechargeEntry>>,
}

/// `{balance}` on success, `{error}` on refusal.
fn extract_balance(value: &Value, fallback: &str) -> Result<Decimal> {
    if let Some(balance) = decimal_field(value, "balance") {
        return Ok(balance);
    }
    Err(ArcanaError::backend(
        error_message(value).unwrap_or_else(|| fallback.to_string()),
    ))
}

#[async_trait]
impl WalletBackend for BackendClient {
    async fn fetch_balance(&self, user_id: &str) -> Result<Decimal> {
        let value: Value = self
            .post_json("get-balance", &json!({ "userId": user_id }))
            .await?;
        extract_balance(&value, "Balance unavailable")
    }

    async fn deduct_balance(&self, user_id: &str, amount: Decimal) -> Result<Decimal> {
        let request = DeductRequest { user_id, amount };
        let value: Value = self.post_json("deduct-balance", &request).await?;
        extract_balance(&value, "Deduction failed")
    }

    async fn recharge_history(&self, user_id: &str) -> Result<Vec<RechargeEntry>> {
        let reply: HistoryReply = self
            .post_json("get-recharge-history", &json!({ "userId": user_id }))
            .await?;
        reply
            .history
            .ok_or_else(|| ArcanaError::backend("No recharge history found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduct_request_shape() {
        let body = serde_json::to_value(DeductRequest {
            user_id: "u_1",
            amount: Decimal::from(6),
        })
        .unwrap();
        assert_eq!(body, json!({"userId": "u_1", "amount": 6.0}));
    }

    #[test]
    fn test_extract_balance() {
        assert_eq!(
            extract_balance(&json!({"balance": 4}), "x").unwrap(),
            Decimal::from(4)
        );
        let err = extract_balance(&json!({"error": "insufficient funds"}), "x").unwrap_err();
        assert!(matches!(err, ArcanaError::Backend(ref m) if m == "insufficient funds"));
        let err = extract_balance(&json!({}), "Deduction failed").unwrap_err();
        assert!(matches!(err, ArcanaError::Backend(ref m) if m == "Deduction failed"));
    }

    #[test]
    fn test_history_reply() {
        let reply: HistoryReply = serde_json::from_value(json!({
            "history": [{"amount": 30, "method": "PayPal", "createdAt": "2024-05-01T10:00:00Z"}]
        }))
        .unwrap();
        assert_eq!(reply.history.unwrap().len(), 1);
    }
}
