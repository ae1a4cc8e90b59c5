//! Coins and daily check-in endpoints.

use arcana_core::error::Result;
use arcana_core::points::{CheckInStatus, PointsBackend};
use async_trait::async_trait;
use serde_json::{Value, json};

use crate::client::{BackendClient, extract_ack};

fn extract_coins(value: &Value) -> i64 {
    ["coins", "points"]
        .iter()
        .find_map(|field| value.get(field).and_then(Value::as_i64))
        .unwrap_or(0)
}

#[async_trait]
impl PointsBackend for BackendClient {
    async fn points(&self, user_id: &str) -> Result<i64> {
        let value: Value = self.get_json("get-points", &[("userId", user_id)]).await?;
        Ok(extract_coins(&value))
    }

    async fn check_in_status(&self, user_id: &str) -> Result<CheckInStatus> {
        self.get_json("check-in", &[("userId", user_id)]).await
    }

    async fn check_in(&self, user_id: &str) -> Result<CheckInStatus> {
        self.post_json("check-in", &json!({ "userId": user_id })).await
    }

    async fn update_points(&self, user_id: &str, points: i64) -> Result<()> {
        let value: Value = self
            .post_json("update-points", &json!({ "userId": user_id, "points": points }))
            .await?;
        extract_ack(&value, "Could not update points")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_coins() {
        assert_eq!(extract_coins(&json!({"coins": 120})), 120);
        assert_eq!(extract_coins(&json!({"points": 7})), 7);
        assert_eq!(extract_coins(&json!({})), 0);
    }
}
