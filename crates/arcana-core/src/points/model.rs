use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One rewarded day of the check-in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub date: String,
    #[serde(default)]
    pub coins: i64,
}

/// Check-in state as reported by the backend.
///
/// The 7-day reward cycle is computed server side; `streak` is the day of the
/// cycle and `today_reward` the coins granted (or grantable) today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInStatus {
    #[serde(default)]
    pub already_checked_in: bool,
    #[serde(default = "default_streak")]
    pub streak: u32,
    #[serde(default)]
    pub history: Vec<CheckInRecord>,
    #[serde(default)]
    pub today_reward: Option<i64>,
    /// Coin total after a successful check-in.
    #[serde(default)]
    pub new_points: Option<i64>,
}

fn default_streak() -> u32 {
    1
}

#[async_trait]
pub trait PointsBackend: Send + Sync {
    /// Coin total of `user_id`.
    async fn points(&self, user_id: &str) -> Result<i64>;

    async fn check_in_status(&self, user_id: &str) -> Result<CheckInStatus>;

    /// Claims today's reward. A repeated claim reports `already_checked_in`.
    async fn check_in(&self, user_id: &str) -> Result<CheckInStatus>;

    /// Overwrites the coin total of `user_id`.
    async fn update_points(&self, user_id: &str, points: i64) -> Result<()>;
}
