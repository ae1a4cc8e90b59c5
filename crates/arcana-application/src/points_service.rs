//! Coins and daily check-in of the logged-in user.

use std::sync::Arc;

use arcana_core::auth::ProfileUpdate;
use arcana_core::error::Result;
use arcana_core::points::{CheckInStatus, PointsBackend};
use arcana_core::storage::KeyValueStore;

use crate::auth_service::{AuthService, require_user_id};

pub struct PointsService {
    backend: Arc<dyn PointsBackend>,
    store: Arc<dyn KeyValueStore>,
    auth: Arc<AuthService>,
}

impl PointsService {
    pub fn new(
        backend: Arc<dyn PointsBackend>,
        store: Arc<dyn KeyValueStore>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self {
            backend,
            store,
            auth,
        }
    }

    /// Current coin total, mirrored into the stored profile.
    pub async fn points(&self) -> Result<i64> {
        let user_id = require_user_id(self.store.as_ref()).await?;
        let points = self.backend.points(&user_id).await?;
        self.mirror(points).await;
        Ok(points)
    }

    pub async fn check_in_status(&self) -> Result<CheckInStatus> {
        let user_id = require_user_id(self.store.as_ref()).await?;
        self.backend.check_in_status(&user_id).await
    }

    /// Checks in for today. A second check-in on the same day reports
    /// `already_checked_in` and changes nothing.
    pub async fn check_in(&self) -> Result<CheckInStatus> {
        let user_id = require_user_id(self.store.as_ref()).await?;
        let status = self.backend.check_in(&user_id).await?;

        if !status.already_checked_in {
            if let Some(points) = status.new_points {
                self.mirror(points).await;
            }
            tracing::info!(streak = status.streak, reward = ?status.today_reward, "checked in");
        }
        Ok(status)
    }

    pub async fn update_points(&self, points: i64) -> Result<()> {
        let user_id = require_user_id(self.store.as_ref()).await?;
        self.backend.update_points(&user_id, points).await?;
        self.mirror(points).await;
        Ok(())
    }

    async fn mirror(&self, points: i64) {
        let update = ProfileUpdate {
            points: Some(points),
            ..Default::default()
        };
        if let Err(e) = self.auth.update_profile(&update).await {
            tracing::warn!(error = %e, "failed to mirror points into profile");
        }
    }
}
