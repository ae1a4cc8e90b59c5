//! Local mirror of the remote balance.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use rust_decimal::Decimal;

use super::backend::WalletBackend;
use super::model::{Balance, DebitReceipt, PaymentConfirmation, PaymentStatus, RechargeEntry};
use crate::error::{ArcanaError, Result};
use crate::storage::{KeyValueStore, KeyValueStoreExt, keys};

/// Proxy for the user's remote balance.
///
/// The backend is the authority: the cached value changes only after the
/// backend confirmed a debit or reported a fresh balance. The cache is
/// mirrored to `@wallet_balance` for display across restarts.
pub struct BalanceLedger {
    backend: Arc<dyn WalletBackend>,
    store: Arc<dyn KeyValueStore>,
    cached: RwLock<Balance>,
}

impl BalanceLedger {
    /// Creates a ledger seeded from the persisted display cache.
    pub async fn load(backend: Arc<dyn WalletBackend>, store: Arc<dyn KeyValueStore>) -> Self {
        let amount = match store.get_parsed::<Decimal>(keys::WALLET_BALANCE).await {
            Ok(amount) => amount.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable cached balance");
                Decimal::ZERO
            }
        };
        Self {
            backend,
            store,
            cached: RwLock::new(Balance::new(amount)),
        }
    }

    /// Last known balance.
    pub fn balance(&self) -> Balance {
        self.cached.read().map(|b| *b).unwrap_or_default()
    }

    /// Re-reads the balance from the backend.
    ///
    /// Best effort: any failure is logged and the cached value is returned.
    pub async fn refresh(&self) -> Balance {
        let user_id = match self.user_id().await {
            Ok(id) => id,
            Err(_) => return self.balance(),
        };

        match self.backend.fetch_balance(&user_id).await {
            Ok(amount) => self.update_cache(amount).await,
            Err(e) => {
                tracing::warn!(error = %e, "balance refresh failed, keeping cached value");
                self.balance()
            }
        }
    }

    /// Spends `amount` through the backend.
    ///
    /// Nothing local changes unless the backend confirms the deduction. The
    /// returned receipt is the only way to unlock paid functionality.
    pub async fn debit(&self, amount: Decimal) -> Result<DebitReceipt> {
        if amount <= Decimal::ZERO {
            return Err(ArcanaError::validation("Debit amount must be positive"));
        }
        let user_id = self.user_id().await?;

        let cached = self.balance();
        if !cached.covers(amount) {
            return Err(ArcanaError::InsufficientFunds {
                required: amount,
                available: cached.amount,
            });
        }

        let new_amount = self.backend.deduct_balance(&user_id, amount).await?;
        let balance = self.update_cache(new_amount).await;
        tracing::info!(%amount, balance = %balance.amount, "balance debited");
        Ok(DebitReceipt::new(amount, balance))
    }

    /// Records a recharge confirmed by a payment provider.
    ///
    /// The provider has already credited the backend; this appends the local
    /// recharge log and re-reads the authoritative balance.
    pub async fn credit(&self, confirmation: &PaymentConfirmation) -> Result<Balance> {
        if confirmation.status != PaymentStatus::Completed {
            return Err(ArcanaError::backend(format!(
                "Payment not completed ({:?})",
                confirmation.status
            )));
        }
        if confirmation.amount <= Decimal::ZERO {
            return Err(ArcanaError::validation("Recharge amount must be positive"));
        }

        let entry = RechargeEntry {
            amount: confirmation.amount,
            method: Some(confirmation.method.to_string()),
            created_at: Some(Utc::now()),
        };
        if let Err(e) = self.append_local_history(entry).await {
            tracing::warn!(error = %e, "failed to record recharge locally");
        }

        let balance = self.refresh().await;
        tracing::info!(amount = %confirmation.amount, method = %confirmation.method, balance = %balance.amount, "recharge credited");
        Ok(balance)
    }

    /// Recharge history from the backend, or the local log when unreachable.
    pub async fn history(&self) -> Result<Vec<RechargeEntry>> {
        let user_id = self.user_id().await?;
        match self.backend.recharge_history(&user_id).await {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(error = %e, "remote recharge history unavailable, using local log");
                self.local_history().await
            }
        }
    }

    pub async fn local_history(&self) -> Result<Vec<RechargeEntry>> {
        Ok(self
            .store
            .get_json::<Vec<RechargeEntry>>(keys::WALLET_HISTORY)
            .await?
            .unwrap_or_default())
    }

    /// Forgets the cached balance (logout).
    pub fn clear_cache(&self) {
        if let Ok(mut cached) = self.cached.write() {
            *cached = Balance::default();
        }
    }

    /// Replaces the cache with a value the backend reported elsewhere (login).
    pub async fn seed(&self, amount: Decimal) -> Balance {
        self.update_cache(amount).await
    }

    async fn append_local_history(&self, entry: RechargeEntry) -> Result<()> {
        let mut entries = self.local_history().await?;
        entries.push(entry);
        self.store.set_json(keys::WALLET_HISTORY, &entries).await
    }

    async fn update_cache(&self, amount: Decimal) -> Balance {
        let balance = Balance::new(amount);
        if let Ok(mut cached) = self.cached.write() {
            *cached = balance;
        }
        if let Err(e) = self
            .store
            .set(keys::WALLET_BALANCE, amount.to_string())
            .await
        {
            tracing::warn!(error = %e, "failed to mirror balance");
        }
        balance
    }

    async fn user_id(&self) -> Result<String> {
        self.store
            .get(keys::USER_ID)
            .await?
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ArcanaError::validation("Please log in first"))
    }
}
