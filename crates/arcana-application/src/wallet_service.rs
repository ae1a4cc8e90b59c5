//! Recharge flow around the balance ledger.

use std::sync::Arc;

use arcana_core::error::{ArcanaError, Result};
use arcana_core::storage::{KeyValueStore, KeyValueStoreExt, keys};
use arcana_core::wallet::{
    Balance, BalanceLedger, PaymentConfirmation, PaymentGateway, PaymentIntent, PaymentMethod,
    RechargeEntry,
};
use rust_decimal::Decimal;

use crate::auth_service::require_user_id;

/// Smallest amount a recharge may be started with.
pub const MIN_RECHARGE: Decimal = Decimal::ONE;

/// Starts provider payments and books their confirmations.
///
/// Creating a payment intent never changes the balance; only a confirmed
/// payment passed to [`WalletService::confirm_recharge`] does, and even then
/// the new figure is re-read from the backend.
pub struct WalletService {
    ledger: Arc<BalanceLedger>,
    gateway: Arc<dyn PaymentGateway>,
    store: Arc<dyn KeyValueStore>,
}

impl WalletService {
    pub fn new(
        ledger: Arc<BalanceLedger>,
        gateway: Arc<dyn PaymentGateway>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            ledger,
            gateway,
            store,
        }
    }

    /// Re-reads the balance from the backend (best effort).
    pub async fn balance(&self) -> Balance {
        self.ledger.refresh().await
    }

    /// Creates a payment with `method` for `amount` RMB.
    ///
    /// The returned intent tells the front end where to send the user.
    pub async fn start_recharge(&self, method: PaymentMethod, amount: Decimal) -> Result<PaymentIntent> {
        if amount < MIN_RECHARGE {
            return Err(ArcanaError::validation(format!(
                "Please enter an amount of at least {MIN_RECHARGE} {}",
                Balance::CURRENCY
            )));
        }
        let user_id = require_user_id(self.store.as_ref()).await?;

        let intent = self
            .gateway
            .create_payment_intent(&user_id, method, amount)
            .await?;
        if let Err(e) = self
            .store
            .set(keys::LAST_ORDER_AMOUNT, amount.to_string())
            .await
        {
            tracing::warn!(error = %e, "failed to remember pending order amount");
        }
        tracing::info!(%method, %amount, "payment intent created");
        Ok(intent)
    }

    /// Amount of the most recently started recharge.
    pub async fn pending_amount(&self) -> Result<Option<Decimal>> {
        self.store.get_parsed(keys::LAST_ORDER_AMOUNT).await
    }

    /// Books a provider confirmation.
    pub async fn confirm_recharge(&self, confirmation: &PaymentConfirmation) -> Result<Balance> {
        let balance = self.ledger.credit(confirmation).await?;
        if let Err(e) = self.store.remove(keys::LAST_ORDER_AMOUNT).await {
            tracing::warn!(error = %e, "failed to clear pending order amount");
        }
        Ok(balance)
    }

    /// Captures an approved PayPal order and books it.
    pub async fn capture_paypal(&self, order_id: &str) -> Result<Balance> {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return Err(ArcanaError::validation("Missing PayPal order id"));
        }
        let confirmation = self.gateway.capture_paypal_order(order_id).await?;
        self.confirm_recharge(&confirmation).await
    }

    pub async fn recharge_history(&self) -> Result<Vec<RechargeEntry>> {
        self.ledger.history().await
    }
}
