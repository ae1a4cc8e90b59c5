use async_trait::async_trait;
use rust_decimal::Decimal;

use super::model::{PaymentConfirmation, PaymentIntent, PaymentMethod, RechargeEntry};
use crate::error::Result;

/// Remote authority for the user's balance.
#[async_trait]
pub trait WalletBackend: Send + Sync {
    /// Current balance of `user_id`.
    async fn fetch_balance(&self, user_id: &str) -> Result<Decimal>;

    /// Deducts `amount` and returns the new balance.
    ///
    /// A refusal (for example insufficient funds) is reported as
    /// `ArcanaError::Backend` carrying the backend's message.
    async fn deduct_balance(&self, user_id: &str, amount: Decimal) -> Result<Decimal>;

    /// Completed recharges of `user_id`, as recorded by the backend.
    async fn recharge_history(&self, user_id: &str) -> Result<Vec<RechargeEntry>>;
}

/// Creation of payment intents with the external providers.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_intent(
        &self,
        user_id: &str,
        method: PaymentMethod,
        amount: Decimal,
    ) -> Result<PaymentIntent>;

    /// Captures an approved PayPal order and reports its outcome.
    async fn capture_paypal_order(&self, order_id: &str) -> Result<PaymentConfirmation>;
}
