//! Payment intent endpoints of the four providers.

use arcana_core::error::{ArcanaError, Result};
use arcana_core::wallet::{
    PaymentConfirmation, PaymentGateway, PaymentIntent, PaymentMethod, PaymentRedirect,
    PaymentStatus,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value, json};

use crate::client::{BackendClient, decimal_field, error_message};

fn function_name(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::WeChat => "wechat-pay",
        PaymentMethod::Alipay => "alipay-pay",
        PaymentMethod::PayPal => "paypal-pay",
        PaymentMethod::Stripe => "createPaymentIntent",
    }
}

/// Request body; WeChat takes the amount in fen.
fn intent_body(method: PaymentMethod, user_id: &str, amount: Decimal) -> Result<Value> {
    let out_of_range = || ArcanaError::validation("Amount out of range");
    let amount_value = match method {
        PaymentMethod::WeChat => {
            let fen = (amount * Decimal::from(100))
                .round()
                .to_i64()
                .ok_or_else(out_of_range)?;
            Value::from(fen)
        }
        _ => Value::from(amount.to_f64().ok_or_else(out_of_range)?),
    };
    Ok(json!({ "amount": amount_value, "userId": user_id }))
}

fn extract_redirect(method: PaymentMethod, value: &Value) -> Result<PaymentRedirect> {
    let field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let redirect = match method {
        PaymentMethod::WeChat => field("paymentUrl").map(PaymentRedirect::Url),
        PaymentMethod::PayPal => field("approvalUrl").map(PaymentRedirect::Url),
        PaymentMethod::Alipay => field("url").map(|url| {
            if url.starts_with("<form") {
                PaymentRedirect::HtmlForm(url)
            } else {
                PaymentRedirect::Url(url)
            }
        }),
        PaymentMethod::Stripe => field("clientSecret").map(PaymentRedirect::ClientSecret),
    };
    redirect.ok_or_else(|| {
        ArcanaError::backend(
            error_message(value).unwrap_or_else(|| "Payment URL missing".to_string()),
        )
    })
}

fn extract_capture(value: &Value) -> Result<PaymentConfirmation> {
    let status = match value.get("status").and_then(Value::as_str) {
        Some("COMPLETED") => PaymentStatus::Completed,
        Some("PENDING") | Some("APPROVED") => PaymentStatus::Pending,
        Some(_) => PaymentStatus::Failed,
        None => {
            return Err(ArcanaError::backend(
                error_message(value).unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
    };
    Ok(PaymentConfirmation {
        status,
        amount: decimal_field(value, "amount").unwrap_or(Decimal::ZERO),
        method: PaymentMethod::PayPal,
    })
}

#[async_trait]
impl PaymentGateway for BackendClient {
    async fn create_payment_intent(
        &self,
        user_id: &str,
        method: PaymentMethod,
        amount: Decimal,
    ) -> Result<PaymentIntent> {
        let body = intent_body(method, user_id, amount)?;
        let value: Value = self.post_json(function_name(method), &body).await?;
        let redirect = extract_redirect(method, &value)?;
        tracing::debug!(%method, %amount, "payment intent received");
        Ok(PaymentIntent {
            method,
            amount,
            redirect,
        })
    }

    async fn capture_paypal_order(&self, order_id: &str) -> Result<PaymentConfirmation> {
        let value: Value = self
            .get_json(function_name(PaymentMethod::PayPal), &[("orderId", order_id)])
            .await?;
        extract_capture(&value)
    }
}
