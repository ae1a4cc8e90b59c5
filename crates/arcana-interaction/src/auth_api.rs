//! Account lifecycle endpoints.

use arcana_core::auth::{AuthBackend, AuthSession, AuthUser, Credentials, LoginId, ResetTicket, SignupRequest};
use arcana_core::error::{ArcanaError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::client::{BackendClient, decimal_field, extract_ack};

/// `{"email": ..}` or `{"phone": ..}` plus any extra fields.
fn login_body(login: &LoginId, extra: &[(&str, &str)]) -> Value {
    let mut body = Map::new();
    body.insert(login.field().to_string(), Value::from(login.value()));
    for (key, value) in extra {
        body.insert((*key).to_string(), Value::from(*value));
    }
    Value::Object(body)
}

fn extract_session(value: Value) -> Result<AuthSession> {
    let token = value
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ArcanaError::backend("Login response has no token"))?
        .to_string();
    let user_value = value
        .get("user")
        .cloned()
        .ok_or_else(|| ArcanaError::backend("Login response has no user"))?;
    let balance = decimal_field(&user_value, "balance").unwrap_or(Decimal::ZERO);
    let user: AuthUser = serde_json::from_value(user_value)?;
    Ok(AuthSession {
        token,
        user,
        balance,
    })
}

fn extract_reset_ticket(login: &LoginId, value: &Value) -> Result<ResetTicket> {
    extract_ack(value, "Failed to send reset code")?;
    let token = value
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ArcanaError::backend("Failed to send reset code"))?;
    Ok(ResetTicket {
        login: login.clone(),
        token: token.to_string(),
    })
}

#[async_trait]
impl AuthBackend for BackendClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession> {
        let body = login_body(&credentials.login, &[("password", credentials.password.as_str())]);
        let value: Value = self.post_json("login", &body).await?;
        extract_session(value)
    }

    async fn signup(&self, request: &SignupRequest) -> Result<String> {
        let value: Value = self.post_json("signup", request).await?;
        extract_ack(&value, "Signup failed")
    }

    async fn send_code(&self, login: &LoginId) -> Result<String> {
        let value: Value = self.post_json("send-code", &login_body(login, &[])).await?;
        extract_ack(&value, "Failed to send code")
    }

    async fn verify_code(&self, login: &LoginId, code: &str) -> Result<String> {
        let body = login_body(login, &[("code", code)]);
        let value: Value = self.post_json("verify-code", &body).await?;
        extract_ack(&value, "Invalid code")
    }

    async fn request_reset(&self, login: &LoginId) -> Result<ResetTicket> {
        let value: Value = self.post_json("requestReset", &login_body(login, &[])).await?;
        extract_reset_ticket(login, &value)
    }

    async fn set_new_password(
        &self,
        login: &LoginId,
        code: &str,
        new_password: &str,
    ) -> Result<String> {
        let body = login_body(login, &[("token", code), ("newPassword", new_password)]);
        let value: Value = self.post_json("setNewPassword", &body).await?;
        extract_ack(&value, "Password reset failed")
    }
}
