use async_trait::async_trait;

use super::model::{AuthSession, Credentials, LoginId, ResetTicket, SignupRequest};
use crate::error::Result;

/// Remote account lifecycle endpoints.
///
/// Endpoints answering `{success: false, message}` are reported as
/// `ArcanaError::Backend(message)`.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession>;

    /// Registers an account. Returns the backend's confirmation message.
    async fn signup(&self, request: &SignupRequest) -> Result<String>;

    /// Sends a verification code to an email or phone.
    async fn send_code(&self, login: &LoginId) -> Result<String>;

    async fn verify_code(&self, login: &LoginId, code: &str) -> Result<String>;

    /// Starts a password reset and returns the ticket to confirm it with.
    async fn request_reset(&self, login: &LoginId) -> Result<ResetTicket>;

    /// Completes a reset with the code the user received.
    async fn set_new_password(&self, login: &LoginId, code: &str, new_password: &str)
    -> Result<String>;
}
