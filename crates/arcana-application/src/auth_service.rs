//! Account lifecycle and the locally persisted login.

use std::sync::Arc;

use arcana_core::auth::{
    AuthBackend, AuthUser, Credentials, LoginId, ProfileUpdate, ResetTicket, SignupRequest,
};
use arcana_core::error::{ArcanaError, Result};
use arcana_core::storage::{KeyValueStore, KeyValueStoreExt, keys};
use arcana_core::wallet::BalanceLedger;

/// Coordinates the auth backend with the persisted login keys.
///
/// # Responsibilities
///
/// - Validating input before any request is made
/// - Persisting token, profile and balance on login, clearing them on logout
/// - Keeping the stored profile in sync with local edits
pub struct AuthService {
    backend: Arc<dyn AuthBackend>,
    store: Arc<dyn KeyValueStore>,
    ledger: Arc<BalanceLedger>,
}

impl AuthService {
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        store: Arc<dyn KeyValueStore>,
        ledger: Arc<BalanceLedger>,
    ) -> Self {
        Self {
            backend,
            store,
            ledger,
        }
    }

    /// Logs in with an email address or phone number.
    pub async fn login(&self, login: &str, password: &str) -> Result<AuthUser> {
        let credentials = Credentials::new(login, password)?;
        let session = self.backend.login(&credentials).await?;

        self.store.set(keys::AUTH_TOKEN, session.token.clone()).await?;
        self.store.set(keys::USER_ID, session.user.id.clone()).await?;
        self.store.set(keys::USER_NAME, session.user.name.clone()).await?;
        match &session.user.email {
            Some(email) => self.store.set(keys::USER_EMAIL, email.clone()).await?,
            None => self.store.remove(keys::USER_EMAIL).await?,
        }
        self.store.set_json(keys::USER_PROFILE, &session.user).await?;
        self.store.set(keys::FIRST_LOGIN, "true".to_string()).await?;
        self.ledger.seed(session.balance).await;

        tracing::info!(user_id = %session.user.id, "logged in");
        Ok(session.user)
    }

    /// Creates an account. Returns the backend's confirmation message.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<String> {
        let request = SignupRequest::new(name, email, password)?;
        self.backend.signup(&request).await
    }

    pub async fn send_code(&self, login: &str) -> Result<String> {
        let login = LoginId::parse(login)?;
        self.backend.send_code(&login).await
    }

    pub async fn verify_code(&self, login: &str, code: &str) -> Result<String> {
        let login = LoginId::parse(login)?;
        if code.trim().is_empty() {
            return Err(ArcanaError::validation("Please enter the verification code."));
        }
        self.backend.verify_code(&login, code.trim()).await
    }

    /// Starts a password reset; the backend sends the code out of band.
    pub async fn request_reset(&self, login: &str) -> Result<ResetTicket> {
        let login = LoginId::parse(login)?;
        self.backend.request_reset(&login).await
    }

    pub async fn set_new_password(
        &self,
        ticket: &ResetTicket,
        code: &str,
        new_password: &str,
    ) -> Result<String> {
        ResetTicket::validate_new_password(code, new_password)?;
        self.backend
            .set_new_password(&ticket.login, code.trim(), new_password)
            .await
    }

    /// Forgets the login and the cached balance.
    pub async fn logout(&self) -> Result<()> {
        for key in keys::AUTH_KEYS {
            self.store.remove(key).await?;
        }
        self.ledger.clear_cache();
        tracing::info!("logged out");
        Ok(())
    }

    pub async fn is_logged_in(&self) -> Result<bool> {
        Ok(self
            .store
            .get(keys::AUTH_TOKEN)
            .await?
            .is_some_and(|token| !token.is_empty()))
    }

    /// Stored profile of the logged-in user, `None` when logged out.
    pub async fn current_user(&self) -> Result<Option<AuthUser>> {
        if !self.is_logged_in().await? {
            return Ok(None);
        }
        self.store.get_json(keys::USER_PROFILE).await
    }

    /// Applies a local profile edit and persists it.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<AuthUser> {
        let mut user = self
            .current_user()
            .await?
            .ok_or_else(|| ArcanaError::validation("Please log in first"))?;
        user.apply(update);
        self.store.set_json(keys::USER_PROFILE, &user).await?;
        if let Some(name) = &update.name {
            self.store.set(keys::USER_NAME, name.clone()).await?;
        }
        Ok(user)
    }

    /// Consumes the first-login flag. True only once after each login.
    pub async fn take_first_login(&self) -> Result<bool> {
        let first = self.store.get_flag(keys::FIRST_LOGIN).await?;
        if first {
            self.store.set(keys::FIRST_LOGIN, "false".to_string()).await?;
        }
        Ok(first)
    }
}

/// Id of the logged-in user.
pub(crate) async fn require_user_id(store: &dyn KeyValueStore) -> Result<String> {
    store
        .get(keys::USER_ID)
        .await?
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ArcanaError::validation("Please log in first"))
}
