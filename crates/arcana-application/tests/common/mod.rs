//! Shared fixtures: one scripted backend implementing every remote concern.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use arcana_application::{AppContext, Backends};
use arcana_core::auth::{AuthBackend, AuthSession, AuthUser, Credentials, LoginId, ResetTicket, SignupRequest};
use arcana_core::bot::{BotRequest, TarotBot};
use arcana_core::config::AppConfig;
use arcana_core::error::{ArcanaError, Result};
use arcana_core::horoscope::{HoroscopeBackend, HoroscopeQuery};
use arcana_core::points::{CheckInRecord, CheckInStatus, PointsBackend};
use arcana_core::storage::{KeyValueStore, keys};
use arcana_core::wallet::{
    PaymentConfirmation, PaymentGateway, PaymentIntent, PaymentMethod, PaymentRedirect,
    PaymentStatus, RechargeEntry, WalletBackend,
};
use arcana_infrastructure::MemoryKeyValueStore;
use async_trait::async_trait;
use rust_decimal::Decimal;

pub const USER_ID: &str = "u_42";
pub const PASSWORD: &str = "secret1";

pub struct ScriptedBackend {
    pub balance: Mutex<Decimal>,
    /// When set, every deduction is refused with this message.
    pub refuse_debits: Mutex<Option<String>>,
    pub deduct_calls: Mutex<usize>,
    pub bot_reply: Mutex<Option<String>>,
    pub bot_requests: Mutex<Vec<BotRequest>>,
    pub horoscope_reply: Mutex<String>,
    pub horoscope_queries: Mutex<Vec<HoroscopeQuery>>,
    pub points: Mutex<i64>,
    pub checked_in: Mutex<bool>,
    pub login_calls: Mutex<usize>,
    pub paypal_amount: Mutex<Decimal>,
    pub intents: Mutex<Vec<(String, PaymentMethod, Decimal)>>,
}

impl ScriptedBackend {
    pub fn with_balance(amount: i64) -> Self {
        Self {
            balance: Mutex::new(Decimal::from(amount)),
            refuse_debits: Mutex::new(None),
            deduct_calls: Mutex::new(0),
            bot_reply: Mutex::new(Some("The stars are kind tonight.".to_string())),
            bot_requests: Mutex::new(Vec::new()),
            horoscope_reply: Mutex::new("A bright week ahead.".to_string()),
            horoscope_queries: Mutex::new(Vec::new()),
            points: Mutex::new(100),
            checked_in: Mutex::new(false),
            login_calls: Mutex::new(0),
            paypal_amount: Mutex::new(Decimal::from(20)),
            intents: Mutex::new(Vec::new()),
        }
    }

    pub fn balance(&self) -> Decimal {
        *self.balance.lock().unwrap()
    }

    pub fn backends(self: &Arc<Self>) -> Backends {
        Backends {
            auth: self.clone(),
            bot: self.clone(),
            wallet: self.clone(),
            payments: self.clone(),
            points: self.clone(),
            horoscope: self.clone(),
        }
    }
}

#[async_trait]
impl AuthBackend for ScriptedBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession> {
        *self.login_calls.lock().unwrap() += 1;
        if credentials.password != PASSWORD {
            return Err(ArcanaError::backend("Invalid credentials"));
        }
        Ok(AuthSession {
            token: "tok_abc".to_string(),
            user: AuthUser {
                id: USER_ID.to_string(),
                name: "Mira".to_string(),
                email: Some("mira@example.com".to_string()),
                points: *self.points.lock().unwrap(),
                ..Default::default()
            },
            balance: self.balance(),
        })
    }

    async fn signup(&self, _request: &SignupRequest) -> Result<String> {
        Ok("Account created".to_string())
    }

    async fn send_code(&self, _login: &LoginId) -> Result<String> {
        Ok("Code sent".to_string())
    }

    async fn verify_code(&self, _login: &LoginId, code: &str) -> Result<String> {
        if code == "123456" {
            Ok("Verified".to_string())
        } else {
            Err(ArcanaError::backend("Invalid code"))
        }
    }

    async fn request_reset(&self, login: &LoginId) -> Result<ResetTicket> {
        Ok(ResetTicket {
            login: login.clone(),
            token: "reset_1".to_string(),
        })
    }

    async fn set_new_password(&self, _login: &LoginId, _code: &str, _new_password: &str) -> Result<String> {
        Ok("Password updated".to_string())
    }
}

#[async_trait]
impl TarotBot for ScriptedBackend {
    async fn ask(&self, request: &BotRequest) -> Result<String> {
        self.bot_requests.lock().unwrap().push(request.clone());
        self.bot_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ArcanaError::network(Some(502), "Bad gateway"))
    }
}

#[async_trait]
impl WalletBackend for ScriptedBackend {
    async fn fetch_balance(&self, _user_id: &str) -> Result<Decimal> {
        Ok(self.balance())
    }

    async fn deduct_balance(&self, _user_id: &str, amount: Decimal) -> Result<Decimal> {
        *self.deduct_calls.lock().unwrap() += 1;
        if let Some(reason) = self.refuse_debits.lock().unwrap().clone() {
            return Err(ArcanaError::backend(reason));
        }
        let mut balance = self.balance.lock().unwrap();
        if *balance < amount {
            return Err(ArcanaError::backend("Insufficient balance"));
        }
        *balance -= amount;
        Ok(*balance)
    }

    async fn recharge_history(&self, _user_id: &str) -> Result<Vec<RechargeEntry>> {
        Err(ArcanaError::network(None, "offline"))
    }
}

#[async_trait]
impl PaymentGateway for ScriptedBackend {
    async fn create_payment_intent(
        &self,
        user_id: &str,
        method: PaymentMethod,
        amount: Decimal,
    ) -> Result<PaymentIntent> {
        self.intents
            .lock()
            .unwrap()
            .push((user_id.to_string(), method, amount));
        Ok(PaymentIntent {
            method,
            amount,
            redirect: PaymentRedirect::Url("https://pay.example.com/o/1".to_string()),
        })
    }

    async fn capture_paypal_order(&self, _order_id: &str) -> Result<PaymentConfirmation> {
        let amount = *self.paypal_amount.lock().unwrap();
        // The provider credits the backend before confirming.
        *self.balance.lock().unwrap() += amount;
        Ok(PaymentConfirmation {
            status: PaymentStatus::Completed,
            amount,
            method: PaymentMethod::PayPal,
        })
    }
}

#[async_trait]
impl PointsBackend for ScriptedBackend {
    async fn points(&self, _user_id: &str) -> Result<i64> {
        Ok(*self.points.lock().unwrap())
    }

    async fn check_in_status(&self, _user_id: &str) -> Result<CheckInStatus> {
        Ok(CheckInStatus {
            already_checked_in: *self.checked_in.lock().unwrap(),
            streak: 3,
            history: Vec::new(),
            today_reward: Some(10),
            new_points: None,
        })
    }

    async fn check_in(&self, _user_id: &str) -> Result<CheckInStatus> {
        let mut checked_in = self.checked_in.lock().unwrap();
        if *checked_in {
            return Ok(CheckInStatus {
                already_checked_in: true,
                streak: 3,
                history: Vec::new(),
                today_reward: None,
                new_points: None,
            });
        }
        *checked_in = true;
        let mut points = self.points.lock().unwrap();
        *points += 10;
        Ok(CheckInStatus {
            already_checked_in: false,
            streak: 3,
            history: vec![CheckInRecord {
                date: "2026-10-16".to_string(),
                coins: 10,
            }],
            today_reward: Some(10),
            new_points: Some(*points),
        })
    }

    async fn update_points(&self, _user_id: &str, points: i64) -> Result<()> {
        *self.points.lock().unwrap() = points;
        Ok(())
    }
}

#[async_trait]
impl HoroscopeBackend for ScriptedBackend {
    async fn horoscope(&self, query: &HoroscopeQuery) -> Result<String> {
        self.horoscope_queries.lock().unwrap().push(*query);
        Ok(self.horoscope_reply.lock().unwrap().clone())
    }
}

/// Context over an in-memory store and a scripted backend.
pub async fn context(backend: &Arc<ScriptedBackend>) -> (AppContext, Arc<MemoryKeyValueStore>) {
    let store = Arc::new(MemoryKeyValueStore::new());
    let ctx = AppContext::assemble(AppConfig::default(), store.clone(), backend.backends()).await;
    (ctx, store)
}

/// Marks the store as belonging to a logged-in user.
pub async fn log_in(store: &MemoryKeyValueStore) {
    store.set(keys::AUTH_TOKEN, "tok_abc".to_string()).await.unwrap();
    store.set(keys::USER_ID, USER_ID.to_string()).await.unwrap();
}

/// Marks the free session as already used and persists `elapsed`.
pub async fn used_free_session(store: &MemoryKeyValueStore, elapsed: u64) {
    store
        .set(keys::HAS_USED_FREE_SESSION, "true".to_string())
        .await
        .unwrap();
    store
        .set(keys::SESSION_ELAPSED_SECONDS, elapsed.to_string())
        .await
        .unwrap();
}

/// In-memory store whose writes to one key can be made to fail.
#[derive(Default)]
pub struct FailingStore {
    pub inner: MemoryKeyValueStore,
    pub failing_key: Mutex<Option<&'static str>>,
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        if *self.failing_key.lock().unwrap() == Some(key) {
            return Err(ArcanaError::io("disk full"));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key).await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        self.inner.keys_with_prefix(prefix).await
    }
}

/// Context over a [`FailingStore`].
pub async fn failing_context(backend: &Arc<ScriptedBackend>) -> (AppContext, Arc<FailingStore>) {
    let store = Arc::new(FailingStore::default());
    let ctx = AppContext::assemble(AppConfig::default(), store.clone(), backend.backends()).await;
    (ctx, store)
}
