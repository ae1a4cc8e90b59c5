//! Composition root.
//!
//! Every service is constructed once here and handed to the front end; there
//! are no process-wide globals.

use std::sync::Arc;

use anyhow::{Context, Result};
use arcana_core::auth::AuthBackend;
use arcana_core::billing::BillingPolicy;
use arcana_core::bot::TarotBot;
use arcana_core::config::AppConfig;
use arcana_core::horoscope::HoroscopeBackend;
use arcana_core::points::PointsBackend;
use arcana_core::session::TranscriptRepository;
use arcana_core::storage::KeyValueStore;
use arcana_core::wallet::{BalanceLedger, PaymentGateway, WalletBackend};
use arcana_infrastructure::{
    ArcanaPaths, ConfigService, FileKeyValueStore, KvTranscriptRepository, MemoryKeyValueStore,
};
use arcana_interaction::BackendClient;

use crate::auth_service::AuthService;
use crate::chat_history_service::ChatHistoryService;
use crate::chat_session::{ChatDeps, ChatSession};
use crate::horoscope_service::HoroscopeService;
use crate::language_service::LanguageService;
use crate::persona_service::PersonaService;
use crate::points_service::PointsService;
use crate::wallet_service::WalletService;

/// Remote collaborators, one per backend concern.
#[derive(Clone)]
pub struct Backends {
    pub auth: Arc<dyn AuthBackend>,
    pub bot: Arc<dyn TarotBot>,
    pub wallet: Arc<dyn WalletBackend>,
    pub payments: Arc<dyn PaymentGateway>,
    pub points: Arc<dyn PointsBackend>,
    pub horoscope: Arc<dyn HoroscopeBackend>,
}

impl Backends {
    /// All concerns served by one HTTP client.
    pub fn from_client(client: Arc<BackendClient>) -> Self {
        Self {
            auth: client.clone(),
            bot: client.clone(),
            wallet: client.clone(),
            payments: client.clone(),
            points: client.clone(),
            horoscope: client,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapOptions {
    /// Keep all local state in memory instead of `store.json`.
    pub ephemeral: bool,
}

pub struct AppContext {
    pub config: AppConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub transcripts: Arc<dyn TranscriptRepository>,
    pub ledger: Arc<BalanceLedger>,
    pub language: LanguageService,
    pub auth: Arc<AuthService>,
    pub persona: Arc<PersonaService>,
    pub horoscope: HoroscopeService,
    pub points: PointsService,
    pub wallet: WalletService,
    pub history: ChatHistoryService,
    bot: Arc<dyn TarotBot>,
    policy: BillingPolicy,
}

impl AppContext {
    /// Loads the configuration file (defaults when missing or invalid).
    pub fn load_config(paths: &ArcanaPaths) -> AppConfig {
        ConfigService::new(paths).get_config()
    }

    /// Opens local state and connects to the backend.
    pub async fn bootstrap(
        paths: &ArcanaPaths,
        config: AppConfig,
        options: BootstrapOptions,
    ) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = if options.ephemeral {
            tracing::info!("using in-memory store");
            Arc::new(MemoryKeyValueStore::new())
        } else {
            let path = paths.store_file();
            Arc::new(
                FileKeyValueStore::open(path.clone())
                    .await
                    .with_context(|| format!("Failed to open local store {}", path.display()))?,
            )
        };

        let client = BackendClient::new(&config.backend).context("Failed to create HTTP client")?;
        tracing::debug!(base_url = %client.base_url(), "backend client ready");

        Ok(Self::assemble(config, store, Backends::from_client(Arc::new(client))).await)
    }

    /// Wires services from explicit parts.
    pub async fn assemble(config: AppConfig, store: Arc<dyn KeyValueStore>, backends: Backends) -> Self {
        let transcripts: Arc<dyn TranscriptRepository> =
            Arc::new(KvTranscriptRepository::new(store.clone()));
        let ledger = Arc::new(BalanceLedger::load(backends.wallet.clone(), store.clone()).await);
        let language = LanguageService::load(store.clone()).await;

        let auth = Arc::new(AuthService::new(
            backends.auth.clone(),
            store.clone(),
            ledger.clone(),
        ));
        let persona = Arc::new(PersonaService::new(
            store.clone(),
            ledger.clone(),
            config.billing.personality_change_price,
        ));
        let horoscope = HoroscopeService::new(backends.horoscope.clone(), language.clone());
        let points = PointsService::new(backends.points.clone(), store.clone(), auth.clone());
        let wallet = WalletService::new(ledger.clone(), backends.payments.clone(), store.clone());
        let history = ChatHistoryService::new(transcripts.clone());
        let policy = BillingPolicy::from(&config.billing);

        Self {
            config,
            store,
            transcripts,
            ledger,
            language,
            auth,
            persona,
            horoscope,
            points,
            wallet,
            history,
            bot: backends.bot,
            policy,
        }
    }

    pub fn policy(&self) -> &BillingPolicy {
        &self.policy
    }

    /// Opens a chat session, resuming `resume` when given.
    pub async fn open_chat(&self, resume: Option<&str>) -> arcana_core::error::Result<ChatSession> {
        let deps = ChatDeps {
            store: self.store.clone(),
            transcripts: self.transcripts.clone(),
            ledger: self.ledger.clone(),
            bot: self.bot.clone(),
            persona: self.persona.clone(),
            language: self.language.clone(),
            policy: self.policy.clone(),
        };
        ChatSession::open(deps, resume).await
    }
}
