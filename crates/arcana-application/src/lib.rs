//! Application layer for Arcana.
//!
//! This crate provides the use cases that coordinate the domain layer with
//! local storage and the remote backend: the billed chat session, account
//! handling, wallet recharges, horoscopes, check-ins and chat history.

pub mod auth_service;
pub mod chat_history_service;
pub mod chat_session;
pub mod context;
pub mod horoscope_service;
pub mod language_service;
pub mod persona_service;
pub mod points_service;
pub mod wallet_service;

pub use auth_service::AuthService;
pub use chat_history_service::ChatHistoryService;
pub use chat_session::{ChatDeps, ChatSession, SessionEvent, SessionStatus};
pub use context::{AppContext, Backends, BootstrapOptions};
pub use horoscope_service::{Horoscope, HoroscopeService};
pub use language_service::LanguageService;
pub use persona_service::{PersonaSaved, PersonaService};
pub use points_service::PointsService;
pub use wallet_service::{MIN_RECHARGE, WalletService};
