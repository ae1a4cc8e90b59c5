//! Domain layer of the Arcana client.
//!
//! Holds the session gate (clock, billing gate, balance ledger, transcript),
//! the domain models exchanged with the remote backend, and the traits that
//! the infrastructure and interaction crates implement.

pub mod auth;
pub mod billing;
pub mod bot;
pub mod config;
pub mod error;
pub mod horoscope;
pub mod language;
pub mod points;
pub mod session;
pub mod storage;
pub mod tarot;
pub mod wallet;

// Re-export common error type
pub use error::ArcanaError;
