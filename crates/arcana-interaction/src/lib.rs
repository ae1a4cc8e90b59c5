//! HTTP client of the Arcana backend.
//!
//! [`BackendClient`] wraps one `reqwest::Client` and implements every remote
//! trait of `arcana-core`; each endpoint family lives in its own module.

mod auth_api;
mod bot_api;
mod client;
mod horoscope_api;
mod payment_api;
mod points_api;
mod wallet_api;

pub use client::BackendClient;
