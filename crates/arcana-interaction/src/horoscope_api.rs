//! Horoscope endpoint.

use arcana_core::error::{ArcanaError, Result};
use arcana_core::horoscope::{HoroscopeBackend, HoroscopeQuery};
use async_trait::async_trait;
use serde::Deserialize;

use crate::client::BackendClient;

#[derive(Deserialize)]
struct HoroscopeReply {
    #[serde(default)]
    horoscope: Option<String>,
}

#[async_trait]
impl HoroscopeBackend for BackendClient {
    async fn horoscope(&self, query: &HoroscopeQuery) -> Result<String> {
        let reply: HoroscopeReply = self.post_json("horoscope", query).await?;
        reply
            .horoscope
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ArcanaError::backend("Unable to fetch horoscope. Try again later."))
    }
}
