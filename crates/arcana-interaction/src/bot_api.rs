//! Tarot bot endpoint.

use arcana_core::bot::{BotRequest, BotResponse, TarotBot};
use arcana_core::error::{ArcanaError, Result};
use arcana_core::language::Language;
use async_trait::async_trait;
use serde::Serialize;

use crate::client::BackendClient;

/// Wire body; older deployments read `prompt`, newer ones `question`.
#[derive(Serialize)]
struct BotWireRequest<'a> {
    question: &'a str,
    prompt: &'a str,
    system: &'a str,
    lang: Language,
}

impl<'a> From<&'a BotRequest> for BotWireRequest<'a> {
    fn from(request: &'a BotRequest) -> Self {
        Self {
            question: &request.question,
            prompt: &request.question,
            system: &request.system,
            lang: request.lang,
        }
    }
}

#[async_trait]
impl TarotBot for BackendClient {
    async fn ask(&self, request: &BotRequest) -> Result<String> {
        let response: BotResponse = self
            .post_json("tarot-bot", &BotWireRequest::from(request))
            .await?;
        response
            .into_text()
            .ok_or_else(|| ArcanaError::backend("The tarot bot returned an empty reply"))
    }
}
