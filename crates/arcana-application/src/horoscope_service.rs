//! Horoscope selection.

use std::sync::Arc;

use arcana_core::error::Result;
use arcana_core::horoscope::{HoroscopeBackend, HoroscopeQuery, Period, ZodiacSign};
use arcana_core::language::{Language, detect_language};
use tokio::sync::Mutex;

use crate::language_service::LanguageService;

/// Horoscope text together with the exact query that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Horoscope {
    pub query: HoroscopeQuery,
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
struct LastSelection {
    sign: ZodiacSign,
    detected: Language,
}

/// Fetches horoscopes for the selected sign and period.
///
/// Switching to another sign asks in the app language. Changing only the
/// period keeps the language detected in that sign's previous text, so the
/// answer does not flip language halfway through a reading.
pub struct HoroscopeService {
    backend: Arc<dyn HoroscopeBackend>,
    language: LanguageService,
    last: Mutex<Option<LastSelection>>,
}

impl HoroscopeService {
    pub fn new(backend: Arc<dyn HoroscopeBackend>, language: LanguageService) -> Self {
        Self {
            backend,
            language,
            last: Mutex::new(None),
        }
    }

    /// Issues exactly one request for `(sign, period, language)`.
    pub async fn select(&self, sign: ZodiacSign, period: Period) -> Result<Horoscope> {
        let mut last = self.last.lock().await;

        let language = match *last {
            Some(previous) if previous.sign == sign => previous.detected,
            _ => self.language.current(),
        };
        let query = HoroscopeQuery {
            sign,
            period,
            language,
        };

        tracing::debug!(%sign, %period, %language, "requesting horoscope");
        let text = self.backend.horoscope(&query).await?;

        *last = Some(LastSelection {
            sign,
            detected: detect_language(&text),
        });
        Ok(Horoscope { query, text })
    }
}
