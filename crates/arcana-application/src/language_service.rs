//! App language with change notification.

use std::sync::Arc;

use arcana_core::error::Result;
use arcana_core::language::Language;
use arcana_core::storage::{KeyValueStore, KeyValueStoreExt, keys};
use tokio::sync::watch;

/// Holds the app language and publishes every change.
///
/// Cloning yields another handle on the same channel.
#[derive(Clone)]
pub struct LanguageService {
    store: Arc<dyn KeyValueStore>,
    sender: Arc<watch::Sender<Language>>,
}

impl LanguageService {
    /// Loads the persisted language, falling back to the `LANG` locale.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let initial = match store.get_parsed::<Language>(keys::APP_LANGUAGE).await {
            Ok(Some(lang)) => lang,
            Ok(None) => Language::from_env(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable language preference");
                Language::from_env()
            }
        };
        let (sender, _) = watch::channel(initial);
        Self {
            store,
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> Language {
        *self.sender.borrow()
    }

    /// Persists `lang` and notifies subscribers when it differs from the current one.
    pub async fn set(&self, lang: Language) -> Result<()> {
        self.store.set(keys::APP_LANGUAGE, lang.to_string()).await?;
        let changed = self.sender.send_if_modified(|current| {
            if *current == lang {
                false
            } else {
                *current = lang;
                true
            }
        });
        if changed {
            tracing::info!(%lang, "app language changed");
        }
        Ok(())
    }

    /// Receiver that wakes on every language change.
    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.sender.subscribe()
    }
}
