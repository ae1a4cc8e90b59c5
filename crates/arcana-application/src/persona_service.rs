//! Bot personality: stored name and style, paid changes.

use std::sync::Arc;

use arcana_core::bot::{BotPersonality, system_prompt};
use arcana_core::error::Result;
use arcana_core::language::Language;
use arcana_core::storage::{KeyValueStore, KeyValueStoreExt, keys};
use arcana_core::wallet::{BalanceLedger, DebitReceipt};
use rust_decimal::Decimal;

/// Outcome of [`PersonaService::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaSaved {
    pub personality: BotPersonality,
    /// Present when the change was paid for.
    pub charged: Option<DebitReceipt>,
}

pub struct PersonaService {
    store: Arc<dyn KeyValueStore>,
    ledger: Arc<BalanceLedger>,
    change_price: Decimal,
}

impl PersonaService {
    pub fn new(store: Arc<dyn KeyValueStore>, ledger: Arc<BalanceLedger>, change_price: Decimal) -> Self {
        Self {
            store,
            ledger,
            change_price,
        }
    }

    pub fn change_price(&self) -> Decimal {
        self.change_price
    }

    pub async fn current(&self) -> Result<Option<BotPersonality>> {
        self.store.get_json(keys::TAROT_BOT).await
    }

    /// Saves a personality.
    ///
    /// The first setup is free. Every later change is debited through the
    /// ledger first and nothing is saved if the debit fails. Saving the
    /// personality already in place is a no-op.
    ///
    /// Once a debit has gone through the call succeeds: a failed local write
    /// is logged and the receipt is still returned.
    pub async fn save(&self, name: &str, style: &str) -> Result<PersonaSaved> {
        let personality = BotPersonality::new(name, style)?;

        let charged = match self.current().await? {
            Some(existing) if existing == personality => {
                return Ok(PersonaSaved {
                    personality,
                    charged: None,
                });
            }
            Some(_) => Some(self.ledger.debit(self.change_price).await?),
            None => None,
        };

        if let Err(e) = self.store.set_json(keys::TAROT_BOT, &personality).await {
            if charged.is_none() {
                return Err(e);
            }
            tracing::warn!(error = %e, name = %personality.name, "paid bot personality not stored locally");
        }
        tracing::info!(name = %personality.name, paid = charged.is_some(), "bot personality saved");
        Ok(PersonaSaved {
            personality,
            charged,
        })
    }

    /// System prompt for a question in `lang`.
    ///
    /// An unreadable stored personality falls back to the default prompt.
    pub async fn system_prompt(&self, lang: Language) -> Result<String> {
        let personality = match self.current().await {
            Ok(personality) => personality,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable bot personality");
                None
            }
        };
        system_prompt(personality.as_ref(), lang)
    }
}
