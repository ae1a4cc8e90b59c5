//! Decides whether chat input is accepted.
//!
//! ```text
//! Free ──expiry──▶ Expired ──paid extension──▶ Active ──expiry──▶ Expired ...
//! ```

use std::sync::Arc;

use super::policy::BillingPolicy;
use crate::error::{ArcanaError, Result};
use crate::session::{ClockReset, SessionClock, TickOutcome};
use crate::storage::{KeyValueStore, KeyValueStoreExt, keys};
use crate::wallet::DebitReceipt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// One-time unpaid session of a new installation.
    Free,
    /// Within budget.
    Active,
    /// Budget used up; input blocked until a paid extension.
    Expired,
}

/// What a tick meant for the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTransition {
    Unchanged,
    Counted { elapsed: u64, remaining: u64 },
    /// Input was just blocked.
    Expired,
}

pub struct BillingGate {
    state: GateState,
    clock: SessionClock,
    policy: BillingPolicy,
}

impl BillingGate {
    /// Decides the initial state of a chat session.
    ///
    /// The first session ever is free and starts from zero, whatever elapsed
    /// value a previous install left behind. Later sessions resume the
    /// persisted elapsed seconds and start expired when the budget is gone.
    pub async fn open(store: Arc<dyn KeyValueStore>, policy: BillingPolicy) -> Result<Self> {
        let free_used = store.get_flag(keys::HAS_USED_FREE_SESSION).await?;

        let (state, elapsed) = if !free_used {
            if let Err(e) = store
                .set(keys::HAS_USED_FREE_SESSION, "true".to_string())
                .await
            {
                tracing::warn!(error = %e, "failed to record free session use");
            }
            (GateState::Free, 0)
        } else {
            let elapsed = match store.get_parsed::<u64>(keys::SESSION_ELAPSED_SECONDS).await {
                Ok(value) => value.unwrap_or(0),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring unreadable elapsed seconds");
                    0
                }
            };
            let state = if elapsed >= policy.budget_secs {
                GateState::Expired
            } else {
                GateState::Active
            };
            (state, elapsed)
        };

        let mut clock = SessionClock::new(policy.budget_secs, elapsed, store);
        if state == GateState::Free {
            clock.reset(ClockReset::Fresh).await;
            clock.stop();
        }

        tracing::info!(?state, elapsed, budget = policy.budget_secs, "billing gate opened");
        Ok(Self {
            state,
            clock,
            policy,
        })
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn policy(&self) -> &BillingPolicy {
        &self.policy
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn accepts_input(&self) -> bool {
        self.state != GateState::Expired
    }

    pub fn is_expired(&self) -> bool {
        self.state == GateState::Expired
    }

    /// `Err(InputBlocked)` while the session is expired.
    pub fn ensure_accepts_input(&self) -> Result<()> {
        if self.accepts_input() {
            Ok(())
        } else {
            Err(ArcanaError::InputBlocked)
        }
    }

    /// Starts the clock. Returns true when it was not already running.
    pub fn start(&mut self) -> bool {
        self.clock.start()
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    /// Advances the clock by one second and applies the resulting transition.
    pub async fn on_tick(&mut self) -> GateTransition {
        match self.clock.tick().await {
            TickOutcome::Idle => GateTransition::Unchanged,
            TickOutcome::Advanced { elapsed, remaining } => {
                GateTransition::Counted { elapsed, remaining }
            }
            TickOutcome::Expired { .. } => {
                self.state = GateState::Expired;
                GateTransition::Expired
            }
        }
    }

    /// Reopens an expired session after a confirmed debit.
    ///
    /// Gives back `extension_secs` of elapsed time and resumes the clock.
    pub async fn extend(&mut self, receipt: &DebitReceipt) -> Result<()> {
        if self.state != GateState::Expired {
            return Err(ArcanaError::validation("Session is still active"));
        }
        if receipt.amount() < self.policy.extension_price {
            return Err(ArcanaError::validation(format!(
                "An extension costs {} RMB",
                self.policy.extension_price
            )));
        }

        self.clock
            .reset(ClockReset::Extend {
                seconds: self.policy.extension_secs,
            })
            .await;
        if self.clock.is_active() {
            self.state = GateState::Active;
        }
        tracing::info!(elapsed = self.clock.elapsed(), "session extended");
        Ok(())
    }
}
