//! Elapsed-time counter of a chat session.
//!
//! `SessionClock` owns the elapsed seconds of the current billed interval and
//! mirrors them to storage on every tick so that a killed process resumes close
//! to where it left off. The periodic scheduling itself lives with the caller
//! (see the application crate's ticker); this type only decides what one tick
//! means.

use std::sync::Arc;

use crate::storage::{KeyValueStore, keys};

/// Result of a single [`SessionClock::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The clock is stopped or already expired; nothing changed.
    Idle,
    /// One second was counted and budget remains.
    Advanced { elapsed: u64, remaining: u64 },
    /// This tick consumed the last second of the budget.
    Expired { elapsed: u64 },
}

/// How [`SessionClock::reset`] rewinds the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockReset {
    /// Give back `seconds` of elapsed time (floored at zero).
    Extend { seconds: u64 },
    /// Start over from zero, used for a brand-new free session.
    Fresh,
}

pub struct SessionClock {
    elapsed: u64,
    budget: u64,
    running: bool,
    expired: bool,
    store: Arc<dyn KeyValueStore>,
}

impl SessionClock {
    /// Creates a stopped clock starting at `elapsed` seconds.
    ///
    /// A clock created with `elapsed >= budget` is already expired.
    pub fn new(budget: u64, elapsed: u64, store: Arc<dyn KeyValueStore>) -> Self {
        let budget = budget.max(1);
        Self {
            elapsed,
            budget,
            running: false,
            expired: elapsed >= budget,
            store,
        }
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn remaining(&self) -> u64 {
        self.budget.saturating_sub(self.elapsed)
    }

    /// True while budget remains.
    pub fn is_active(&self) -> bool {
        !self.expired
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begins counting. Calling it while running, or after expiry, has no effect.
    ///
    /// Returns true when this call actually started the clock.
    pub fn start(&mut self) -> bool {
        if self.running || self.expired {
            return false;
        }
        self.running = true;
        tracing::debug!(elapsed = self.elapsed, budget = self.budget, "session clock started");
        true
    }

    /// Halts counting. Safe to call when not running.
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!(elapsed = self.elapsed, "session clock stopped");
        }
        self.running = false;
    }

    /// Counts one second.
    ///
    /// The new value is persisted on every tick; a failed write is logged and
    /// the in-memory counter stays authoritative. Expiry is reported exactly
    /// once, after which the clock stops.
    pub async fn tick(&mut self) -> TickOutcome {
        if !self.running || self.expired {
            return TickOutcome::Idle;
        }

        self.elapsed += 1;
        self.persist().await;

        if self.elapsed >= self.budget {
            self.running = false;
            self.expired = true;
            tracing::info!(elapsed = self.elapsed, budget = self.budget, "session budget exhausted");
            TickOutcome::Expired {
                elapsed: self.elapsed,
            }
        } else {
            TickOutcome::Advanced {
                elapsed: self.elapsed,
                remaining: self.remaining(),
            }
        }
    }

    /// Rewinds the counter and resumes counting.
    pub async fn reset(&mut self, reset: ClockReset) {
        self.elapsed = match reset {
            ClockReset::Extend { seconds } => self.elapsed.saturating_sub(seconds),
            ClockReset::Fresh => 0,
        };
        self.expired = self.elapsed >= self.budget;
        self.persist().await;
        self.running = false;
        self.start();
        tracing::info!(elapsed = self.elapsed, ?reset, "session clock reset");
    }

    async fn persist(&self) {
        if let Err(e) = self
            .store
            .set(keys::SESSION_ELAPSED_SECONDS, self.elapsed.to_string())
            .await
        {
            tracing::warn!(elapsed = self.elapsed, error = %e, "failed to persist elapsed seconds");
        }
    }
}
