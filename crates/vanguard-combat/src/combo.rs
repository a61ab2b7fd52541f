//! Combo tracking.
//!
//! Pure session state: a counter that rewards chaining successful offensive
//! actions, decaying on timeout or incoming damage. Every mutator reports
//! whether the value actually changed so callers can emit change
//! notifications edge-triggered rather than once per frame.

use serde::{Deserialize, Serialize};

/// Consecutive-action counter attached to a combat session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComboTracker {
    count: u32,
    last_action_at: f64,
    best: u32,
}

impl ComboTracker {
    /// Creates a fresh tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current combo count.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Highest combo reached since the tracker was created.
    #[must_use]
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Session-clock timestamp of the last advancing action.
    #[must_use]
    pub fn last_action_at(&self) -> f64 {
        self.last_action_at
    }

    /// Advances the combo by `by` (1 for a landed hit, 2 for a counter) and
    /// stamps the action time. Always a change.
    pub fn advance(&mut self, by: u32, now: f64) -> u32 {
        self.count = self.count.saturating_add(by);
        self.last_action_at = now;
        if self.count > self.best {
            self.best = self.count;
        }
        self.count
    }

    /// Resets to zero, returning `true` if the count actually changed.
    pub fn reset(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count = 0;
        true
    }

    /// Applies the timeout rule: while a combo is running, it decays to zero
    /// once `now - last_action_at` exceeds `timeout`.
    ///
    /// Returns `true` only on the tick the decay happens.
    pub fn check_timeout(&mut self, now: f64, timeout: f32) -> bool {
        if self.count > 0 && now - self.last_action_at > f64::from(timeout) {
            self.count = 0;
            return true;
        }
        false
    }
}
