//! Timed-action and easing utilities.
//!
//! All waiting in the combat core is cooperative: a [`TimedAction`] tracks
//! elapsed time against a target duration and is advanced once per frame.
//! Cancellation is dropping (or resetting) the state object; nothing runs in
//! the background.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized interpolation progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Easing {
    /// Constant-rate interpolation.
    #[default]
    Linear,
    /// Quadratic deceleration.
    EaseOut,
    /// Quadratic acceleration then deceleration.
    EaseInOut,
}

impl Easing {
    /// Applies the curve to a normalized progress value.
    ///
    /// Input outside `[0, 1]` is clamped.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            },
        }
    }
}

/// A time-boxed, cancellable action advanced once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedAction {
    elapsed: f32,
    duration: f32,
}

impl TimedAction {
    /// Creates a new timed action with the given duration in seconds.
    ///
    /// Durations are floored at a small epsilon so zero-length actions still
    /// complete on their first tick rather than dividing by zero.
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration.max(1e-4),
        }
    }

    /// Advances by `dt` seconds, returning `true` once elapsed >= duration.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.is_complete()
    }

    /// Whether the action has run its full duration.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Normalized progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Seconds remaining until completion.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    /// Restarts the action from zero.
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Eased positional interpolation driven by a [`TimedAction`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveInterp {
    from: Vec2,
    to: Vec2,
    easing: Easing,
    timer: TimedAction,
}

impl MoveInterp {
    /// Creates an interpolation from `from` to `to` at `speed` units/second.
    #[must_use]
    pub fn new(from: Vec2, to: Vec2, easing: Easing, speed: f32) -> Self {
        let duration = from.distance(to) / speed.max(1e-4);
        Self {
            from,
            to,
            easing,
            timer: TimedAction::new(duration),
        }
    }

    /// Advances by `dt` seconds, returning `true` on completion.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.timer.advance(dt)
    }

    /// Current interpolated position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.from.lerp(self.to, self.easing.apply(self.timer.progress()))
    }

    /// Destination point.
    #[must_use]
    pub fn destination(&self) -> Vec2 {
        self.to
    }

    /// Whether the interpolation has finished.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.timer.is_complete()
    }
}
