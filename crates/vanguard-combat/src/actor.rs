//! Controlled-actor transform.
//!
//! The actor persists across combat sessions and carries no combat-specific
//! transient state; the action lock is derived from the active mode handler.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use vanguard_common::math;

/// Planar position and facing of the controlled actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorTransform {
    /// World position.
    pub position: Vec2,
    /// Facing angle in radians.
    pub facing: f32,
}

impl Default for ActorTransform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            facing: 0.0,
        }
    }
}

impl ActorTransform {
    /// Creates a transform at the given position, facing along +X.
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            facing: 0.0,
        }
    }

    /// Unit vector of the current facing.
    #[must_use]
    pub fn facing_dir(&self) -> Vec2 {
        math::facing_vec(self.facing)
    }

    /// Turns the actor to face a world point. No-op if the point coincides
    /// with the actor's position.
    pub fn look_at(&mut self, point: Vec2) {
        if point != self.position {
            self.facing = math::bearing(self.position, point);
        }
    }
}
