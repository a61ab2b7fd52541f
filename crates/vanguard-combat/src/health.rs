//! Health contract for damageable entities.
//!
//! The roster seam: anything that can take damage and report its health may
//! populate the hostile roster, via [`Damageable`] plus the positional
//! [`CombatTarget`] extension. The crate ships [`Hostile`] as the standard
//! implementation.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use vanguard_common::CombatantId;

/// Minimal contract any damageable entity exposes.
pub trait Damageable {
    /// Current health.
    fn current_health(&self) -> f32;

    /// Maximum health.
    fn max_health(&self) -> f32;

    /// Applies damage, clamping health at zero.
    fn take_damage(&mut self, amount: f32);

    /// Whether the entity is still alive.
    fn is_alive(&self) -> bool {
        self.current_health() > 0.0
    }

    /// Health as a fraction of maximum (0.0 to 1.0).
    fn health_percent(&self) -> f32 {
        if self.max_health() <= 0.0 {
            0.0
        } else {
            (self.current_health() / self.max_health()).clamp(0.0, 1.0)
        }
    }
}

/// A damageable entity that can be targeted in combat.
pub trait CombatTarget: Damageable {
    /// Stable identifier of this target.
    fn id(&self) -> CombatantId;

    /// Planar world position.
    fn position(&self) -> Vec2;
}

/// Plain current/max health pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthPool {
    current: f32,
    max: f32,
}

impl HealthPool {
    /// Creates a full pool with the given maximum.
    #[must_use]
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Restores health, capped at the maximum.
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }
}

impl Damageable for HealthPool {
    fn current_health(&self) -> f32 {
        self.current
    }

    fn max_health(&self) -> f32 {
        self.max
    }

    fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).max(0.0);
    }
}

/// A hostile roster entry: identity, health, and planar position.
///
/// Created by an external spawner before combat starts; removed from the
/// roster the frame its health reaches zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hostile {
    id: CombatantId,
    health: HealthPool,
    position: Vec2,
}

impl Hostile {
    /// Creates a hostile with full health at the given position.
    #[must_use]
    pub fn new(max_health: f32, position: Vec2) -> Self {
        Self {
            id: CombatantId::new(),
            health: HealthPool::new(max_health),
            position,
        }
    }

    /// Moves the hostile to a new position.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }
}

impl Damageable for Hostile {
    fn current_health(&self) -> f32 {
        self.health.current_health()
    }

    fn max_health(&self) -> f32 {
        self.health.max_health()
    }

    fn take_damage(&mut self, amount: f32) {
        self.health.take_damage(amount);
    }
}

impl CombatTarget for Hostile {
    fn id(&self) -> CombatantId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }
}
