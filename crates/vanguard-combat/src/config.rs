//! Combat tuning configuration.

use serde::{Deserialize, Serialize};

use crate::targeting::TargetingPolicy;

/// Fraction of attack range the lunge stops short of the target.
pub const LUNGE_STOP_FRACTION: f32 = 0.8;

/// All tunable parameters of the combat core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatConfig {
    /// Seconds without an advancing action before the combo decays.
    pub combo_timeout: f32,
    /// Probability of a critical hit (0.0 to 1.0).
    pub critical_chance: f32,
    /// Damage multiplier applied on a critical hit.
    pub critical_multiplier: f32,
    /// Target selection policy.
    pub targeting: TargetingPolicy,
    /// Maximum distance for nearest-in-range auto targeting.
    pub auto_target_range: f32,
    /// Melee reach; hits beyond this trigger a lunge.
    pub attack_range: f32,
    /// Seconds between attacks, measured from the landed hit.
    pub attack_cooldown: f32,
    /// Flat damage before combo-step scaling.
    pub base_damage: f32,
    /// Damage added per combo step.
    pub damage_scaling: f32,
    /// Lunge travel speed, units per second.
    pub lunge_speed: f32,
    /// Dodge displacement, units.
    pub dodge_distance: f32,
    /// Dodge travel speed, units per second.
    pub dodge_speed: f32,
    /// Fixed duration of a counter action, seconds.
    pub counter_duration: f32,
    /// Raw damage of a counter strike (always critical).
    pub counter_damage: f32,
    /// Automated mode: seconds between autonomous actions.
    pub automated_interval: f32,
    /// Automated mode: every Nth action is a counter (0 disables).
    pub automated_counter_every: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            combo_timeout: 2.0,
            critical_chance: 0.1,
            critical_multiplier: 2.0,
            targeting: TargetingPolicy::NearestInRange,
            auto_target_range: 12.0,
            attack_range: 2.0,
            attack_cooldown: 0.6,
            base_damage: 10.0,
            damage_scaling: 2.0,
            lunge_speed: 14.0,
            dodge_distance: 3.0,
            dodge_speed: 10.0,
            counter_duration: 0.5,
            counter_damage: 25.0,
            automated_interval: 1.2,
            automated_counter_every: 4,
        }
    }
}

impl CombatConfig {
    /// Creates a config with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the combo decay timeout.
    #[must_use]
    pub fn with_combo_timeout(mut self, seconds: f32) -> Self {
        self.combo_timeout = seconds.max(0.0);
        self
    }

    /// Sets the critical hit chance.
    #[must_use]
    pub fn with_critical_chance(mut self, chance: f32) -> Self {
        self.critical_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// Sets the critical damage multiplier.
    #[must_use]
    pub fn with_critical_multiplier(mut self, multiplier: f32) -> Self {
        self.critical_multiplier = multiplier.max(1.0);
        self
    }

    /// Sets the targeting policy.
    #[must_use]
    pub fn with_targeting(mut self, policy: TargetingPolicy) -> Self {
        self.targeting = policy;
        self
    }

    /// Sets melee reach.
    #[must_use]
    pub fn with_attack_range(mut self, range: f32) -> Self {
        self.attack_range = range.max(0.1);
        self
    }

    /// Sets the attack cooldown.
    #[must_use]
    pub fn with_attack_cooldown(mut self, seconds: f32) -> Self {
        self.attack_cooldown = seconds.max(0.0);
        self
    }

    /// Sets base damage and per-step scaling.
    #[must_use]
    pub fn with_damage(mut self, base: f32, scaling: f32) -> Self {
        self.base_damage = base.max(0.0);
        self.damage_scaling = scaling.max(0.0);
        self
    }

    /// Sets the automated-mode cadence.
    #[must_use]
    pub fn with_automated_cadence(mut self, interval: f32, counter_every: u32) -> Self {
        self.automated_interval = interval.max(0.1);
        self.automated_counter_every = counter_every;
        self
    }

    /// Raw damage for the given combo step (1 to 3).
    #[must_use]
    pub fn step_damage(&self, step: u8) -> f32 {
        self.base_damage + f32::from(step) * self.damage_scaling
    }
}
