//! Target selection and cycling over the hostile roster.
//!
//! Pure functions: they scan the roster slice, skip dead entries, and never
//! mutate anything. Re-targeting policy is chosen by configuration.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use vanguard_common::CombatantId;

use crate::health::CombatTarget;

/// How the active target is chosen when one must be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TargetingPolicy {
    /// Closest living hostile within auto-target range, ties broken by
    /// roster order. Falls back to the first living entry when nothing is
    /// in range, so a non-empty roster always yields a target.
    #[default]
    NearestInRange,
    /// First living roster entry in insertion order.
    FirstAlive,
}

/// Selects a target from the roster under the given policy.
///
/// Returns `None` only when no living hostile exists.
#[must_use]
pub fn select_target<T: CombatTarget>(
    roster: &[T],
    actor_position: Vec2,
    policy: TargetingPolicy,
    auto_target_range: f32,
) -> Option<CombatantId> {
    match policy {
        TargetingPolicy::FirstAlive => first_alive(roster),
        TargetingPolicy::NearestInRange => {
            nearest_in_range(roster, actor_position, auto_target_range).or_else(|| first_alive(roster))
        },
    }
}

/// First living roster entry in insertion order.
#[must_use]
pub fn first_alive<T: CombatTarget>(roster: &[T]) -> Option<CombatantId> {
    roster.iter().find(|h| h.is_alive()).map(CombatTarget::id)
}

/// Closest living hostile within `range`; ties broken by roster order
/// (strict `<` keeps the first found).
#[must_use]
pub fn nearest_in_range<T: CombatTarget>(
    roster: &[T],
    actor_position: Vec2,
    range: f32,
) -> Option<CombatantId> {
    let mut closest: Option<(CombatantId, f32)> = None;

    for hostile in roster {
        if !hostile.is_alive() {
            continue;
        }

        let distance = actor_position.distance(hostile.position());
        if distance > range {
            continue;
        }

        match closest {
            Some((_, best)) if distance >= best => {},
            _ => closest = Some((hostile.id(), distance)),
        }
    }

    closest.map(|(id, _)| id)
}

/// Advances to the next living roster entry after `current` in insertion
/// order, wrapping to the front.
///
/// Returns `None` (meaning: keep the current target) when the roster has one
/// or zero living members.
#[must_use]
pub fn next_target<T: CombatTarget>(
    roster: &[T],
    current: Option<CombatantId>,
) -> Option<CombatantId> {
    let living: Vec<CombatantId> = roster
        .iter()
        .filter(|h| h.is_alive())
        .map(CombatTarget::id)
        .collect();
    if living.len() <= 1 {
        return None;
    }

    let position = current.and_then(|id| living.iter().position(|&l| l == id));
    match position {
        Some(i) => Some(living[(i + 1) % living.len()]),
        None => Some(living[0]),
    }
}
