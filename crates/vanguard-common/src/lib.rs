//! # Vanguard Common
//!
//! Common types, utilities, and shared abstractions for Vanguard.
//!
//! This crate provides foundational types used across all Vanguard subsystems:
//! - ID types (`CombatantId`)
//! - Planar math helpers over `glam`
//! - Timed-action and easing utilities for frame-tick scheduling
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod math;
pub mod timing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::math::*;
    pub use crate::timing::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_combatant_id_generation() {
        let id1 = CombatantId::new();
        let id2 = CombatantId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_move_interp_reaches_destination() {
        let mut interp = MoveInterp::new(
            Vec2::ZERO,
            Vec2::new(4.0, 0.0),
            Easing::EaseOut,
            2.0, // units per second -> 2 second duration
        );

        assert!(!interp.advance(1.0));
        assert!(interp.advance(1.0));
        assert_eq!(interp.position(), Vec2::new(4.0, 0.0));
    }
}
