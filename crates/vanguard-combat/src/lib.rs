//! # Vanguard Combat
//!
//! Real-time melee combat core for Vanguard.
//!
//! This crate resolves combat frame by frame: what the controlled actor is
//! doing (idle/attacking/dodging/countering), which hostile is targeted, how
//! combo state escalates or decays, and how hits become damage with
//! critical-hit variance. The policy driving those decisions is pluggable:
//! - Free-flow: automatic targeting and chaining, continuous fluid action
//! - Paired-animation: scripted, timing-sensitive prompt windows
//! - Automated: fully autonomous, no player input
//!
//! Everything is single-threaded and frame-synchronous: drive the
//! [`controller::CombatDirector`] with `tick(dt)` from your game loop, feed
//! it requests, and drain its event bus for feedback.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actor;
pub mod automated;
pub mod combo;
pub mod config;
pub mod controller;
pub mod events;
pub mod free_flow;
pub mod health;
pub mod mode;
pub mod paired;
pub mod preferences;
pub mod targeting;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actor::*;
    pub use crate::automated::*;
    pub use crate::combo::*;
    pub use crate::config::*;
    pub use crate::controller::*;
    pub use crate::events::*;
    pub use crate::free_flow::*;
    pub use crate::health::*;
    pub use crate::mode::*;
    pub use crate::paired::*;
    pub use crate::preferences::*;
    pub use crate::targeting::*;
}

pub use prelude::*;
