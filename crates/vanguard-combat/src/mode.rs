//! Mode-strategy contract and shared action machinery.
//!
//! A mode handler is the pluggable policy that turns intent (player input,
//! scripted prompts, autonomous timers) into timed actions under the shared
//! state-machine guards. Handlers are object-safe so external code can
//! install its own policies; the three shipped modes live in
//! [`crate::free_flow`], [`crate::paired`] and [`crate::automated`].
//!
//! Handlers never touch the roster directly. They read a per-call
//! [`ModeContext`] snapshot and push [`ModeCommand`]s for the director to
//! apply, which keeps the roster single-writer.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use vanguard_common::math;
use vanguard_common::timing::{Easing, MoveInterp, TimedAction};
use vanguard_common::CombatantId;

use crate::config::{CombatConfig, LUNGE_STOP_FRACTION};

/// Combat policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CombatMode {
    /// Automatic targeting and chaining; continuous fluid action.
    #[default]
    FreeFlow,
    /// Scripted, timing-sensitive prompt windows.
    PairedAnimation,
    /// Fully autonomous; no player input.
    Automated,
}

impl CombatMode {
    /// All modes, in cycling order.
    pub const ALL: [Self; 3] = [Self::FreeFlow, Self::PairedAnimation, Self::Automated];

    /// The next mode in cycling order, wrapping.
    #[must_use]
    pub fn cycled(self) -> Self {
        match self {
            Self::FreeFlow => Self::PairedAnimation,
            Self::PairedAnimation => Self::Automated,
            Self::Automated => Self::FreeFlow,
        }
    }

    /// Stable name used for persistence.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FreeFlow => "free_flow",
            Self::PairedAnimation => "paired_animation",
            Self::Automated => "automated",
        }
    }

    /// Parses a persisted mode name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Handler-slot index for this mode.
    #[must_use]
    pub(crate) fn slot(self) -> usize {
        match self {
            Self::FreeFlow => 0,
            Self::PairedAnimation => 1,
            Self::Automated => 2,
        }
    }
}

/// An intent to act, consumed immediately by the active handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionRequest {
    /// Strike the current target.
    Attack,
    /// Evade opposite the actor's facing.
    Dodge,
    /// Riposte the current target.
    Counter,
    /// Ability slot activation; routing is implementation-defined.
    Special(u32),
}

/// Snapshot of the current target visible to a handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    /// Target identifier.
    pub id: CombatantId,
    /// Target planar position.
    pub position: Vec2,
}

/// Per-call context handed to mode handlers.
///
/// Everything a policy may read or roll; the roster itself stays with the
/// director.
#[derive(Debug)]
pub struct ModeContext<'a> {
    /// Actor position and facing.
    pub actor: crate::actor::ActorTransform,
    /// Resolved current target, if any living hostile exists.
    pub target: Option<TargetView>,
    /// Number of living hostiles in the roster.
    pub living_hostiles: usize,
    /// Session clock, seconds.
    pub now: f64,
    /// Combat tuning.
    pub config: &'a CombatConfig,
    /// Seeded RNG for critical rolls.
    pub rng: &'a mut fastrand::Rng,
}

impl ModeContext<'_> {
    /// Rolls a critical hit at the configured chance.
    pub fn roll_critical(&mut self) -> bool {
        self.rng.f32() < self.config.critical_chance
    }

    /// Planar distance from the actor to the current target.
    #[must_use]
    pub fn target_distance(&self) -> Option<f32> {
        self.target
            .map(|t| self.actor.position.distance(t.position))
    }
}

/// What a handler asks the director to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeCommand {
    /// Resolve a hit on a hostile (raw damage; the director applies the
    /// critical multiplier and combo credit).
    Strike {
        /// Hostile to strike.
        target: CombatantId,
        /// Raw damage before the critical multiplier.
        damage: f32,
        /// Whether the strike is critical.
        critical: bool,
    },
    /// Resolve an always-critical counter strike (counter combo credit).
    CounterStrike {
        /// Hostile to strike.
        target: CombatantId,
        /// Raw damage before the critical multiplier.
        damage: f32,
    },
    /// Move the actor to an interpolated position.
    MoveActor {
        /// New actor position.
        position: Vec2,
    },
    /// A dodge finished its displacement.
    DodgeComplete,
}

/// The pluggable combat policy contract.
///
/// Exactly one handler is active at a time. `deactivate` MUST cancel any
/// in-flight timed action deterministically: once it returns, no completion
/// from the old policy may fire.
pub trait ModeHandler {
    /// Which mode this handler implements.
    fn mode(&self) -> CombatMode;

    /// Called when this handler becomes the active policy.
    fn activate(&mut self);

    /// Called when this handler stops being the active policy. Cancels any
    /// in-flight timed action.
    fn deactivate(&mut self);

    /// Called when a combat session begins while this handler is active.
    fn engagement_started(&mut self, _ctx: &mut ModeContext<'_>) {}

    /// Called when the combat session ends.
    fn engagement_ended(&mut self, _victory: bool) {}

    /// Per-frame update while active and in combat.
    fn tick(&mut self, dt: f32, ctx: &mut ModeContext<'_>, out: &mut Vec<ModeCommand>);

    /// Attack intent.
    fn on_attack_input(&mut self, ctx: &mut ModeContext<'_>, out: &mut Vec<ModeCommand>);

    /// Dodge intent.
    fn on_dodge_input(&mut self, ctx: &mut ModeContext<'_>, out: &mut Vec<ModeCommand>);

    /// Counter intent.
    fn on_counter_input(&mut self, ctx: &mut ModeContext<'_>, out: &mut Vec<ModeCommand>);

    /// Special-ability intent. Reserved extension point; default no-op.
    fn on_special_input(
        &mut self,
        _index: u32,
        _ctx: &mut ModeContext<'_>,
        _out: &mut Vec<ModeCommand>,
    ) {
    }

    /// Whether a timed action is in flight (drives the actor action lock).
    fn is_busy(&self) -> bool;
}

/// A strike waiting for its lunge to complete.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingStrike {
    target: CombatantId,
    damage: f32,
    critical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AttackPhase {
    /// Closing distance; the strike fires when the interpolation completes.
    Lunging {
        interp: MoveInterp,
        strike: PendingStrike,
    },
    /// Post-hit cooldown window; the attacking flag stays set until it ends.
    Recovering(TimedAction),
}

/// Shared attack execution state machine.
///
/// Owns the cyclic 1-2-3 combo step, the optional lunge, and the post-hit
/// cooldown. Used by the free-flow and automated modes.
#[derive(Debug, Default)]
pub struct AttackDriver {
    step: u8,
    phase: Option<AttackPhase>,
}

impl AttackDriver {
    /// Creates an idle driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an attack (lunge or recovery) is in flight.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.phase.is_some()
    }

    /// Current combo step (1 to 3); 0 before the first attack.
    #[must_use]
    pub fn step(&self) -> u8 {
        self.step
    }

    /// Begins an attack against the context target.
    ///
    /// Rolls the critical, advances the combo step and either strikes
    /// immediately (target in reach) or starts a lunge. Returns `false` when
    /// no target exists; the guard against overlapping actions is the
    /// caller's responsibility.
    pub fn begin(&mut self, ctx: &mut ModeContext<'_>, out: &mut Vec<ModeCommand>) -> bool {
        let Some(target) = ctx.target else {
            return false;
        };

        self.step = self.step % 3 + 1;
        let strike = PendingStrike {
            target: target.id,
            damage: ctx.config.step_damage(self.step),
            critical: ctx.roll_critical(),
        };

        let distance = ctx.actor.position.distance(target.position);
        if distance > ctx.config.attack_range {
            let dir = math::direction_to(ctx.actor.position, target.position);
            let stop = target.position - dir * (ctx.config.attack_range * LUNGE_STOP_FRACTION);
            self.phase = Some(AttackPhase::Lunging {
                interp: MoveInterp::new(ctx.actor.position, stop, Easing::EaseOut, ctx.config.lunge_speed),
                strike,
            });
        } else {
            out.push(ModeCommand::Strike {
                target: strike.target,
                damage: strike.damage,
                critical: strike.critical,
            });
            self.phase = Some(AttackPhase::Recovering(TimedAction::new(
                ctx.config.attack_cooldown,
            )));
        }
        true
    }

    /// Advances the in-flight attack, if any.
    pub fn tick(&mut self, dt: f32, ctx: &ModeContext<'_>, out: &mut Vec<ModeCommand>) {
        match self.phase.take() {
            Some(AttackPhase::Lunging { mut interp, strike }) => {
                let done = interp.advance(dt);
                out.push(ModeCommand::MoveActor {
                    position: interp.position(),
                });
                if done {
                    out.push(ModeCommand::Strike {
                        target: strike.target,
                        damage: strike.damage,
                        critical: strike.critical,
                    });
                    self.phase = Some(AttackPhase::Recovering(TimedAction::new(
                        ctx.config.attack_cooldown,
                    )));
                } else {
                    self.phase = Some(AttackPhase::Lunging { interp, strike });
                }
            },
            Some(AttackPhase::Recovering(mut timer)) => {
                if !timer.advance(dt) {
                    self.phase = Some(AttackPhase::Recovering(timer));
                }
            },
            None => {},
        }
    }

    /// Cancels any in-flight attack; no strike or movement fires afterward.
    pub fn cancel(&mut self) {
        self.phase = None;
    }
}

/// Shared dodge displacement state machine.
#[derive(Debug, Default)]
pub struct DodgeDriver {
    interp: Option<MoveInterp>,
}

impl DodgeDriver {
    /// Creates an idle driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a dodge is in flight.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.interp.is_some()
    }

    /// Begins a dodge opposite the actor's facing.
    pub fn begin(&mut self, ctx: &ModeContext<'_>) {
        let from = ctx.actor.position;
        let to = from - ctx.actor.facing_dir() * ctx.config.dodge_distance;
        self.interp = Some(MoveInterp::new(from, to, Easing::EaseInOut, ctx.config.dodge_speed));
    }

    /// Advances the in-flight dodge, if any.
    pub fn tick(&mut self, dt: f32, out: &mut Vec<ModeCommand>) {
        if let Some(mut interp) = self.interp.take() {
            let done = interp.advance(dt);
            out.push(ModeCommand::MoveActor {
                position: interp.position(),
            });
            if done {
                out.push(ModeCommand::DodgeComplete);
            } else {
                self.interp = Some(interp);
            }
        }
    }

    /// Cancels any in-flight dodge.
    pub fn cancel(&mut self) {
        self.interp = None;
    }
}

/// Shared counter state machine: instant strike, fixed busy window.
#[derive(Debug, Default)]
pub struct CounterDriver {
    timer: Option<TimedAction>,
}

impl CounterDriver {
    /// Creates an idle driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the counter window is in flight.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.timer.is_some()
    }

    /// Begins a counter: resolves the strike immediately if a target exists,
    /// then holds the countering flag for the configured duration.
    pub fn begin(&mut self, ctx: &ModeContext<'_>, out: &mut Vec<ModeCommand>) {
        if let Some(target) = ctx.target {
            out.push(ModeCommand::CounterStrike {
                target: target.id,
                damage: ctx.config.counter_damage,
            });
        }
        self.timer = Some(TimedAction::new(ctx.config.counter_duration));
    }

    /// Advances the counter window, if any.
    pub fn tick(&mut self, dt: f32) {
        if let Some(timer) = &mut self.timer {
            if timer.advance(dt) {
                self.timer = None;
            }
        }
    }

    /// Cancels the counter window.
    pub fn cancel(&mut self) {
        self.timer = None;
    }
}
