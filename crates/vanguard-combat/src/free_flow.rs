//! Free-flow combat mode.
//!
//! The reference policy: targeting and chaining are largely automatic,
//! favoring continuous fluid action. Attack, dodge and counter are mutually
//! exclusive — a request for any one is dropped while any is in flight, and
//! no action may interrupt another.

use tracing::debug;

use crate::mode::{
    AttackDriver, CombatMode, CounterDriver, DodgeDriver, ModeCommand, ModeContext, ModeHandler,
};

/// Player-driven free-flow policy.
#[derive(Debug, Default)]
pub struct FreeFlowMode {
    attack: AttackDriver,
    dodge: DodgeDriver,
    counter: CounterDriver,
}

impl FreeFlowMode {
    /// Creates an idle free-flow handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an attack (lunge or post-hit cooldown) is in flight.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.attack.in_flight()
    }

    /// Whether a dodge displacement is in flight.
    #[must_use]
    pub fn is_dodging(&self) -> bool {
        self.dodge.in_flight()
    }

    /// Whether a counter window is in flight.
    #[must_use]
    pub fn is_countering(&self) -> bool {
        self.counter.in_flight()
    }

    fn cancel_all(&mut self) {
        self.attack.cancel();
        self.dodge.cancel();
        self.counter.cancel();
    }
}

impl ModeHandler for FreeFlowMode {
    fn mode(&self) -> CombatMode {
        CombatMode::FreeFlow
    }

    fn activate(&mut self) {}

    fn deactivate(&mut self) {
        self.cancel_all();
    }

    fn engagement_ended(&mut self, _victory: bool) {
        self.cancel_all();
    }

    fn tick(&mut self, dt: f32, ctx: &mut ModeContext<'_>, out: &mut Vec<ModeCommand>) {
        self.attack.tick(dt, ctx, out);
        self.dodge.tick(dt, out);
        self.counter.tick(dt);
    }

    fn on_attack_input(&mut self, ctx: &mut ModeContext<'_>, out: &mut Vec<ModeCommand>) {
        if self.is_busy() {
            debug!("attack request dropped: action in flight");
            return;
        }
        self.attack.begin(ctx, out);
    }

    fn on_dodge_input(&mut self, ctx: &mut ModeContext<'_>, _out: &mut Vec<ModeCommand>) {
        if self.is_busy() {
            debug!("dodge request dropped: action in flight");
            return;
        }
        self.dodge.begin(ctx);
    }

    fn on_counter_input(&mut self, ctx: &mut ModeContext<'_>, out: &mut Vec<ModeCommand>) {
        if self.is_busy() {
            debug!("counter request dropped: action in flight");
            return;
        }
        self.counter.begin(ctx, out);
    }

    fn is_busy(&self) -> bool {
        self.attack.in_flight() || self.dodge.in_flight() || self.counter.in_flight()
    }
}
