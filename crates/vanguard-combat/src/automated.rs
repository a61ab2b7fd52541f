//! Automated combat mode.
//!
//! Resolves actions autonomously on a fixed cadence: no player input is
//! consumed. Attacks reuse the shared attack driver (lunge, combo-step
//! scaling, critical rolls); every Nth action is substituted with a counter.

use tracing::debug;
use vanguard_common::timing::TimedAction;

use crate::mode::{
    AttackDriver, CombatMode, CounterDriver, ModeCommand, ModeContext, ModeHandler,
};

/// Autonomous timer-driven policy.
#[derive(Debug, Default)]
pub struct AutomatedMode {
    attack: AttackDriver,
    counter: CounterDriver,
    cadence: Option<TimedAction>,
    actions: u32,
}

impl AutomatedMode {
    /// Creates an idle automated handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of autonomous actions taken this engagement.
    #[must_use]
    pub fn actions_taken(&self) -> u32 {
        self.actions
    }

    fn cancel_all(&mut self) {
        self.attack.cancel();
        self.counter.cancel();
        self.cadence = None;
    }
}

impl ModeHandler for AutomatedMode {
    fn mode(&self) -> CombatMode {
        CombatMode::Automated
    }

    fn activate(&mut self) {}

    fn deactivate(&mut self) {
        self.cancel_all();
    }

    fn engagement_ended(&mut self, _victory: bool) {
        self.cancel_all();
        self.actions = 0;
    }

    fn tick(&mut self, dt: f32, ctx: &mut ModeContext<'_>, out: &mut Vec<ModeCommand>) {
        self.attack.tick(dt, ctx, out);
        self.counter.tick(dt);

        // The cadence only runs between actions; actions never overlap.
        if self.is_busy() {
            return;
        }

        let cadence = self
            .cadence
            .get_or_insert_with(|| TimedAction::new(ctx.config.automated_interval));
        if !cadence.advance(dt) {
            return;
        }
        cadence.restart();

        if ctx.target.is_none() {
            return;
        }

        self.actions += 1;
        let every = ctx.config.automated_counter_every;
        if every > 0 && self.actions % every == 0 {
            self.counter.begin(ctx, out);
        } else {
            self.attack.begin(ctx, out);
        }
    }

    fn on_attack_input(&mut self, _ctx: &mut ModeContext<'_>, _out: &mut Vec<ModeCommand>) {
        debug!("attack input ignored: automated mode is autonomous");
    }

    fn on_dodge_input(&mut self, _ctx: &mut ModeContext<'_>, _out: &mut Vec<ModeCommand>) {
        debug!("dodge input ignored: automated mode is autonomous");
    }

    fn on_counter_input(&mut self, _ctx: &mut ModeContext<'_>, _out: &mut Vec<ModeCommand>) {
        debug!("counter input ignored: automated mode is autonomous");
    }

    fn is_busy(&self) -> bool {
        self.attack.in_flight() || self.counter.in_flight()
    }
}
