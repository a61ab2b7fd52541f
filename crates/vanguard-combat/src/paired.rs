//! Paired-animation combat mode.
//!
//! Scripted, timing-sensitive prompts drive the same guard and timing design
//! as free-flow: each prompt opens after its lead-in and accepts exactly its
//! own action kind while the window is open. A matching input resolves a
//! choreographed strike, counter or dodge; anything else is dropped. The
//! script loops until the engagement ends.

use serde::{Deserialize, Serialize};
use tracing::debug;
use vanguard_common::timing::TimedAction;

use crate::mode::{
    CombatMode, CounterDriver, DodgeDriver, ModeCommand, ModeContext, ModeHandler,
};

/// Action kind a scripted prompt accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromptKind {
    /// Choreographed strike.
    Attack,
    /// Scripted evade.
    Dodge,
    /// Riposte window.
    Counter,
}

/// One entry of the paired-animation script.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairedPrompt {
    /// Accepted action kind.
    pub kind: PromptKind,
    /// Seconds before the window opens.
    pub lead_in: f32,
    /// Seconds the window stays open.
    pub window: f32,
}

impl PairedPrompt {
    /// Creates a prompt.
    #[must_use]
    pub const fn new(kind: PromptKind, lead_in: f32, window: f32) -> Self {
        Self {
            kind,
            lead_in,
            window,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PromptPhase {
    LeadIn(TimedAction),
    Open(TimedAction),
}

/// Scripted prompt-window policy.
#[derive(Debug)]
pub struct PairedMode {
    script: Vec<PairedPrompt>,
    index: usize,
    phase: Option<PromptPhase>,
    dodge: DodgeDriver,
    counter: CounterDriver,
    step: u8,
}

impl Default for PairedMode {
    fn default() -> Self {
        Self::new()
    }
}

impl PairedMode {
    /// Creates the mode with the default looping script.
    #[must_use]
    pub fn new() -> Self {
        Self::with_script(vec![
            PairedPrompt::new(PromptKind::Attack, 0.35, 0.6),
            PairedPrompt::new(PromptKind::Attack, 0.25, 0.6),
            PairedPrompt::new(PromptKind::Counter, 0.4, 0.5),
            PairedPrompt::new(PromptKind::Dodge, 0.3, 0.55),
        ])
    }

    /// Creates the mode with a custom script. An empty script accepts no
    /// input at all.
    #[must_use]
    pub fn with_script(script: Vec<PairedPrompt>) -> Self {
        Self {
            script,
            index: 0,
            phase: None,
            dodge: DodgeDriver::new(),
            counter: CounterDriver::new(),
            step: 0,
        }
    }

    /// The prompt currently in lead-in or open, with its open flag.
    #[must_use]
    pub fn current_prompt(&self) -> Option<(PairedPrompt, bool)> {
        let prompt = self.script.get(self.index).copied()?;
        match self.phase {
            Some(PromptPhase::Open(_)) => Some((prompt, true)),
            Some(PromptPhase::LeadIn(_)) => Some((prompt, false)),
            None => None,
        }
    }

    fn start_script(&mut self) {
        self.index = 0;
        self.phase = self
            .script
            .first()
            .map(|p| PromptPhase::LeadIn(TimedAction::new(p.lead_in)));
    }

    fn advance_prompt(&mut self) {
        if self.script.is_empty() {
            self.phase = None;
            return;
        }
        self.index = (self.index + 1) % self.script.len();
        self.phase = Some(PromptPhase::LeadIn(TimedAction::new(
            self.script[self.index].lead_in,
        )));
    }

    /// Whether the given kind would be accepted right now.
    fn window_accepts(&self, kind: PromptKind) -> bool {
        matches!(self.phase, Some(PromptPhase::Open(_)))
            && self.script.get(self.index).is_some_and(|p| p.kind == kind)
    }

    fn cancel_all(&mut self) {
        self.dodge.cancel();
        self.counter.cancel();
        self.phase = None;
    }
}

impl ModeHandler for PairedMode {
    fn mode(&self) -> CombatMode {
        CombatMode::PairedAnimation
    }

    fn activate(&mut self) {
        self.start_script();
    }

    fn deactivate(&mut self) {
        self.cancel_all();
    }

    fn engagement_started(&mut self, _ctx: &mut ModeContext<'_>) {
        self.start_script();
    }

    fn engagement_ended(&mut self, _victory: bool) {
        self.cancel_all();
    }

    fn tick(&mut self, dt: f32, _ctx: &mut ModeContext<'_>, out: &mut Vec<ModeCommand>) {
        self.dodge.tick(dt, out);
        self.counter.tick(dt);

        // The script holds while a resolution is still playing out.
        if self.is_busy() {
            return;
        }

        match self.phase.take() {
            Some(PromptPhase::LeadIn(mut timer)) => {
                if timer.advance(dt) {
                    let window = self.script[self.index].window;
                    self.phase = Some(PromptPhase::Open(TimedAction::new(window)));
                } else {
                    self.phase = Some(PromptPhase::LeadIn(timer));
                }
            },
            Some(PromptPhase::Open(mut timer)) => {
                if timer.advance(dt) {
                    // Missed window.
                    self.advance_prompt();
                } else {
                    self.phase = Some(PromptPhase::Open(timer));
                }
            },
            None => {},
        }
    }

    fn on_attack_input(&mut self, ctx: &mut ModeContext<'_>, out: &mut Vec<ModeCommand>) {
        if self.is_busy() || !self.window_accepts(PromptKind::Attack) {
            debug!("attack input outside scripted window dropped");
            return;
        }
        let Some(target) = ctx.target else {
            return;
        };
        self.step = self.step % 3 + 1;
        out.push(ModeCommand::Strike {
            target: target.id,
            damage: ctx.config.step_damage(self.step),
            critical: ctx.roll_critical(),
        });
        self.advance_prompt();
    }

    fn on_dodge_input(&mut self, ctx: &mut ModeContext<'_>, _out: &mut Vec<ModeCommand>) {
        if self.is_busy() || !self.window_accepts(PromptKind::Dodge) {
            debug!("dodge input outside scripted window dropped");
            return;
        }
        self.dodge.begin(ctx);
        self.advance_prompt();
    }

    fn on_counter_input(&mut self, ctx: &mut ModeContext<'_>, out: &mut Vec<ModeCommand>) {
        if self.is_busy() || !self.window_accepts(PromptKind::Counter) {
            debug!("counter input outside scripted window dropped");
            return;
        }
        self.counter.begin(ctx, out);
        self.advance_prompt();
    }

    fn is_busy(&self) -> bool {
        self.dodge.in_flight() || self.counter.in_flight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorTransform;
    use crate::config::CombatConfig;
    use crate::mode::test_support::ctx;
    use crate::mode::TargetView;
    use glam::Vec2;
    use vanguard_common::CombatantId;

    fn target() -> TargetView {
        TargetView {
            id: CombatantId::new(),
            position: Vec2::new(1.0, 0.0),
        }
    }

    fn attack_only_mode() -> PairedMode {
        let mut mode = PairedMode::with_script(vec![PairedPrompt::new(PromptKind::Attack, 0.3, 0.5)]);
        mode.activate();
        mode
    }

    #[test]
    fn test_input_before_window_opens_is_dropped() {
        let config = CombatConfig::default();
        let mut rng = fastrand::Rng::with_seed(5);
        let mut out = Vec::new();
        let mut mode = attack_only_mode();

        let mut c = ctx(&config, &mut rng, ActorTransform::default(), Some(target()));
        mode.tick(0.1, &mut c, &mut out);
        mode.on_attack_input(&mut c, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn test_input_inside_window_resolves_strike() {
        let config = CombatConfig::default().with_critical_chance(0.0);
        let mut rng = fastrand::Rng::with_seed(5);
        let mut out = Vec::new();
        let mut mode = attack_only_mode();

        let mut c = ctx(&config, &mut rng, ActorTransform::default(), Some(target()));
        mode.tick(0.35, &mut c, &mut out); // past lead-in, window open
        assert!(matches!(mode.current_prompt(), Some((_, true))));

        mode.on_attack_input(&mut c, &mut out);
        assert!(out.iter().any(|c| matches!(c, ModeCommand::Strike { .. })));
    }

    #[test]
    fn test_wrong_kind_inside_window_is_dropped() {
        let config = CombatConfig::default();
        let mut rng = fastrand::Rng::with_seed(5);
        let mut out = Vec::new();
        let mut mode = attack_only_mode();

        let mut c = ctx(&config, &mut rng, ActorTransform::default(), Some(target()));
        mode.tick(0.35, &mut c, &mut out);
        mode.on_counter_input(&mut c, &mut out);

        assert!(out.is_empty());
        assert!(!mode.is_busy());
    }

    #[test]
    fn test_missed_window_advances_script() {
        let config = CombatConfig::default();
        let mut rng = fastrand::Rng::with_seed(5);
        let mut out = Vec::new();
        let mut mode = PairedMode::with_script(vec![
            PairedPrompt::new(PromptKind::Attack, 0.1, 0.2),
            PairedPrompt::new(PromptKind::Counter, 0.1, 0.2),
        ]);
        mode.activate();

        let mut c = ctx(&config, &mut rng, ActorTransform::default(), Some(target()));
        mode.tick(0.15, &mut c, &mut out); // window open
        mode.tick(0.25, &mut c, &mut out); // window expired -> next prompt lead-in

        let (prompt, open) = mode.current_prompt().expect("script loops");
        assert_eq!(prompt.kind, PromptKind::Counter);
        assert!(!open);
    }

    #[test]
    fn test_script_loops_after_last_prompt() {
        let config = CombatConfig::default();
        let mut rng = fastrand::Rng::with_seed(5);
        let mut out = Vec::new();
        let mut mode = attack_only_mode();

        let mut c = ctx(&config, &mut rng, ActorTransform::default(), Some(target()));
        // Miss the only prompt twice; it must come back around.
        for _ in 0..2 {
            mode.tick(0.35, &mut c, &mut out);
            mode.tick(0.55, &mut c, &mut out);
        }
        assert!(mode.current_prompt().is_some());
    }

    #[test]
    fn test_deactivate_closes_window() {
        let config = CombatConfig::default();
        let mut rng = fastrand::Rng::with_seed(5);
        let mut out = Vec::new();
        let mut mode = attack_only_mode();

        let mut c = ctx(&config, &mut rng, ActorTransform::default(), Some(target()));
        mode.tick(0.35, &mut c, &mut out);
        mode.deactivate();

        assert!(mode.current_prompt().is_none());
        mode.on_attack_input(&mut c, &mut out);
        assert!(out.is_empty());
    }
}
