//! Combat lifecycle state machine and public contract.
//!
//! [`CombatDirector`] owns the session: the hostile roster, the current
//! target, the combo tracker, the actor transform, the event bus, and the
//! per-mode handler slots. It is a plain value — construct one and pass it
//! by reference to whatever needs it; "one active combat session" comes from
//! ownership, not global state.
//!
//! Action requests arriving outside of combat, redundant lifecycle calls and
//! hits on already-dead targets are input races, not errors: all are silent
//! no-ops.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vanguard_common::CombatantId;

use crate::actor::ActorTransform;
use crate::automated::AutomatedMode;
use crate::combo::ComboTracker;
use crate::config::CombatConfig;
use crate::events::{CombatEvent, EventBus};
use crate::free_flow::FreeFlowMode;
use crate::health::{CombatTarget, Damageable};
use crate::mode::{ActionRequest, CombatMode, ModeCommand, ModeContext, ModeHandler, TargetView};
use crate::paired::PairedMode;
use crate::targeting;

/// Lifecycle state of the combat session.
///
/// Only `InCombat` permits action requests. `Engaging` and `Finishing` are
/// transient within lifecycle calls; the terminal `Victory`/`Defeat` states
/// are observable for one frame and decay to `Inactive` on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CombatState {
    /// No session.
    #[default]
    Inactive,
    /// Session created, initial target being assigned.
    Engaging,
    /// Steady state; accepts requests.
    InCombat,
    /// Roster empty or explicit end requested; cleanup running.
    Finishing,
    /// Combat resolved in the actor's favor.
    Victory,
    /// Combat resolved against the actor.
    Defeat,
}

/// Outcome of the most recently concluded combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatOutcome {
    /// All hostiles defeated, or combat ended victorious.
    Victory,
    /// Combat ended in defeat.
    Defeat,
}

/// Default seed for the critical-roll RNG.
const DEFAULT_RNG_SEED: u64 = 12345;

/// Melee combat service: state machine, targeting, combos and hit
/// resolution, with the driving policy delegated to the active mode handler.
pub struct CombatDirector<T: CombatTarget> {
    config: CombatConfig,
    state: CombatState,
    mode: CombatMode,
    handlers: [Option<Box<dyn ModeHandler>>; 3],
    roster: Vec<T>,
    current_target: Option<CombatantId>,
    combo: ComboTracker,
    actor: ActorTransform,
    events: EventBus,
    rng: fastrand::Rng,
    clock: f64,
    last_outcome: Option<CombatOutcome>,
}

impl<T: CombatTarget> Default for CombatDirector<T> {
    fn default() -> Self {
        Self::new(CombatConfig::default())
    }
}

impl<T: CombatTarget> CombatDirector<T> {
    /// Creates a director with the three standard mode handlers installed.
    #[must_use]
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            state: CombatState::Inactive,
            mode: CombatMode::FreeFlow,
            handlers: [
                Some(Box::new(FreeFlowMode::new()) as Box<dyn ModeHandler>),
                Some(Box::new(PairedMode::new()) as Box<dyn ModeHandler>),
                Some(Box::new(AutomatedMode::new()) as Box<dyn ModeHandler>),
            ],
            roster: Vec::new(),
            current_target: None,
            combo: ComboTracker::new(),
            actor: ActorTransform::default(),
            events: EventBus::default(),
            rng: fastrand::Rng::with_seed(DEFAULT_RNG_SEED),
            clock: 0.0,
            last_outcome: None,
        }
    }

    /// Sets the starting combat mode (e.g. from the persisted preference).
    #[must_use]
    pub fn with_mode(mut self, mode: CombatMode) -> Self {
        self.mode = mode;
        self
    }

    /// Seeds the critical-roll RNG.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Places the actor at a starting position.
    #[must_use]
    pub fn with_actor_position(mut self, position: Vec2) -> Self {
        self.actor.position = position;
        self
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Currently selected combat mode.
    #[must_use]
    pub fn current_mode(&self) -> CombatMode {
        self.mode
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn current_combat_state(&self) -> CombatState {
        self.state
    }

    /// Current combo count.
    #[must_use]
    pub fn current_combo(&self) -> u32 {
        self.combo.count()
    }

    /// Highest combo reached.
    #[must_use]
    pub fn best_combo(&self) -> u32 {
        self.combo.best()
    }

    /// Whether a session is in its steady state.
    #[must_use]
    pub fn is_in_combat(&self) -> bool {
        self.state == CombatState::InCombat
    }

    /// Currently targeted hostile, if any.
    #[must_use]
    pub fn current_target(&self) -> Option<CombatantId> {
        self.current_target
    }

    /// Whether the actor is locked in a timed action (attacking, dodging or
    /// countering).
    #[must_use]
    pub fn is_action_locked(&self) -> bool {
        self.handlers[self.mode.slot()]
            .as_ref()
            .is_some_and(|h| h.is_busy())
    }

    /// Outcome of the last concluded combat.
    #[must_use]
    pub fn last_outcome(&self) -> Option<CombatOutcome> {
        self.last_outcome
    }

    /// Actor position.
    #[must_use]
    pub fn actor_position(&self) -> Vec2 {
        self.actor.position
    }

    /// Actor facing, radians.
    #[must_use]
    pub fn actor_facing(&self) -> f32 {
        self.actor.facing
    }

    /// The live hostile roster.
    #[must_use]
    pub fn roster(&self) -> &[T] {
        &self.roster
    }

    /// Looks up a hostile by id.
    #[must_use]
    pub fn hostile(&self, id: CombatantId) -> Option<&T> {
        self.roster.iter().find(|h| h.id() == id)
    }

    /// The feedback event bus.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Combat tuning.
    #[must_use]
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Handler slots
    // ------------------------------------------------------------------

    /// Installs a handler for a mode, replacing any existing one.
    pub fn set_mode_handler(&mut self, mode: CombatMode, handler: Box<dyn ModeHandler>) {
        self.handlers[mode.slot()] = Some(handler);
    }

    /// Removes the handler for a mode. While the slot is empty all requests
    /// for that mode are no-ops.
    pub fn clear_mode_handler(&mut self, mode: CombatMode) -> Option<Box<dyn ModeHandler>> {
        self.handlers[mode.slot()].take()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Starts combat against the given roster.
    ///
    /// No-op unless `Inactive`. An empty roster resolves Victory immediately.
    pub fn start_combat(&mut self, hostiles: Vec<T>) {
        if self.state != CombatState::Inactive {
            debug!(state = ?self.state, "start_combat ignored: session already exists");
            return;
        }

        self.state = CombatState::Engaging;
        self.last_outcome = None;
        self.roster = hostiles;
        self.roster.retain(Damageable::is_alive);

        self.current_target = self.roster.first().map(CombatTarget::id);
        if let Some(view) = self.target_view() {
            self.actor.look_at(view.position);
        }

        self.with_active_handler(|handler, ctx| {
            handler.activate();
            handler.engagement_started(ctx);
        });
        self.events.publish(CombatEvent::CombatStarted {
            hostiles: self.roster.len(),
        });

        if self.roster.is_empty() {
            // No hostiles to fight: never stall in combat.
            self.conclude(CombatOutcome::Victory);
        } else {
            self.state = CombatState::InCombat;
        }
    }

    /// Ends combat explicitly. No-op without an active session.
    pub fn end_combat(&mut self, victory: bool) {
        match self.state {
            CombatState::Inactive | CombatState::Victory | CombatState::Defeat => {
                debug!(state = ?self.state, "end_combat ignored: no active session");
            },
            _ => {
                self.conclude(if victory {
                    CombatOutcome::Victory
                } else {
                    CombatOutcome::Defeat
                });
                self.state = CombatState::Inactive;
            },
        }
    }

    /// Switches the combat mode, in any state.
    ///
    /// With an active session the old handler is deactivated (cancelling any
    /// in-flight timed action) before the new one activates.
    pub fn set_combat_mode(&mut self, mode: CombatMode) {
        if mode == self.mode {
            return;
        }

        let session_active = self.state == CombatState::InCombat;
        if session_active {
            if let Some(handler) = self.handlers[self.mode.slot()].as_mut() {
                handler.deactivate();
            }
        }

        self.mode = mode;

        if session_active {
            if let Some(handler) = self.handlers[self.mode.slot()].as_mut() {
                handler.activate();
            }
        }

        self.events.publish(CombatEvent::ModeChanged { mode });
    }

    /// Advances to the next combat mode in cycling order.
    pub fn cycle_combat_mode(&mut self) {
        self.set_combat_mode(self.mode.cycled());
    }

    /// Per-frame update.
    pub fn tick(&mut self, dt: f32) {
        self.clock += f64::from(dt);

        match self.state {
            CombatState::Victory | CombatState::Defeat => {
                self.state = CombatState::Inactive;
                return;
            },
            CombatState::InCombat => {},
            _ => return,
        }

        self.roster.retain(Damageable::is_alive);

        if self.combo.check_timeout(self.clock, self.config.combo_timeout) {
            self.events.publish(CombatEvent::ComboChanged { combo: 0 });
        }

        // Target resolution happens at tick start, never mid-action.
        self.ensure_target();

        if self.roster.is_empty() {
            self.conclude(CombatOutcome::Victory);
            return;
        }

        let mut out = Vec::new();
        self.with_active_handler(|handler, ctx| handler.tick(dt, ctx, &mut out));
        self.apply_commands(out);
    }

    // ------------------------------------------------------------------
    // Action requests
    // ------------------------------------------------------------------

    /// Requests an attack. Ignored outside of combat.
    pub fn request_attack(&mut self) {
        self.forward_request(ActionRequest::Attack);
    }

    /// Requests a dodge. Ignored outside of combat.
    pub fn request_dodge(&mut self) {
        self.forward_request(ActionRequest::Dodge);
    }

    /// Requests a counter. Ignored outside of combat.
    pub fn request_counter(&mut self) {
        self.forward_request(ActionRequest::Counter);
    }

    /// Requests a special ability. Ignored outside of combat.
    pub fn request_special(&mut self, index: u32) {
        self.forward_request(ActionRequest::Special(index));
    }

    fn forward_request(&mut self, request: ActionRequest) {
        if self.state != CombatState::InCombat {
            debug!(?request, state = ?self.state, "request dropped outside combat");
            return;
        }

        // Invariant: a live target is resolved before any action executes.
        self.ensure_target();

        let mut out = Vec::new();
        self.with_active_handler(|handler, ctx| match request {
            ActionRequest::Attack => handler.on_attack_input(ctx, &mut out),
            ActionRequest::Dodge => handler.on_dodge_input(ctx, &mut out),
            ActionRequest::Counter => handler.on_counter_input(ctx, &mut out),
            ActionRequest::Special(index) => handler.on_special_input(index, ctx, &mut out),
        });
        self.apply_commands(out);
    }

    // ------------------------------------------------------------------
    // Hit and feedback registration
    // ------------------------------------------------------------------

    /// Applies a hit to a hostile: critical multiplier, damage, combo +1,
    /// death removal and re-targeting, feedback events.
    ///
    /// Hits on missing or dead targets are dropped silently.
    pub fn register_hit(&mut self, target: CombatantId, raw_damage: f32, critical: bool) {
        if self.apply_hit_damage(target, raw_damage, critical) {
            let combo = self.combo.advance(1, self.clock);
            self.events.publish(CombatEvent::ComboChanged { combo });
            self.handle_death(target);
        }
    }

    /// Records that the actor was hit: resets the combo and emits feedback.
    ///
    /// Does not mutate actor health; that belongs to an external stats
    /// system.
    pub fn register_damage_received(&mut self, amount: f32) {
        self.events.publish(CombatEvent::HitReceived { amount });
        if self.combo.reset() {
            self.events.publish(CombatEvent::ComboChanged { combo: 0 });
        }
    }

    /// Records a completed dodge.
    pub fn register_dodge(&mut self) {
        self.events.publish(CombatEvent::DodgeRegistered);
    }

    /// Records a performed counter: combo +2 (counters weigh double) and
    /// feedback.
    pub fn register_counter(&mut self) {
        self.events.publish(CombatEvent::CounterRegistered);
        let combo = self.combo.advance(2, self.clock);
        self.events.publish(CombatEvent::ComboChanged { combo });
    }

    /// Rolls a critical hit at the configured chance. Pure draw; callers use
    /// the result immediately.
    pub fn roll_critical(&mut self) -> bool {
        self.rng.f32() < self.config.critical_chance
    }

    // ------------------------------------------------------------------
    // Targeting
    // ------------------------------------------------------------------

    /// Targets a specific hostile. An unknown or dead id is accepted and
    /// yields no target.
    pub fn set_target(&mut self, target: CombatantId) {
        let valid = self
            .roster
            .iter()
            .any(|h| h.id() == target && h.is_alive());
        self.current_target = valid.then_some(target);
        if let Some(view) = self.target_view() {
            self.actor.look_at(view.position);
        }
    }

    /// Clears the current target.
    pub fn clear_target(&mut self) {
        self.current_target = None;
    }

    /// Cycles to the next living hostile in roster order. No-op with one or
    /// zero living hostiles.
    pub fn switch_target(&mut self) {
        if let Some(next) = targeting::next_target(&self.roster, self.current_target) {
            self.current_target = Some(next);
            if let Some(view) = self.target_view() {
                self.actor.look_at(view.position);
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn target_view(&self) -> Option<TargetView> {
        let id = self.current_target?;
        self.roster
            .iter()
            .find(|h| h.id() == id && h.is_alive())
            .map(|h| TargetView {
                id,
                position: h.position(),
            })
    }

    fn ensure_target(&mut self) {
        let valid = self
            .current_target
            .is_some_and(|id| self.roster.iter().any(|h| h.id() == id && h.is_alive()));
        if !valid {
            self.current_target = targeting::select_target(
                &self.roster,
                self.actor.position,
                self.config.targeting,
                self.config.auto_target_range,
            );
            if let Some(view) = self.target_view() {
                self.actor.look_at(view.position);
            }
        }
    }

    fn with_active_handler<F>(&mut self, f: F)
    where
        F: FnOnce(&mut dyn ModeHandler, &mut ModeContext<'_>),
    {
        let slot = self.mode.slot();
        let Some(mut handler) = self.handlers[slot].take() else {
            warn!(mode = ?self.mode, "no handler installed for mode; request is a no-op");
            return;
        };

        let target = self.target_view();
        let living = self.roster.iter().filter(|h| h.is_alive()).count();
        let mut ctx = ModeContext {
            actor: self.actor,
            target,
            living_hostiles: living,
            now: self.clock,
            config: &self.config,
            rng: &mut self.rng,
        };
        f(handler.as_mut(), &mut ctx);

        self.handlers[slot] = Some(handler);
    }

    fn apply_commands(&mut self, commands: Vec<ModeCommand>) {
        for command in commands {
            match command {
                ModeCommand::Strike {
                    target,
                    damage,
                    critical,
                } => self.register_hit(target, damage, critical),
                ModeCommand::CounterStrike { target, damage } => {
                    if self.apply_hit_damage(target, damage, true) {
                        self.register_counter();
                        self.handle_death(target);
                    }
                },
                ModeCommand::MoveActor { position } => self.actor.position = position,
                ModeCommand::DodgeComplete => self.register_dodge(),
            }
        }
    }

    /// Shared damage application: critical multiplier, health mutation and
    /// hit feedback. Combo credit and death handling stay with the caller so
    /// notifications keep their order when the killing blow ends combat.
    fn apply_hit_damage(&mut self, target: CombatantId, raw_damage: f32, critical: bool) -> bool {
        let damage = if critical {
            raw_damage * self.config.critical_multiplier
        } else {
            raw_damage
        };

        let Some(index) = self
            .roster
            .iter()
            .position(|h| h.id() == target && h.is_alive())
        else {
            debug!(?target, "hit on missing or dead target dropped");
            return false;
        };

        self.roster[index].take_damage(damage);
        if critical {
            self.events
                .publish(CombatEvent::CriticalHit { target, damage });
        } else {
            self.events.publish(CombatEvent::HitLanded { target, damage });
        }
        true
    }

    /// Removes the hostile if it died, re-targets if it was current and
    /// resolves Victory when the roster empties.
    fn handle_death(&mut self, target: CombatantId) {
        let Some(index) = self.roster.iter().position(|h| h.id() == target) else {
            return;
        };
        if self.roster[index].is_alive() {
            return;
        }

        self.roster.remove(index);
        if self.current_target == Some(target) {
            // Switch targets the moment the struck hostile dies.
            self.current_target = None;
            self.ensure_target();
        }
        if self.state == CombatState::InCombat && self.roster.is_empty() {
            self.conclude(CombatOutcome::Victory);
        }
    }

    /// Tears the session down: Finishing → terminal state. Explicit
    /// `end_combat` resets to Inactive afterward; natural resolution leaves
    /// the terminal state observable until the next tick.
    fn conclude(&mut self, outcome: CombatOutcome) {
        self.state = CombatState::Finishing;
        let victory = outcome == CombatOutcome::Victory;

        if let Some(handler) = self.handlers[self.mode.slot()].as_mut() {
            handler.engagement_ended(victory);
            handler.deactivate();
        }

        if self.combo.reset() {
            self.events.publish(CombatEvent::ComboChanged { combo: 0 });
        }
        self.current_target = None;
        self.roster.clear();
        self.last_outcome = Some(outcome);

        self.state = if victory {
            CombatState::Victory
        } else {
            CombatState::Defeat
        };
        self.events.publish(CombatEvent::CombatEnded { victory });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Hostile;

    fn director(config: CombatConfig) -> CombatDirector<Hostile> {
        CombatDirector::new(config).with_rng_seed(42)
    }

    fn no_crit_config() -> CombatConfig {
        CombatConfig::default().with_critical_chance(0.0)
    }

    fn combo_changes(events: &[CombatEvent]) -> Vec<u32> {
        events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::ComboChanged { combo } => Some(*combo),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_combat_enters_steady_state() {
        let mut director = director(no_crit_config());
        let hostile = Hostile::new(100.0, Vec2::new(1.0, 0.0));
        let id = hostile.id();

        director.start_combat(vec![hostile]);

        assert!(director.is_in_combat());
        assert_eq!(director.current_target(), Some(id));
        assert!(director
            .events()
            .drain()
            .contains(&CombatEvent::CombatStarted { hostiles: 1 }));
    }

    #[test]
    fn test_start_combat_redundant_call_is_noop() {
        let mut director = director(no_crit_config());
        director.start_combat(vec![Hostile::new(100.0, Vec2::X)]);
        director.events().drain();

        director.start_combat(vec![Hostile::new(50.0, Vec2::Y)]);

        assert_eq!(director.roster().len(), 1);
        assert!(director.events().drain().is_empty());
    }

    #[test]
    fn test_empty_roster_resolves_victory_immediately() {
        let mut director = director(no_crit_config());
        director.start_combat(Vec::new());

        assert_eq!(director.current_combat_state(), CombatState::Victory);
        assert_eq!(director.last_outcome(), Some(CombatOutcome::Victory));

        let events = director.events().drain();
        assert!(events.contains(&CombatEvent::CombatStarted { hostiles: 0 }));
        assert!(events.contains(&CombatEvent::CombatEnded { victory: true }));

        // Terminal state decays on the next frame.
        director.tick(0.016);
        assert_eq!(director.current_combat_state(), CombatState::Inactive);
    }

    #[test]
    fn test_three_attack_scenario() {
        // 100 HP hostile; 10 + step*2 damage, steps 1,2,3 -> 12, 14, 16.
        let mut director = director(no_crit_config());
        director.start_combat(vec![Hostile::new(100.0, Vec2::new(1.0, 0.0))]);

        for _ in 0..3 {
            director.request_attack();
            director.tick(0.7); // clear the post-hit cooldown
        }

        assert_eq!(director.roster()[0].current_health(), 58.0);
        assert_eq!(director.current_combo(), 3);
    }

    #[test]
    fn test_request_outside_combat_is_dropped() {
        let mut director = director(no_crit_config());
        director.request_attack();
        director.request_dodge();

        assert!(director.events().drain().is_empty());
        assert_eq!(director.current_combo(), 0);
    }

    #[test]
    fn test_register_hit_applies_critical_multiplier() {
        let mut director = director(no_crit_config());
        let hostile = Hostile::new(100.0, Vec2::X);
        let id = hostile.id();
        director.start_combat(vec![hostile]);

        director.register_hit(id, 10.0, true);

        assert_eq!(director.roster()[0].current_health(), 80.0);
        assert!(director
            .events()
            .drain()
            .contains(&CombatEvent::CriticalHit { target: id, damage: 20.0 }));
    }

    #[test]
    fn test_register_hit_on_dead_target_is_dropped() {
        let mut director = director(no_crit_config());
        director.start_combat(vec![Hostile::new(100.0, Vec2::X)]);
        director.events().drain();

        director.register_hit(CombatantId::from_raw(999_999), 10.0, false);

        assert!(director.events().drain().is_empty());
        assert_eq!(director.current_combo(), 0);
    }

    #[test]
    fn test_retarget_after_target_death() {
        let mut director = director(no_crit_config());
        let first = Hostile::new(10.0, Vec2::new(1.0, 0.0));
        let second = Hostile::new(100.0, Vec2::new(3.0, 0.0));
        let (first_id, second_id) = (first.id(), second.id());
        director.start_combat(vec![first, second]);
        assert_eq!(director.current_target(), Some(first_id));

        director.register_hit(first_id, 10.0, false);

        // Roster non-empty: the target must already be live again.
        assert_eq!(director.current_target(), Some(second_id));
        assert!(director.hostile(second_id).is_some_and(Damageable::is_alive));
    }

    #[test]
    fn test_killing_last_hostile_resolves_victory() {
        let mut director = director(no_crit_config());
        let hostile = Hostile::new(10.0, Vec2::X);
        let id = hostile.id();
        director.start_combat(vec![hostile]);

        director.register_hit(id, 10.0, false);

        assert_eq!(director.current_combat_state(), CombatState::Victory);
        assert!(director
            .events()
            .drain()
            .contains(&CombatEvent::CombatEnded { victory: true }));
    }

    #[test]
    fn test_damage_received_resets_combo_with_single_notification() {
        let mut director = director(no_crit_config());
        let hostile = Hostile::new(1000.0, Vec2::X);
        let id = hostile.id();
        director.start_combat(vec![hostile]);

        for _ in 0..5 {
            director.register_hit(id, 1.0, false);
        }
        assert_eq!(director.current_combo(), 5);
        director.events().drain();

        director.register_damage_received(12.0);

        let events = director.events().drain();
        assert!(events.contains(&CombatEvent::HitReceived { amount: 12.0 }));
        assert_eq!(combo_changes(&events), vec![0]);
        assert_eq!(director.current_combo(), 0);

        // Already at zero: a second hit emits no further combo change.
        director.register_damage_received(5.0);
        assert!(combo_changes(&director.events().drain()).is_empty());
    }

    #[test]
    fn test_combo_times_out_edge_triggered() {
        let mut director = director(no_crit_config());
        let hostile = Hostile::new(1000.0, Vec2::X);
        let id = hostile.id();
        director.start_combat(vec![hostile]);

        director.register_hit(id, 1.0, false);
        director.events().drain();

        // Within the window: nothing.
        director.tick(1.0);
        assert!(combo_changes(&director.events().drain()).is_empty());

        // Past 2.0 s: exactly one decay notification, then silence.
        director.tick(1.5);
        assert_eq!(combo_changes(&director.events().drain()), vec![0]);
        director.tick(1.0);
        assert!(combo_changes(&director.events().drain()).is_empty());
    }

    #[test]
    fn test_counter_registration_weighs_double() {
        let mut director = director(no_crit_config());
        director.start_combat(vec![Hostile::new(1000.0, Vec2::X)]);

        director.register_counter();

        assert_eq!(director.current_combo(), 2);
        assert!(director
            .events()
            .drain()
            .contains(&CombatEvent::CounterRegistered));
    }

    #[test]
    fn test_free_flow_counter_nets_plus_two() {
        let mut director = director(no_crit_config());
        let hostile = Hostile::new(1000.0, Vec2::new(1.0, 0.0));
        let id = hostile.id();
        director.start_combat(vec![hostile]);

        director.request_counter();

        // Always-critical fixed damage through the shared hit path.
        assert_eq!(
            director.hostile(id).map(Damageable::current_health),
            Some(950.0)
        );
        assert_eq!(director.current_combo(), 2);
    }

    #[test]
    fn test_mode_switch_mid_lunge_cancels_cleanly() {
        let mut director = director(no_crit_config());
        let hostile = Hostile::new(100.0, Vec2::new(10.0, 0.0));
        let id = hostile.id();
        director.start_combat(vec![hostile]);

        director.request_attack(); // out of reach -> lunge
        director.tick(0.1);
        director.tick(0.1);
        let mid_lunge = director.actor_position();
        assert!(mid_lunge.x > 0.0);

        director.set_combat_mode(CombatMode::PairedAnimation);

        // Interpolation halts exactly where it was; no hit ever registers.
        for _ in 0..30 {
            director.tick(0.1);
        }
        assert_eq!(director.actor_position(), mid_lunge);
        assert_eq!(
            director.hostile(id).map(Damageable::current_health),
            Some(100.0)
        );
    }

    #[test]
    fn test_mode_cycle_emits_changes() {
        let mut director = director(no_crit_config());
        director.cycle_combat_mode();
        assert_eq!(director.current_mode(), CombatMode::PairedAnimation);
        director.cycle_combat_mode();
        director.cycle_combat_mode();
        assert_eq!(director.current_mode(), CombatMode::FreeFlow);

        let changes = director
            .events()
            .drain()
            .into_iter()
            .filter(|e| matches!(e, CombatEvent::ModeChanged { .. }))
            .count();
        assert_eq!(changes, 3);
    }

    #[test]
    fn test_missing_handler_is_noop_not_crash() {
        let mut director = director(no_crit_config());
        director.clear_mode_handler(CombatMode::FreeFlow);
        let hostile = Hostile::new(100.0, Vec2::X);
        let id = hostile.id();
        director.start_combat(vec![hostile]);

        director.request_attack();
        director.tick(0.5);

        assert!(director.is_in_combat());
        assert_eq!(
            director.hostile(id).map(Damageable::current_health),
            Some(100.0)
        );
    }

    #[test]
    fn test_set_target_invalid_yields_none() {
        let mut director = director(no_crit_config());
        director.start_combat(vec![Hostile::new(100.0, Vec2::X)]);

        director.set_target(CombatantId::from_raw(424_242));
        assert_eq!(director.current_target(), None);
    }

    #[test]
    fn test_switch_target_cycles_roster_order() {
        let mut director = director(no_crit_config());
        let a = Hostile::new(100.0, Vec2::new(1.0, 0.0));
        let b = Hostile::new(100.0, Vec2::new(2.0, 0.0));
        let (a_id, b_id) = (a.id(), b.id());
        director.start_combat(vec![a, b]);

        director.switch_target();
        assert_eq!(director.current_target(), Some(b_id));
        director.switch_target();
        assert_eq!(director.current_target(), Some(a_id));
    }

    #[test]
    fn test_switch_target_single_hostile_is_noop() {
        let mut director = director(no_crit_config());
        let hostile = Hostile::new(100.0, Vec2::X);
        let id = hostile.id();
        director.start_combat(vec![hostile]);

        director.switch_target();
        assert_eq!(director.current_target(), Some(id));
    }

    #[test]
    fn test_explicit_end_returns_to_inactive() {
        let mut director = director(no_crit_config());
        director.start_combat(vec![Hostile::new(100.0, Vec2::X)]);

        director.end_combat(false);

        assert_eq!(director.current_combat_state(), CombatState::Inactive);
        assert_eq!(director.last_outcome(), Some(CombatOutcome::Defeat));
        assert_eq!(director.current_target(), None);
        assert!(director
            .events()
            .drain()
            .contains(&CombatEvent::CombatEnded { victory: false }));
    }

    #[test]
    fn test_end_combat_without_session_is_noop() {
        let mut director = director(no_crit_config());
        director.end_combat(true);
        assert!(director.events().drain().is_empty());
    }

    #[test]
    fn test_critical_roll_distribution_under_fixed_seed() {
        let mut director = director(CombatConfig::default());
        let hits = (0..10_000).filter(|_| director.roll_critical()).count();

        // 0.1 chance over 10k draws; generous statistical tolerance.
        assert!((850..=1150).contains(&hits), "got {hits} criticals");
    }

    #[test]
    fn test_automated_mode_fights_to_victory() {
        let config = no_crit_config().with_automated_cadence(0.3, 0);
        let mut director = director(config).with_mode(CombatMode::Automated);
        director.start_combat(vec![Hostile::new(40.0, Vec2::new(1.0, 0.0))]);

        for _ in 0..600 {
            director.tick(0.05);
            if !director.is_in_combat() {
                break;
            }
        }

        assert_eq!(director.last_outcome(), Some(CombatOutcome::Victory));
    }
}
