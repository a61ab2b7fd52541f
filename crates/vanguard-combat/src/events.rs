//! Combat feedback events.
//!
//! Fire-and-forget notifications consumed by audio/haptic/UI layers. The bus
//! is owned by the director instance (not the type), so subscribers never
//! leak across sessions. Publishing never blocks; with no observer draining,
//! the bounded channel simply fills and newer events are dropped.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use vanguard_common::CombatantId;

use crate::mode::CombatMode;

/// Notifications emitted by the combat director.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// Combat began with the given hostile count.
    CombatStarted {
        /// Number of hostiles in the initial roster.
        hostiles: usize,
    },
    /// Combat finished.
    CombatEnded {
        /// Whether the actor won.
        victory: bool,
    },
    /// A non-critical hit landed on a hostile.
    HitLanded {
        /// Struck hostile.
        target: CombatantId,
        /// Damage applied.
        damage: f32,
    },
    /// A critical hit landed on a hostile.
    CriticalHit {
        /// Struck hostile.
        target: CombatantId,
        /// Damage applied (after the critical multiplier).
        damage: f32,
    },
    /// The actor took a hit.
    HitReceived {
        /// Incoming damage amount (informational; actor HP is external).
        amount: f32,
    },
    /// A dodge completed.
    DodgeRegistered,
    /// A counter was performed.
    CounterRegistered,
    /// The combo count changed.
    ComboChanged {
        /// New combo value.
        combo: u32,
    },
    /// The combat mode changed.
    ModeChanged {
        /// Newly active mode.
        mode: CombatMode,
    },
}

/// Bounded broadcast channel for combat events.
#[derive(Debug)]
pub struct EventBus {
    sender: Sender<CombatEvent>,
    receiver: Receiver<CombatEvent>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event. Non-blocking; dropped if the bus is full.
    pub fn publish(&self, event: CombatEvent) {
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// A new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<CombatEvent> {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(16);
        bus.publish(CombatEvent::CombatStarted { hostiles: 3 });
        bus.publish(CombatEvent::DodgeRegistered);

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], CombatEvent::CombatStarted { hostiles: 3 });
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops_instead_of_blocking() {
        let bus = EventBus::new(2);
        for _ in 0..5 {
            bus.publish(CombatEvent::DodgeRegistered);
        }

        assert_eq!(bus.pending_count(), 2);
    }

    #[test]
    fn test_cloned_sender_feeds_same_bus() {
        let bus = EventBus::new(4);
        let sender = bus.sender();
        let _ = sender.try_send(CombatEvent::CounterRegistered);

        assert_eq!(bus.drain(), vec![CombatEvent::CounterRegistered]);
    }
}
