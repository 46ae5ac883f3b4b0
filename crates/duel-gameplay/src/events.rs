//! Event bus for battle notifications.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use duel_common::{Side, SkillType};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::choreographer::Phase;

/// Notable moments in a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// The choreography moved to a new phase
    PhaseChanged {
        /// Phase left
        from: Phase,
        /// Phase entered
        to: Phase,
    },
    /// A turn was dispatched
    TurnDispatched {
        /// Attacking side
        attacker: Side,
        /// Telegraphed skill
        skill: SkillType,
    },
    /// A strike landed
    StrikeLanded {
        /// Attacking side
        attacker: Side,
        /// Skill used
        skill: SkillType,
        /// Damage dealt after clamping
        damage: i32,
        /// Defender HP after the hit
        defender_hp: i32,
    },
    /// A combatant's HP reached zero
    FatalHit {
        /// Defeated side
        defeated: Side,
    },
    /// Battle end was signaled to the scene navigator
    BattleEnded {
        /// Winning side
        winner: Side,
        /// Ticks processed
        ticks: u64,
    },
}

/// Event bus for broadcasting battle events.
///
/// The channel is bounded. Events published while it is full are dropped,
/// logged and counted in [`EventBus::dropped_count`].
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<BattleEvent>,
    /// Receiver for collecting events
    receiver: Receiver<BattleEvent>,
    /// Channel capacity
    capacity: usize,
    /// Events lost to a full channel
    dropped: AtomicU64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
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
            dropped: AtomicU64::new(0),
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: BattleEvent) {
        // Non-blocking send - if full, event is dropped
        if let Err(TrySendError::Full(event)) = self.sender.try_send(event) {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            warn!(?event, dropped, capacity = self.capacity, "event bus full, event dropped");
        }
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<BattleEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the number of events dropped because the bus was full.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new receiver handle for consuming events elsewhere.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<BattleEvent> {
        self.receiver.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(4);
        bus.publish(BattleEvent::FatalHit {
            defeated: Side::Opponent,
        });
        bus.publish(BattleEvent::TurnDispatched {
            attacker: Side::Player,
            skill: SkillType::Strike,
        });

        assert_eq!(bus.pending_count(), 2);
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops_events() {
        let bus = EventBus::new(1);
        for _ in 0..3 {
            bus.publish(BattleEvent::FatalHit {
                defeated: Side::Player,
            });
        }
        assert_eq!(bus.drain().len(), 1);
        assert_eq!(bus.dropped_count(), 2);
        assert_eq!(bus.capacity(), 1);

        // Draining frees room again.
        bus.publish(BattleEvent::FatalHit {
            defeated: Side::Opponent,
        });
        assert_eq!(bus.pending_count(), 1);
        assert_eq!(bus.dropped_count(), 2);
    }
}
