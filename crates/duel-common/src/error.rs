//! Error types for the Duel battle engine.

use thiserror::Error;

use crate::ids::Side;

/// Errors raised by the battle choreography.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuelError {
    /// A combatant's stats cannot drive a battle (zero attack power or
    /// non-positive max HP). Raised at setup; the battle never starts.
    #[error("invalid stats for {side}: attack power {attack_power}, max hp {max_hp}")]
    InvalidStats {
        /// Side carrying the bad stats
        side: Side,
        /// Attack power supplied
        attack_power: i32,
        /// Max HP supplied
        max_hp: i32,
    },

    /// A tick arrived after battle teardown was requested.
    #[error("tick {tick} arrived after battle teardown")]
    ReentrantTick {
        /// Tick counter at the moment the tick was rejected
        tick: u64,
    },
}

impl DuelError {
    /// Whether the error only needs logging (the battle keeps its state).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::ReentrantTick { .. })
    }
}

/// Result type alias for battle operations.
pub type DuelResult<T> = Result<T, DuelError>;
