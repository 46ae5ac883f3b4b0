//! # Duel Common
//!
//! Common types and shared error definitions for the Duel battle engine.
//!
//! This crate provides the vocabulary used across the Duel crates:
//! - Battle sides (player vs. opponent)
//! - Skill types and their rotation order
//! - Battle error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite_roundtrip() {
        assert_eq!(Side::Player.opposite(), Side::Opponent);
        assert_eq!(Side::Player.opposite().opposite(), Side::Player);
    }

    #[test]
    fn test_skill_cycle_period() {
        let mut skill = SkillType::Strike;
        for _ in 0..3 {
            skill = skill.next();
        }
        assert_eq!(skill, SkillType::Strike);
    }

    #[test]
    fn test_error_display() {
        let err = DuelError::InvalidStats {
            side: Side::Opponent,
            attack_power: 0,
            max_hp: 100,
        };
        assert!(err.to_string().contains("opponent"));
    }
}
