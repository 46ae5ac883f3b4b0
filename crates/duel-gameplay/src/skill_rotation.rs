//! Deterministic skill rotation.
//!
//! Each side keeps a counter cycling `Strike -> FireBlast -> LightningBolt`.
//! In [`RotationMode::Lockstep`] every selection advances both counters,
//! whichever side is attacking. Combatants with a fixed boss skill ignore
//! their counter but it still advances.

use duel_common::{PerSide, Side, SkillType};

use crate::combatant::SkillSelection;
use crate::stage::RotationMode;

/// Per-side skill counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillRotation {
    counters: PerSide<SkillType>,
    mode: RotationMode,
}

impl Default for SkillRotation {
    fn default() -> Self {
        Self::new(RotationMode::default())
    }
}

impl SkillRotation {
    /// Create a rotation with both counters at `Strike`.
    #[must_use]
    pub const fn new(mode: RotationMode) -> Self {
        Self {
            counters: PerSide::new(SkillType::Strike, SkillType::Strike),
            mode,
        }
    }

    /// Skill the next selection would return for `side` under rotation.
    #[must_use]
    pub const fn peek(&self, side: Side) -> SkillType {
        *self.counters.get(side)
    }

    /// Advancement mode.
    #[must_use]
    pub const fn mode(&self) -> RotationMode {
        self.mode
    }

    /// Pick the skill `attacker` telegraphs this turn and advance the counters.
    pub fn select(&mut self, attacker: Side, selection: SkillSelection) -> SkillType {
        let rotated = self.peek(attacker);

        match self.mode {
            RotationMode::Lockstep => {
                for side in Side::ALL {
                    let counter = self.counters.get_mut(side);
                    *counter = counter.next();
                }
            },
            RotationMode::ActiveOnly => {
                let counter = self.counters.get_mut(attacker);
                *counter = counter.next();
            },
        }

        match selection {
            SkillSelection::Rotating => rotated,
            SkillSelection::Fixed(skill) => skill,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_side_period_three() {
        let mut rotation = SkillRotation::default();
        let picks: Vec<_> = (0..6)
            .map(|_| rotation.select(Side::Player, SkillSelection::Rotating).raw())
            .collect();
        assert_eq!(picks, vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_lockstep_advances_both_sides() {
        let mut rotation = SkillRotation::new(RotationMode::Lockstep);
        rotation.select(Side::Player, SkillSelection::Rotating);
        assert_eq!(rotation.peek(Side::Opponent), SkillType::FireBlast);

        // Alternating turns therefore see every other skill.
        let picks: Vec<_> = [Side::Opponent, Side::Player, Side::Opponent, Side::Player]
            .into_iter()
            .map(|side| rotation.select(side, SkillSelection::Rotating))
            .collect();
        assert_eq!(
            picks,
            vec![
                SkillType::FireBlast,
                SkillType::LightningBolt,
                SkillType::Strike,
                SkillType::FireBlast,
            ]
        );
    }

    #[test]
    fn test_active_only_leaves_defender_counter() {
        let mut rotation = SkillRotation::new(RotationMode::ActiveOnly);
        rotation.select(Side::Player, SkillSelection::Rotating);
        assert_eq!(rotation.peek(Side::Player), SkillType::FireBlast);
        assert_eq!(rotation.peek(Side::Opponent), SkillType::Strike);
    }

    #[test]
    fn test_fixed_selection_bypasses_rotation() {
        let mut rotation = SkillRotation::default();
        let fixed = SkillSelection::Fixed(SkillType::LightningBolt);
        for _ in 0..4 {
            assert_eq!(rotation.select(Side::Opponent, fixed), SkillType::LightningBolt);
        }
        // Counters still moved.
        assert_eq!(rotation.peek(Side::Player), SkillType::FireBlast);
    }

    #[test]
    fn test_rotation_is_deterministic() {
        let mut a = SkillRotation::default();
        let mut b = SkillRotation::default();
        for i in 0..30 {
            let side = if i % 2 == 0 { Side::Player } else { Side::Opponent };
            assert_eq!(
                a.select(side, SkillSelection::Rotating),
                b.select(side, SkillSelection::Rotating)
            );
        }
    }
}
