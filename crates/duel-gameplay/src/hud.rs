//! HUD boundary.
//!
//! The choreographer drives HP bars and skill-slot highlights through
//! [`HudAdapter`]. Rendering is the host's business.

use duel_common::{PerSide, Side, SkillType};
use glam::Vec2;

/// Receiver of HUD commands issued during a battle.
pub trait HudAdapter {
    /// Update a side's HP bar.
    fn set_hp_bar(&mut self, side: Side, current_hp: i32, max_hp: i32);
    /// Highlight the slot of the skill `side` is telegraphing.
    fn highlight_skill_slot(&mut self, skill: SkillType, side: Side);
    /// Remove a slot highlight.
    fn clear_skill_slot(&mut self, skill: SkillType, side: Side);
    /// Play a glow over a slot.
    fn spawn_highlight_glow(&mut self, slot_position: Vec2);
}

/// A single HUD command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HudCommand {
    /// HP bar update
    HpBar {
        /// Side whose bar changed
        side: Side,
        /// Current HP
        current_hp: i32,
        /// Max HP
        max_hp: i32,
    },
    /// Slot highlighted
    Highlight {
        /// Telegraphed skill
        skill: SkillType,
        /// Telegraphing side
        side: Side,
    },
    /// Slot highlight cleared
    Clear {
        /// Skill whose slot was cleared
        skill: SkillType,
        /// Side owning the slot
        side: Side,
    },
    /// Glow spawned
    Glow {
        /// Slot position
        position: Vec2,
    },
}

/// HUD adapter that records every command (for tests and headless runs).
#[derive(Debug, Default, Clone)]
pub struct RecordingHud {
    commands: Vec<HudCommand>,
}

impl RecordingHud {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands received, oldest first.
    #[must_use]
    pub fn commands(&self) -> &[HudCommand] {
        &self.commands
    }

    /// Last HP bar value reported for a side.
    #[must_use]
    pub fn hp_bar(&self, side: Side) -> Option<(i32, i32)> {
        self.commands.iter().rev().find_map(|cmd| match *cmd {
            HudCommand::HpBar {
                side: s,
                current_hp,
                max_hp,
            } if s == side => Some((current_hp, max_hp)),
            _ => None,
        })
    }

    /// Skill slot currently highlighted per side, replaying highlights and clears.
    #[must_use]
    pub fn highlighted(&self) -> PerSide<Option<SkillType>> {
        let mut slots = PerSide::splat(None);
        for cmd in &self.commands {
            match *cmd {
                HudCommand::Highlight { skill, side } => *slots.get_mut(side) = Some(skill),
                HudCommand::Clear { skill, side } => {
                    if *slots.get(side) == Some(skill) {
                        *slots.get_mut(side) = None;
                    }
                },
                _ => {},
            }
        }
        slots
    }

    /// Number of highlight commands received.
    #[must_use]
    pub fn highlight_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, HudCommand::Highlight { .. }))
            .count()
    }
}

impl HudAdapter for RecordingHud {
    fn set_hp_bar(&mut self, side: Side, current_hp: i32, max_hp: i32) {
        self.commands.push(HudCommand::HpBar {
            side,
            current_hp,
            max_hp,
        });
    }

    fn highlight_skill_slot(&mut self, skill: SkillType, side: Side) {
        self.commands.push(HudCommand::Highlight { skill, side });
    }

    fn clear_skill_slot(&mut self, skill: SkillType, side: Side) {
        self.commands.push(HudCommand::Clear { skill, side });
    }

    fn spawn_highlight_glow(&mut self, slot_position: Vec2) {
        self.commands.push(HudCommand::Glow {
            position: slot_position,
        });
    }
}
