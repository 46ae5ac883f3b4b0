//! Identifier types shared by every battle subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two sides of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The local player's combatant.
    Player,
    /// The opposing combatant.
    Opponent,
}

impl Side {
    /// Both sides, player first.
    pub const ALL: [Self; 2] = [Self::Player, Self::Opponent];

    /// Returns the other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Player => Self::Opponent,
            Self::Opponent => Self::Player,
        }
    }

    /// Horizontal direction this side attacks in (player faces right).
    #[must_use]
    pub const fn attack_direction(self) -> f32 {
        match self {
            Self::Player => 1.0,
            Self::Opponent => -1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => f.write_str("player"),
            Self::Opponent => f.write_str("opponent"),
        }
    }
}

/// A pair of values, one per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerSide<T> {
    /// Value for the player side
    pub player: T,
    /// Value for the opponent side
    pub opponent: T,
}

impl<T> PerSide<T> {
    /// Creates a pair from both values.
    #[must_use]
    pub const fn new(player: T, opponent: T) -> Self {
        Self { player, opponent }
    }

    /// Returns the value for a side.
    #[must_use]
    pub const fn get(&self, side: Side) -> &T {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    /// Returns the value for a side mutably.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }
}

impl<T: Clone> PerSide<T> {
    /// Creates a pair holding the same value on both sides.
    #[must_use]
    pub fn splat(value: T) -> Self {
        Self {
            player: value.clone(),
            opponent: value,
        }
    }
}

/// Kind of skill a combatant telegraphs for a turn.
///
/// The discriminants are the values shown on the HUD skill slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SkillType {
    /// Melee lunge resolved by the attacker's own travel.
    Strike = 1,
    /// Projectile carried by the shared skill effect.
    FireBlast = 2,
    /// Bolt carried by the shared skill effect.
    LightningBolt = 3,
}

impl SkillType {
    /// All skill types in rotation order.
    pub const ALL: [Self; 3] = [Self::Strike, Self::FireBlast, Self::LightningBolt];

    /// Converts a raw slot value, clamping anything outside 1..=3 into range.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 | 1 => Self::Strike,
            2 => Self::FireBlast,
            _ => Self::LightningBolt,
        }
    }

    /// Returns the raw slot value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Next skill in the `1 -> 2 -> 3 -> 1` rotation.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Strike => Self::FireBlast,
            Self::FireBlast => Self::LightningBolt,
            Self::LightningBolt => Self::Strike,
        }
    }

    /// Whether the strike is carried by the shared skill effect rather than
    /// the attacker's own movement.
    #[must_use]
    pub const fn uses_effect(self) -> bool {
        !matches!(self, Self::Strike)
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strike => f.write_str("strike"),
            Self::FireBlast => f.write_str("fire_blast"),
            Self::LightningBolt => f.write_str("lightning_bolt"),
        }
    }
}
