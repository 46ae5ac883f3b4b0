//! Shared HUD model fed by a battle.
//!
//! The battle writes through [`SharedHud`]; a renderer (or the demo's
//! transcript) reads snapshots of [`HudState`].

use std::sync::Arc;

use duel_common::{PerSide, Side, SkillType};
use duel_gameplay::HudAdapter;
use glam::Vec2;
use parking_lot::Mutex;

/// Seconds a damaged bar takes to catch up with the new value.
const DRAIN_DURATION: f32 = 0.4;

/// HP bar of one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HpBarState {
    /// Current HP
    pub current_hp: i32,
    /// Maximum HP
    pub max_hp: i32,
    /// HP shown on the bar, draining toward `current_hp`
    pub display_hp: f32,
}

impl Default for HpBarState {
    fn default() -> Self {
        Self {
            current_hp: 0,
            max_hp: 0,
            display_hp: 0.0,
        }
    }
}

impl HpBarState {
    /// Set the bar. Drops are animated; the first fill and heals are not.
    pub fn set(&mut self, current_hp: i32, max_hp: i32) {
        let first_fill = self.max_hp == 0;
        self.max_hp = max_hp.max(0);
        self.current_hp = current_hp.clamp(0, self.max_hp);
        if first_fill || self.display_hp < self.current_hp as f32 {
            self.display_hp = self.current_hp as f32;
        }
    }

    /// HP percentage (0.0 to 1.0).
    #[must_use]
    pub fn percent(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.current_hp as f32 / self.max_hp as f32
    }

    /// Displayed HP percentage (0.0 to 1.0).
    #[must_use]
    pub fn display_percent(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.display_hp / self.max_hp as f32
    }

    /// Whether HP is low (<25%).
    #[must_use]
    pub fn is_low(&self) -> bool {
        self.percent() < 0.25
    }

    fn update(&mut self, dt: f32) {
        let target = self.current_hp as f32;
        if self.display_hp <= target {
            return;
        }
        let rate = self.max_hp as f32 / DRAIN_DURATION;
        self.display_hp = (self.display_hp - rate * dt).max(target);
    }
}

/// HUD model for one battle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudState {
    /// HP bars per side
    pub hp_bars: PerSide<HpBarState>,
    /// Highlighted skill slot per side
    pub highlighted: PerSide<Option<SkillType>>,
    /// Glows spawned over skill slots, oldest first
    pub glows: Vec<Vec2>,
}

impl HudState {
    /// Animate HP bars.
    pub fn update(&mut self, dt: f32) {
        for side in Side::ALL {
            self.hp_bars.get_mut(side).update(dt);
        }
    }

    /// HP bar of a side.
    #[must_use]
    pub const fn hp_bar(&self, side: Side) -> &HpBarState {
        self.hp_bars.get(side)
    }

    /// Highlighted slot of a side.
    #[must_use]
    pub const fn highlighted(&self, side: Side) -> Option<SkillType> {
        *self.highlighted.get(side)
    }
}

/// Thread-safe handle to a [`HudState`].
#[derive(Debug, Clone, Default)]
pub struct SharedHud {
    inner: Arc<Mutex<HudState>>,
}

impl SharedHud {
    /// Creates an empty HUD.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current HUD state.
    #[must_use]
    pub fn snapshot(&self) -> HudState {
        self.inner.lock().clone()
    }

    /// Animate HP bars.
    pub fn update(&self, dt: f32) {
        self.inner.lock().update(dt);
    }
}

impl HudAdapter for SharedHud {
    fn set_hp_bar(&mut self, side: Side, current_hp: i32, max_hp: i32) {
        self.inner.lock().hp_bars.get_mut(side).set(current_hp, max_hp);
    }

    fn highlight_skill_slot(&mut self, skill: SkillType, side: Side) {
        *self.inner.lock().highlighted.get_mut(side) = Some(skill);
    }

    fn clear_skill_slot(&mut self, skill: SkillType, side: Side) {
        let mut state = self.inner.lock();
        let slot = state.highlighted.get_mut(side);
        if *slot == Some(skill) {
            *slot = None;
        }
    }

    fn spawn_highlight_glow(&mut self, slot_position: Vec2) {
        self.inner.lock().glows.push(slot_position);
    }
}
