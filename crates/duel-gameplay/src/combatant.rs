//! Combatants and their visual state.
//!
//! This module provides:
//! - Combat stats (hp, attack, defense) and their validation
//! - Skill selection strategy (rotating vs. fixed boss skill)
//! - Visual state mirrored onto an opaque sprite handle
//!
//! A combatant computes no behavior on its own. The choreographer moves it,
//! damages it and animates it.

use duel_common::{DuelError, DuelResult, Side, SkillType};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Stats
// ============================================================================

/// Base combat statistics for a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    /// Maximum health points.
    pub max_hp: i32,
    /// Attack power, compared against the other side's to derive strike counts.
    pub attack_power: i32,
    /// Defense power.
    pub defense_power: i32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            max_hp: 200,
            attack_power: 600,
            defense_power: 100,
        }
    }
}

impl CombatStats {
    /// Create new combat stats.
    #[must_use]
    pub const fn new(max_hp: i32, attack_power: i32, defense_power: i32) -> Self {
        Self {
            max_hp,
            attack_power,
            defense_power,
        }
    }

    /// Reject stats that would break strike derivation.
    pub fn validate(&self, side: Side) -> DuelResult<()> {
        if self.attack_power <= 0 || self.max_hp <= 0 {
            return Err(DuelError::InvalidStats {
                side,
                attack_power: self.attack_power,
                max_hp: self.max_hp,
            });
        }
        Ok(())
    }
}

/// How a combatant picks the skill it telegraphs each turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillSelection {
    /// Take the next skill from the shared rotation.
    #[default]
    Rotating,
    /// Always use the same skill (boss archetypes).
    Fixed(SkillType),
}

/// Stat and skill overrides applied to a boss opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossProfile {
    /// Archetype tag shown for the boss
    pub name: String,
    /// Stats replacing the archetype defaults
    pub stats: CombatStats,
    /// Skill the boss always uses
    pub skill: SkillType,
}

// ============================================================================
// Visual state
// ============================================================================

/// Color tint applied to a combatant sprite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    /// No tint.
    #[default]
    Neutral,
    /// Damage flash.
    Damage,
}

impl Tint {
    /// RGB color sent to the sprite.
    #[must_use]
    pub const fn rgb(self) -> [u8; 3] {
        match self {
            Self::Neutral => [255, 255, 255],
            Self::Damage => [255, 64, 64],
        }
    }
}

/// Animation a sprite is playing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    /// Idle pose before the battle starts.
    #[default]
    Idle,
    /// Walking onto the stage.
    Walk,
    /// Combat stance.
    Stance,
    /// Melee lunge.
    Attack,
    /// Casting a skill effect.
    Cast,
    /// Taking a hit.
    Hurt,
    /// Defeated.
    Defeated,
}

/// Opaque render handle a combatant or skill effect forwards its visuals to.
pub trait SpriteHandle: fmt::Debug {
    /// Move the sprite.
    fn set_position(&mut self, position: Vec2);
    /// Set sprite opacity (0.0-1.0).
    fn set_alpha(&mut self, alpha: f32);
    /// Set uniform sprite scale.
    fn set_scale(&mut self, scale: f32);
    /// Set sprite rotation in degrees.
    fn set_rotation(&mut self, degrees: f32);
    /// Set sprite color tint.
    fn set_color(&mut self, rgb: [u8; 3]);
    /// Switch the sprite's animation.
    fn set_animation_state(&mut self, state: AnimationState);
}

/// Sprite handle that renders nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSprite;

impl SpriteHandle for NullSprite {
    fn set_position(&mut self, _position: Vec2) {}
    fn set_alpha(&mut self, _alpha: f32) {}
    fn set_scale(&mut self, _scale: f32) {}
    fn set_rotation(&mut self, _degrees: f32) {}
    fn set_color(&mut self, _rgb: [u8; 3]) {}
    fn set_animation_state(&mut self, _state: AnimationState) {}
}

/// Last values pushed to a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    /// Stage position
    pub position: Vec2,
    /// Opacity (0.0-1.0)
    pub alpha: f32,
    /// Uniform scale
    pub scale: f32,
    /// Rotation in degrees
    pub rotation: f32,
    /// Color tint
    pub tint: Tint,
    /// Whether the sprite is mirrored to face left
    pub facing_left: bool,
    /// Current animation
    pub animation: AnimationState,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            alpha: 1.0,
            scale: 1.0,
            rotation: 0.0,
            tint: Tint::Neutral,
            facing_left: false,
            animation: AnimationState::Idle,
        }
    }
}

// ============================================================================
// Combatant
// ============================================================================

/// One side of a battle.
#[derive(Debug)]
pub struct Combatant {
    side: Side,
    archetype: String,
    stats: CombatStats,
    current_hp: i32,
    strike_count: u32,
    selection: SkillSelection,
    telegraphed: Option<SkillType>,
    visual: VisualState,
    sprite: Box<dyn SpriteHandle>,
}

impl Combatant {
    /// Create a combatant with rotating skill selection and full health.
    #[must_use]
    pub fn new(side: Side, archetype: impl Into<String>, stats: CombatStats) -> Self {
        Self {
            side,
            archetype: archetype.into(),
            stats,
            current_hp: stats.max_hp.max(0),
            strike_count: 1,
            selection: SkillSelection::Rotating,
            telegraphed: None,
            visual: VisualState {
                facing_left: side == Side::Opponent,
                ..VisualState::default()
            },
            sprite: Box::new(NullSprite),
        }
    }

    /// Create a boss combatant that always uses `skill`.
    #[must_use]
    pub fn boss(side: Side, archetype: impl Into<String>, stats: CombatStats, skill: SkillType) -> Self {
        let mut combatant = Self::new(side, archetype, stats);
        combatant.selection = SkillSelection::Fixed(skill);
        combatant
    }

    /// Attach a render handle.
    #[must_use]
    pub fn with_sprite(mut self, sprite: Box<dyn SpriteHandle>) -> Self {
        self.sprite = sprite;
        self
    }

    /// Replace stats and skill selection with a boss profile, restoring full health.
    pub fn apply_boss_profile(&mut self, profile: &BossProfile) {
        self.archetype.clone_from(&profile.name);
        self.stats = profile.stats;
        self.current_hp = profile.stats.max_hp.max(0);
        self.selection = SkillSelection::Fixed(profile.skill);
    }

    /// Side this combatant fights for.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Archetype tag.
    #[must_use]
    pub fn archetype(&self) -> &str {
        &self.archetype
    }

    /// Combat stats.
    #[must_use]
    pub const fn stats(&self) -> &CombatStats {
        &self.stats
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_hp(&self) -> i32 {
        self.stats.max_hp
    }

    /// Current health.
    #[must_use]
    pub const fn current_hp(&self) -> i32 {
        self.current_hp
    }

    /// Attack power.
    #[must_use]
    pub const fn attack_power(&self) -> i32 {
        self.stats.attack_power
    }

    /// Defense power.
    #[must_use]
    pub const fn defense_power(&self) -> i32 {
        self.stats.defense_power
    }

    /// Landed strikes this combatant needs to take the other side from full to zero.
    #[must_use]
    pub const fn strike_count(&self) -> u32 {
        self.strike_count
    }

    /// Set the strike count (never below 1).
    pub fn set_strike_count(&mut self, count: u32) {
        self.strike_count = count.max(1);
    }

    /// Whether this combatant uses a fixed boss skill.
    #[must_use]
    pub const fn is_boss(&self) -> bool {
        matches!(self.selection, SkillSelection::Fixed(_))
    }

    /// Skill selection strategy.
    #[must_use]
    pub const fn skill_selection(&self) -> SkillSelection {
        self.selection
    }

    /// Skill currently being telegraphed, if any.
    #[must_use]
    pub const fn telegraphed_skill(&self) -> Option<SkillType> {
        self.telegraphed
    }

    /// Start telegraphing a skill.
    pub fn telegraph(&mut self, skill: SkillType) {
        self.telegraphed = Some(skill);
    }

    /// Stop telegraphing.
    pub fn clear_telegraph(&mut self) {
        self.telegraphed = None;
    }

    /// Whether health has reached zero.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.current_hp == 0
    }

    /// Subtract damage, clamping health at zero. Returns the damage actually taken.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        let taken = amount.clamp(0, self.current_hp);
        self.current_hp -= taken;
        taken
    }

    // === Visuals ===

    /// Last visual values pushed to the sprite.
    #[must_use]
    pub const fn visual(&self) -> &VisualState {
        &self.visual
    }

    /// Stage position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.visual.position
    }

    /// Move on stage.
    pub fn set_position(&mut self, position: Vec2) {
        self.visual.position = position;
        self.sprite.set_position(position);
    }

    /// Set opacity, clamped to 0.0-1.0.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.visual.alpha = alpha.clamp(0.0, 1.0);
        self.sprite.set_alpha(self.visual.alpha);
    }

    /// Set uniform scale, never negative.
    pub fn set_scale(&mut self, scale: f32) {
        self.visual.scale = scale.max(0.0);
        self.push_scale();
    }

    /// Set rotation in degrees.
    pub fn set_rotation(&mut self, degrees: f32) {
        self.visual.rotation = degrees;
        self.sprite.set_rotation(degrees);
    }

    /// Set color tint.
    pub fn set_color(&mut self, tint: Tint) {
        self.visual.tint = tint;
        self.sprite.set_color(tint.rgb());
    }

    /// Face left or right.
    pub fn set_facing_left(&mut self, facing_left: bool) {
        self.visual.facing_left = facing_left;
        self.push_scale();
    }

    /// Switch animation.
    pub fn set_animation_state(&mut self, state: AnimationState) {
        if self.visual.animation != state {
            self.visual.animation = state;
            self.sprite.set_animation_state(state);
        }
    }

    // Mirroring is expressed as a negative scale on the handle.
    fn push_scale(&mut self) {
        let scale = if self.visual.facing_left {
            -self.visual.scale
        } else {
            self.visual.scale
        };
        self.sprite.set_scale(scale);
    }

    /// Clear tint, alpha, scale and rotation and stand at `stance`.
    pub fn reset_to_stance(&mut self, stance: Vec2) {
        self.set_color(Tint::Neutral);
        self.set_alpha(1.0);
        self.set_scale(1.0);
        self.set_rotation(0.0);
        self.set_facing_left(self.side == Side::Opponent);
        self.set_position(stance);
        self.set_animation_state(AnimationState::Stance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn knight() -> Combatant {
        Combatant::new(Side::Player, "knight", CombatStats::new(200, 1000, 100))
    }

    #[test]
    fn test_new_combatant_full_health() {
        let c = knight();
        assert_eq!(c.current_hp(), 200);
        assert_eq!(c.strike_count(), 1);
        assert!(!c.is_boss());
        assert!(!c.is_defeated());
    }

    #[test]
    fn test_apply_damage_clamps_at_zero() {
        let mut c = knight();
        assert_eq!(c.apply_damage(150), 150);
        assert_eq!(c.apply_damage(150), 50);
        assert_eq!(c.current_hp(), 0);
        assert_eq!(c.apply_damage(10), 0);
        assert_eq!(c.current_hp(), 0);
        assert!(c.is_defeated());
    }

    #[test]
    fn test_negative_damage_ignored() {
        let mut c = knight();
        assert_eq!(c.apply_damage(-20), 0);
        assert_eq!(c.current_hp(), 200);
    }

    #[test]
    fn test_boss_profile_fixes_skill() {
        let mut c = Combatant::new(Side::Opponent, "goblin", CombatStats::default());
        c.apply_boss_profile(&BossProfile {
            name: "ogre_king".into(),
            stats: CombatStats::new(300, 600, 120),
            skill: SkillType::FireBlast,
        });

        assert!(c.is_boss());
        assert_eq!(c.archetype(), "ogre_king");
        assert_eq!(c.current_hp(), 300);
        assert_eq!(c.skill_selection(), SkillSelection::Fixed(SkillType::FireBlast));
    }

    #[test]
    fn test_stats_validation() {
        assert!(CombatStats::new(100, 10, 0).validate(Side::Player).is_ok());
        assert!(CombatStats::new(100, 0, 0).validate(Side::Player).is_err());
        assert!(CombatStats::new(0, 10, 0).validate(Side::Opponent).is_err());
    }

    #[test]
    fn test_strike_count_minimum() {
        let mut c = knight();
        c.set_strike_count(0);
        assert_eq!(c.strike_count(), 1);
    }

    #[test]
    fn test_reset_to_stance() {
        let mut c = knight();
        c.set_alpha(0.2);
        c.set_scale(0.4);
        c.set_color(Tint::Damage);
        c.set_rotation(45.0);

        c.reset_to_stance(Vec2::new(280.0, 200.0));

        let v = c.visual();
        assert_eq!(v.position, Vec2::new(280.0, 200.0));
        assert!((v.alpha - 1.0).abs() < f32::EPSILON);
        assert!((v.scale - 1.0).abs() < f32::EPSILON);
        assert_eq!(v.tint, Tint::Neutral);
        assert_eq!(v.animation, AnimationState::Stance);
    }

    #[derive(Debug, Default)]
    struct ScaleLog(std::rc::Rc<std::cell::RefCell<Vec<f32>>>);

    impl SpriteHandle for ScaleLog {
        fn set_position(&mut self, _position: Vec2) {}
        fn set_alpha(&mut self, _alpha: f32) {}
        fn set_scale(&mut self, scale: f32) {
            self.0.borrow_mut().push(scale);
        }
        fn set_rotation(&mut self, _degrees: f32) {}
        fn set_color(&mut self, _rgb: [u8; 3]) {}
        fn set_animation_state(&mut self, _state: AnimationState) {}
    }

    #[test]
    fn test_sprite_scale_mirrors_facing() {
        let log = ScaleLog::default();
        let scales = std::rc::Rc::clone(&log.0);
        let mut c = Combatant::new(Side::Opponent, "goblin", CombatStats::default())
            .with_sprite(Box::new(log));

        c.set_scale(0.5);
        c.set_facing_left(false);
        c.set_facing_left(true);

        assert_eq!(*scales.borrow(), vec![-0.5, 0.5, -0.5]);
        assert!((c.visual().scale - 0.5).abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_hp_never_negative(hits in proptest::collection::vec(-50i32..500, 0..20)) {
            let mut c = knight();
            for hit in hits {
                c.apply_damage(hit);
                prop_assert!(c.current_hp() >= 0);
                prop_assert!(c.current_hp() <= c.max_hp());
            }
        }
    }
}
