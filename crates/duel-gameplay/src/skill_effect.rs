//! The shared skill effect.
//!
//! A battle owns exactly one effect. The side currently attacking takes a
//! lease on it, triggers it once, and polls `is_finished` each tick. The
//! effect has no timers: it only moves when the lease holder calls
//! [`EffectLease::travel`].

use duel_common::{Side, SkillType};
use glam::Vec2;

use crate::combatant::{AnimationState, NullSprite, SpriteHandle};

/// Visual effect carrying a fire blast or lightning bolt between combatants.
#[derive(Debug)]
pub struct SkillEffect {
    skill: Option<SkillType>,
    holder: Option<Side>,
    finished: bool,
    direction: f32,
    position: Vec2,
    target: Vec2,
    remaining: f32,
    parking: Vec2,
    sprite: Box<dyn SpriteHandle>,
}

impl Default for SkillEffect {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl SkillEffect {
    /// Create an idle effect resting at `parking`.
    #[must_use]
    pub fn new(parking: Vec2) -> Self {
        Self {
            skill: None,
            holder: None,
            finished: false,
            direction: 1.0,
            position: parking,
            target: parking,
            remaining: 0.0,
            parking,
            sprite: Box::new(NullSprite),
        }
    }

    /// Attach a render handle.
    #[must_use]
    pub fn with_sprite(mut self, sprite: Box<dyn SpriteHandle>) -> Self {
        self.sprite = sprite;
        self
    }

    /// Move the off-stage resting position.
    pub fn set_parking(&mut self, parking: Vec2) {
        self.parking = parking;
    }

    /// Lend the effect to `attacker`.
    ///
    /// Returns `None` while the other side still has an effect in flight.
    pub fn lease(&mut self, attacker: Side) -> Option<EffectLease<'_>> {
        match self.holder {
            Some(holder) if holder != attacker && self.is_in_flight() => None,
            _ => Some(EffectLease {
                effect: self,
                attacker,
            }),
        }
    }

    /// Skill the effect was last triggered with.
    #[must_use]
    pub const fn skill_type(&self) -> Option<SkillType> {
        self.skill
    }

    /// Side currently holding the effect.
    #[must_use]
    pub const fn holder(&self) -> Option<Side> {
        self.holder
    }

    /// Whether the effect reached its target.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the effect was triggered and has not yet arrived.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.skill.is_some() && !self.finished && self.remaining > 0.0
    }

    /// Current stage position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Horizontal direction of the last trigger.
    #[must_use]
    pub const fn direction(&self) -> f32 {
        self.direction
    }

    /// Mark the effect finished (the host's animation completed).
    pub fn finish(&mut self) {
        self.finished = true;
        self.remaining = 0.0;
    }

    /// Clear the finished flag after the owner consumed it.
    pub fn clear_finished(&mut self) {
        self.finished = false;
    }

    /// Return to the idle pose off-stage and release the holder.
    pub fn reset(&mut self) {
        self.skill = None;
        self.holder = None;
        self.finished = false;
        self.remaining = 0.0;
        self.position = self.parking;
        self.target = self.parking;
        self.sprite.set_position(self.parking);
        self.sprite.set_alpha(0.0);
        self.sprite.set_animation_state(AnimationState::Idle);
    }

    fn trigger(&mut self, holder: Side, skill: SkillType, direction: f32, origin: Vec2, target: Vec2) {
        self.skill = Some(skill);
        self.holder = Some(holder);
        self.finished = false;
        self.direction = if direction < 0.0 { -1.0 } else { 1.0 };
        self.position = origin;
        self.target = target;
        self.remaining = (target.x - origin.x).abs();

        self.sprite.set_position(origin);
        self.sprite.set_scale(self.direction);
        self.sprite.set_alpha(1.0);
        self.sprite.set_animation_state(AnimationState::Cast);

        if self.remaining <= 0.0 {
            self.finished = true;
        }
    }

    fn travel(&mut self, step: f32) {
        if !self.is_in_flight() {
            return;
        }
        let moved = step.max(0.0).min(self.remaining);
        self.remaining -= moved;
        self.position.x += moved * self.direction;
        self.sprite.set_position(self.position);

        if self.remaining <= 0.0 {
            self.position = self.target;
            self.finished = true;
        }
    }
}

/// Temporary use of the shared effect by the attacking side.
#[derive(Debug)]
pub struct EffectLease<'a> {
    effect: &'a mut SkillEffect,
    attacker: Side,
}

impl EffectLease<'_> {
    /// Side holding the lease.
    #[must_use]
    pub const fn attacker(&self) -> Side {
        self.attacker
    }

    /// Launch the effect from `origin` toward `target`.
    pub fn trigger(&mut self, skill: SkillType, direction: f32, origin: Vec2, target: Vec2) {
        self.effect.trigger(self.attacker, skill, direction, origin, target);
    }

    /// Move the effect `step` units toward its target.
    pub fn travel(&mut self, step: f32) {
        self.effect.travel(step);
    }

    /// Whether the effect reached its target.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.effect.is_finished()
    }
}
