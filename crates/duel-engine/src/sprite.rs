//! Sprite handle for headless runs.

use duel_gameplay::{AnimationState, SpriteHandle};
use glam::Vec2;
use tracing::trace;

/// Sprite that logs animation switches and keeps the last pushed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceSprite {
    label: String,
    position: Vec2,
    alpha: f32,
    scale: f32,
    animation: AnimationState,
}

impl TraceSprite {
    /// Sprite reporting under `label`.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            position: Vec2::ZERO,
            alpha: 1.0,
            scale: 1.0,
            animation: AnimationState::Idle,
        }
    }

    /// Boxed for attaching to a combatant or skill effect.
    #[must_use]
    pub fn boxed(label: impl Into<String>) -> Box<dyn SpriteHandle> {
        Box::new(Self::new(label))
    }

    /// Last position pushed.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Last animation pushed.
    #[must_use]
    pub const fn animation(&self) -> AnimationState {
        self.animation
    }
}

impl SpriteHandle for TraceSprite {
    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn set_rotation(&mut self, _degrees: f32) {}

    fn set_color(&mut self, rgb: [u8; 3]) {
        trace!(sprite = %self.label, ?rgb, "tint");
    }

    fn set_animation_state(&mut self, state: AnimationState) {
        trace!(
            sprite = %self.label,
            from = ?self.animation,
            to = ?state,
            x = self.position.x,
            alpha = self.alpha,
            scale = self.scale,
            "animation"
        );
        self.animation = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_last_frame() {
        let mut sprite = TraceSprite::new("player");
        sprite.set_position(Vec2::new(280.0, 200.0));
        sprite.set_animation_state(AnimationState::Stance);

        assert_eq!(sprite.position(), Vec2::new(280.0, 200.0));
        assert_eq!(sprite.animation(), AnimationState::Stance);
    }
}
