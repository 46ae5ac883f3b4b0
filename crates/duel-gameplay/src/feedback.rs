//! Damage feedback after a landed strike.
//!
//! A non-fatal hit makes the defender flash and bounce once. A fatal hit
//! makes the defeated combatant fade and shrink instead. The sub-machine
//! reports completion once its duration elapses; the choreographer then
//! performs the reset.

use duel_common::{PerSide, Side};
use glam::Vec2;

use crate::combatant::{AnimationState, Combatant, Tint};
use crate::stage::{threshold_reached, StageLayout};

/// Result of one feedback tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackStep {
    /// Keep ticking.
    Continue,
    /// Duration elapsed; reset and move on.
    Complete,
}

/// Damage feedback in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageFeedback {
    defender: Side,
    defeated: Option<Side>,
    timer: f32,
    bounce_offset: f32,
    rising: bool,
    bounce_done: bool,
    winner_restored: bool,
}

impl DamageFeedback {
    /// Start feedback for a hit on `defender`.
    pub fn begin(defender: Side, combatants: &mut PerSide<Combatant>, layout: &StageLayout) -> Self {
        let defeated = Side::ALL
            .into_iter()
            .find(|side| combatants.get(*side).is_defeated());

        let target = combatants.get_mut(defender);
        target.set_color(Tint::Damage);
        target.set_animation_state(AnimationState::Hurt);

        if let Some(side) = defeated {
            combatants.get_mut(side).set_animation_state(AnimationState::Defeated);
        }

        Self {
            defender,
            defeated,
            timer: 0.0,
            bounce_offset: layout.bounce_min_offset,
            rising: true,
            bounce_done: false,
            winner_restored: false,
        }
    }

    /// Side that took the hit.
    #[must_use]
    pub const fn defender(&self) -> Side {
        self.defender
    }

    /// Side whose HP reached zero, if any.
    #[must_use]
    pub const fn defeated(&self) -> Option<Side> {
        self.defeated
    }

    /// Whether this feedback ends the battle.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        self.defeated.is_some()
    }

    /// Seconds elapsed since feedback began.
    #[must_use]
    pub const fn timer(&self) -> f32 {
        self.timer
    }

    /// Whether the single bounce has finished.
    #[must_use]
    pub const fn bounce_done(&self) -> bool {
        self.bounce_done
    }

    /// Advance feedback animation by one tick.
    pub fn advance(
        &mut self,
        dt: f32,
        combatants: &mut PerSide<Combatant>,
        layout: &StageLayout,
    ) -> FeedbackStep {
        self.timer += dt;

        match self.defeated {
            Some(side) => Self::fade(combatants.get_mut(side), layout),
            None => self.bounce(combatants.get_mut(self.defender), layout),
        }

        if !self.winner_restored
            && threshold_reached(self.timer, layout.feedback_short)
            && combatants.opponent.current_hp() == 0
        {
            combatants.player.set_animation_state(AnimationState::Stance);
            self.winner_restored = true;
        }

        if threshold_reached(self.timer, layout.feedback_duration(self.is_fatal())) {
            self.timer = 0.0;
            FeedbackStep::Complete
        } else {
            FeedbackStep::Continue
        }
    }

    fn bounce(&mut self, defender: &mut Combatant, layout: &StageLayout) {
        if self.bounce_done {
            return;
        }

        if self.rising {
            self.bounce_offset = (self.bounce_offset + layout.bounce_step).min(layout.bounce_max_offset);
            if self.bounce_offset >= layout.bounce_max_offset {
                self.rising = false;
            }
        } else {
            self.bounce_offset = (self.bounce_offset - layout.bounce_step).max(layout.bounce_min_offset);
            if self.bounce_offset <= layout.bounce_min_offset {
                self.bounce_done = true;
            }
        }

        let x = defender.position().x;
        defender.set_position(Vec2::new(x, layout.stance_y + self.bounce_offset));
    }

    fn fade(defeated: &mut Combatant, layout: &StageLayout) {
        let visual = *defeated.visual();
        defeated.set_alpha(visual.alpha - layout.fade_step);
        defeated.set_scale(visual.scale - layout.shrink_step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::CombatStats;

    fn pair() -> PerSide<Combatant> {
        PerSide::new(
            Combatant::new(Side::Player, "knight", CombatStats::new(200, 1000, 100)),
            Combatant::new(Side::Opponent, "goblin", CombatStats::new(200, 600, 80)),
        )
    }

    #[test]
    fn test_non_fatal_bounce_returns_to_min() {
        let layout = StageLayout::default();
        let mut combatants = pair();
        combatants.opponent.set_position(layout.stance(Side::Opponent));
        combatants.opponent.apply_damage(67);

        let mut feedback = DamageFeedback::begin(Side::Opponent, &mut combatants, &layout);
        assert!(!feedback.is_fatal());
        assert_eq!(combatants.opponent.visual().tint, Tint::Damage);

        let mut peak: f32 = 0.0;
        for _ in 0..20 {
            feedback.advance(0.001, &mut combatants, &layout);
            peak = peak.max(combatants.opponent.position().y - layout.stance_y);
        }

        assert!(feedback.bounce_done());
        assert!((peak - layout.bounce_max_offset).abs() < f32::EPSILON);
        assert!((combatants.opponent.position().y - layout.stance_y).abs() < f32::EPSILON);
    }

    #[test]
    fn test_non_fatal_completes_at_short_threshold() {
        let layout = StageLayout::default();
        let mut combatants = pair();
        combatants.opponent.apply_damage(10);
        let mut feedback = DamageFeedback::begin(Side::Opponent, &mut combatants, &layout);

        let mut ticks = 0;
        while feedback.advance(0.05, &mut combatants, &layout) == FeedbackStep::Continue {
            ticks += 1;
            assert!(ticks < 100, "feedback never completed");
        }
        // 0.5s at 0.05s per tick, give or take float drift.
        assert!((10..=11).contains(&(ticks + 1)));
        assert!(feedback.timer().abs() < f32::EPSILON);
    }

    #[test]
    fn test_fatal_hit_fades_and_shrinks() {
        let layout = StageLayout::default();
        let mut combatants = pair();
        combatants.opponent.apply_damage(500);

        let mut feedback = DamageFeedback::begin(Side::Opponent, &mut combatants, &layout);
        assert!(feedback.is_fatal());
        assert_eq!(feedback.defeated(), Some(Side::Opponent));

        for _ in 0..5 {
            feedback.advance(0.05, &mut combatants, &layout);
        }
        let visual = combatants.opponent.visual();
        assert!(visual.alpha < 1.0);
        assert!(visual.scale < 1.0);
        assert_eq!(visual.animation, AnimationState::Defeated);
    }

    #[test]
    fn test_winner_stance_restored_early() {
        let layout = StageLayout::default();
        let mut combatants = pair();
        combatants.player.set_animation_state(AnimationState::Attack);
        combatants.opponent.apply_damage(500);

        let mut feedback = DamageFeedback::begin(Side::Opponent, &mut combatants, &layout);

        let mut elapsed = 0.0;
        let mut restored_at = None;
        while feedback.advance(0.05, &mut combatants, &layout) == FeedbackStep::Continue {
            elapsed += 0.05;
            if restored_at.is_none() && combatants.player.visual().animation == AnimationState::Stance {
                restored_at = Some(elapsed);
            }
        }

        let restored_at = restored_at.expect("winner stance restored before completion");
        assert!(restored_at >= 0.45 && restored_at < 1.5);
    }

    #[test]
    fn test_fatal_lasts_long_threshold() {
        let layout = StageLayout::default();
        let mut combatants = pair();
        combatants.player.apply_damage(500);
        let mut feedback = DamageFeedback::begin(Side::Player, &mut combatants, &layout);

        let mut ticks = 1;
        while feedback.advance(0.05, &mut combatants, &layout) == FeedbackStep::Continue {
            ticks += 1;
        }
        assert!((29..=31).contains(&ticks));
        // Player lost, so no early stance restore for them.
        assert_eq!(combatants.player.visual().animation, AnimationState::Defeated);
    }
}
