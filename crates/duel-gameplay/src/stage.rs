//! Stage geometry and pacing constants for a battle.
//!
//! Every distance is in stage units and every step is applied once per tick,
//! independent of the tick's delta time. Only the turn and feedback
//! thresholds are measured in seconds.

use duel_common::{PerSide, Side, SkillType};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Slack for second-based thresholds so accumulated frame deltas land on them.
const THRESHOLD_SLACK: f32 = 1e-4;

/// Whether an accumulated timer has reached a threshold in seconds.
#[must_use]
pub fn threshold_reached(timer: f32, threshold: f32) -> bool {
    timer + THRESHOLD_SLACK >= threshold
}

/// How the skill rotation counters advance on each selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Both sides' counters advance on every selection.
    #[default]
    Lockstep,
    /// Only the attacking side's counter advances.
    ActiveOnly,
}

/// Stage layout and pacing for one battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageLayout {
    // === Stance ===
    /// Horizontal stance position per side
    pub stance_x: PerSide<f32>,
    /// Vertical stance position shared by both sides
    pub stance_y: f32,

    // === Approach ===
    /// Distance from stance at which each side enters the stage
    pub approach_distance: f32,
    /// Horizontal distance covered per tick while approaching
    pub approach_step: f32,
    /// Horizontal position the player must reach to engage
    pub engage_x: f32,

    // === Patrol ===
    /// Half-width of the patrol oscillation around the stance
    pub patrol_range: f32,
    /// Horizontal distance covered per tick while patrolling
    pub patrol_step: f32,
    /// Seconds of patrolling before the next turn is dispatched
    pub turn_interval: f32,
    /// How skill counters advance
    pub rotation_mode: RotationMode,

    // === Strike ===
    /// Distance a melee strike must travel to land
    pub strike_travel: f32,
    /// Distance a melee strike covers per tick
    pub strike_step: f32,
    /// Attacker alpha when a melee strike starts
    pub strike_start_alpha: f32,
    /// Alpha gained per tick during a melee strike
    pub strike_alpha_step: f32,
    /// Distance a fire blast covers per tick
    pub fire_blast_step: f32,
    /// Distance a lightning bolt covers per tick
    pub lightning_step: f32,
    /// Where the skill effect rests between turns
    pub effect_parking: Vec2,

    // === Damage feedback ===
    /// Peak vertical offset of the damage bounce
    pub bounce_max_offset: f32,
    /// Resting vertical offset the bounce returns to
    pub bounce_min_offset: f32,
    /// Vertical distance covered per tick while bouncing
    pub bounce_step: f32,
    /// Alpha lost per tick by a defeated combatant
    pub fade_step: f32,
    /// Scale lost per tick by a defeated combatant
    pub shrink_step: f32,
    /// Seconds until the winner's stance is restored early
    pub feedback_short: f32,
    /// Seconds the defeat animation plays before the battle ends
    pub feedback_fatal: f32,

    // === HUD ===
    /// Position of the first skill slot per side
    pub slot_origin: PerSide<Vec2>,
    /// Horizontal spacing between skill slots
    pub slot_spacing: f32,
}

impl Default for StageLayout {
    fn default() -> Self {
        Self {
            // Stance
            stance_x: PerSide::new(280.0, 680.0),
            stance_y: 200.0,

            // Approach
            approach_distance: 380.0,
            approach_step: 8.0,
            engage_x: 280.0,

            // Patrol
            patrol_range: 20.0,
            patrol_step: 1.0,
            turn_interval: 2.0,
            rotation_mode: RotationMode::Lockstep,

            // Strike
            strike_travel: 300.0,
            strike_step: 25.0,
            strike_start_alpha: 0.3,
            strike_alpha_step: 0.06,
            fire_blast_step: 20.0,
            lightning_step: 40.0,
            effect_parking: Vec2::new(-500.0, -500.0),

            // Damage feedback
            bounce_max_offset: 30.0,
            bounce_min_offset: 0.0,
            bounce_step: 5.0,
            fade_step: 0.05,
            shrink_step: 0.05,
            feedback_short: 0.5,
            feedback_fatal: 1.5,

            // HUD
            slot_origin: PerSide::new(Vec2::new(40.0, 40.0), Vec2::new(728.0, 40.0)),
            slot_spacing: 64.0,
        }
    }
}

impl StageLayout {
    /// Stance position for a side.
    #[must_use]
    pub fn stance(&self, side: Side) -> Vec2 {
        Vec2::new(*self.stance_x.get(side), self.stance_y)
    }

    /// Off-stage entry position for a side.
    #[must_use]
    pub fn entry(&self, side: Side) -> Vec2 {
        let offset = self.approach_distance * side.attack_direction();
        Vec2::new(*self.stance_x.get(side) - offset, self.stance_y)
    }

    /// Screen position of a skill slot on the HUD.
    #[must_use]
    pub fn slot_position(&self, side: Side, skill: SkillType) -> Vec2 {
        let index = f32::from(skill.raw() - 1);
        *self.slot_origin.get(side) + Vec2::new(index * self.slot_spacing, 0.0)
    }

    /// Per-tick travel of the skill effect for a skill type.
    #[must_use]
    pub fn effect_step(&self, skill: SkillType) -> f32 {
        match skill {
            SkillType::Strike => self.strike_step,
            SkillType::FireBlast => self.fire_blast_step,
            SkillType::LightningBolt => self.lightning_step,
        }
    }

    /// Seconds damage feedback lasts before the reset step.
    #[must_use]
    pub fn feedback_duration(&self, fatal: bool) -> f32 {
        if fatal {
            self.feedback_fatal
        } else {
            self.feedback_short
        }
    }

    /// Clamp values into ranges the choreography can make progress with.
    pub fn validate(&mut self) {
        self.approach_step = self.approach_step.max(0.1);
        self.approach_distance = self.approach_distance.max(0.0);
        // engagement must be reachable by a player walking to its stance
        self.engage_x = self.engage_x.min(self.stance_x.player);
        self.patrol_range = self.patrol_range.max(0.0);
        self.patrol_step = self.patrol_step.max(0.0);
        self.turn_interval = self.turn_interval.max(0.01);

        self.strike_travel = self.strike_travel.max(0.0);
        self.strike_step = self.strike_step.max(0.1);
        self.strike_start_alpha = self.strike_start_alpha.clamp(0.0, 1.0);
        self.strike_alpha_step = self.strike_alpha_step.max(0.0);
        self.fire_blast_step = self.fire_blast_step.max(0.1);
        self.lightning_step = self.lightning_step.max(0.1);

        if self.bounce_max_offset < self.bounce_min_offset {
            std::mem::swap(&mut self.bounce_max_offset, &mut self.bounce_min_offset);
        }
        self.bounce_step = self.bounce_step.max(0.1);
        self.fade_step = self.fade_step.max(0.001);
        self.shrink_step = self.shrink_step.max(0.001);
        self.feedback_short = self.feedback_short.max(0.0);
        self.feedback_fatal = self.feedback_fatal.max(self.feedback_short);
    }
}
