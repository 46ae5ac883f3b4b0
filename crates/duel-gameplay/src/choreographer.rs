//! Turn choreography for a two-combatant battle.
//!
//! [`TurnChoreographer`] is a frame-driven state machine. The host calls
//! [`TurnChoreographer::advance`] once per frame and the choreographer:
//! - walks both combatants onto the stage (`Approaching`)
//! - sways them around their stances and times the next turn (`Patrolling`)
//! - plays the attacker's strike until it lands (`Attacking`)
//! - plays hit or defeat feedback, then resets the stage (`DamageFeedback`)
//!
//! Turns strictly alternate, starting with the player. All HUD output goes
//! through [`HudAdapter`]; the end of the battle is reported once through
//! [`SceneNavigator::pop_current_scene`]. Ticks after that are rejected
//! with [`DuelError::ReentrantTick`] and change nothing.

use duel_common::{DuelError, DuelResult, PerSide, Side, SkillType};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::combatant::{AnimationState, Combatant};
use crate::events::{BattleEvent, EventBus};
use crate::feedback::{DamageFeedback, FeedbackStep};
use crate::hud::HudAdapter;
use crate::navigation::SceneNavigator;
use crate::roster::BattleVariant;
use crate::skill_effect::SkillEffect;
use crate::skill_rotation::SkillRotation;
use crate::stage::{threshold_reached, StageLayout};
use crate::stat_resolver::{self, strike_damage};

/// Choreography phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Combatants walking to their stances.
    Approaching,
    /// Swaying in stance while the turn timer runs.
    Patrolling,
    /// A strike is being played out.
    Attacking,
    /// Hit or defeat feedback after a landed strike.
    DamageFeedback,
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Side left standing
    pub winner: Side,
    /// Ticks processed until the end was signaled
    pub ticks: u64,
    /// Seconds of battle time until the end was signaled
    pub elapsed: f64,
}

/// Turn order, timers and per-side flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnState {
    /// Side whose strike is dispatched next (or is being resolved)
    pub active_turn: Side,
    /// Whether a strike is currently animating
    pub is_fighting: bool,
    /// Whether a side has the skill effect in flight
    pub attacker_engaged: PerSide<bool>,
    /// Seconds patrolled since the last dispatch
    pub turn_timer: f32,
    /// Whether a combatant's HP has reached zero
    pub fatal_hit: bool,
    /// Strikes each side has landed
    pub strikes_landed: PerSide<u32>,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            active_turn: Side::Player,
            is_fighting: false,
            attacker_engaged: PerSide::splat(false),
            turn_timer: 0.0,
            fatal_hit: false,
            strikes_landed: PerSide::splat(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct StrikeInFlight {
    attacker: Side,
    skill: SkillType,
    travelled: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PatrolState {
    offset: f32,
    direction: f32,
}

impl Default for PatrolState {
    fn default() -> Self {
        Self {
            offset: 0.0,
            direction: 1.0,
        }
    }
}

/// Everything a battle is staged from.
#[derive(Debug)]
pub struct BattleSetup {
    /// Player combatant
    pub player: Combatant,
    /// Opponent combatant
    pub opponent: Combatant,
    /// The one skill effect both sides share
    pub effect: SkillEffect,
    /// Skirmish or boss battle
    pub variant: BattleVariant,
    /// Stage geometry and pacing
    pub layout: StageLayout,
}

impl BattleSetup {
    /// Stage a battle on the default layout.
    #[must_use]
    pub fn new(player: Combatant, opponent: Combatant, effect: SkillEffect, variant: BattleVariant) -> Self {
        Self {
            player,
            opponent,
            effect,
            variant,
            layout: StageLayout::default(),
        }
    }

    /// Use a custom stage layout.
    #[must_use]
    pub fn with_layout(mut self, layout: StageLayout) -> Self {
        self.layout = layout;
        self
    }
}

/// Frame-driven battle state machine.
#[derive(Debug)]
pub struct TurnChoreographer<H: HudAdapter, N: SceneNavigator> {
    combatants: PerSide<Combatant>,
    effect: SkillEffect,
    variant: BattleVariant,
    layout: StageLayout,
    hud: H,
    navigator: N,
    events: EventBus,
    rotation: SkillRotation,
    phase: Phase,
    turn: TurnState,
    patrol: PerSide<PatrolState>,
    highlighted: PerSide<Option<SkillType>>,
    strike: Option<StrikeInFlight>,
    feedback: Option<DamageFeedback>,
    torn_down: bool,
    outcome: Option<Outcome>,
    ticks: u64,
    elapsed: f64,
}

impl<H: HudAdapter, N: SceneNavigator> TurnChoreographer<H, N> {
    /// Stage a battle.
    ///
    /// Applies boss overrides, derives strike counts, places both combatants
    /// at their entry positions, parks the skill effect and fills both HP bars.
    /// Fails with `InvalidStats` when either side cannot fight.
    pub fn setup(setup: BattleSetup, hud: H, navigator: N) -> DuelResult<Self> {
        let BattleSetup {
            mut player,
            mut opponent,
            mut effect,
            variant,
            mut layout,
        } = setup;
        layout.validate();

        if player.side() != Side::Player || opponent.side() != Side::Opponent {
            warn!(
                player = %player.side(),
                opponent = %opponent.side(),
                "combatant sides do not match their slots"
            );
        }

        if let Some(profile) = variant.boss() {
            opponent.apply_boss_profile(profile);
        }

        let counts = stat_resolver::resolve_stats(player.stats(), opponent.stats())?;
        player.set_strike_count(counts.player);
        opponent.set_strike_count(counts.opponent);

        let mut combatants = PerSide::new(player, opponent);
        for side in Side::ALL {
            let walks_on = variant.approaches(side);
            let start = if walks_on {
                layout.entry(side)
            } else {
                layout.stance(side)
            };
            let combatant = combatants.get_mut(side);
            combatant.reset_to_stance(start);
            if walks_on {
                combatant.set_animation_state(AnimationState::Walk);
            }
        }

        effect.set_parking(layout.effect_parking);
        effect.reset();

        let mut choreographer = Self {
            combatants,
            effect,
            variant,
            rotation: SkillRotation::new(layout.rotation_mode),
            layout,
            hud,
            navigator,
            events: EventBus::default(),
            phase: Phase::Approaching,
            turn: TurnState::default(),
            patrol: PerSide::splat(PatrolState::default()),
            highlighted: PerSide::splat(None),
            strike: None,
            feedback: None,
            torn_down: false,
            outcome: None,
            ticks: 0,
            elapsed: 0.0,
        };
        choreographer.refresh_hp_bars();

        info!(
            player = choreographer.combatants.player.archetype(),
            opponent = choreographer.combatants.opponent.archetype(),
            player_strikes = counts.player,
            opponent_strikes = counts.opponent,
            boss = choreographer.variant.boss().is_some(),
            "battle set up"
        );

        Ok(choreographer)
    }

    /// Advance the battle by one frame of `dt` seconds.
    ///
    /// Negative or non-finite deltas count as zero. After the battle end has
    /// been signaled every call returns `ReentrantTick` without touching state.
    pub fn advance(&mut self, dt: f32) -> DuelResult<()> {
        if self.torn_down {
            let err = DuelError::ReentrantTick { tick: self.ticks };
            warn!(%err, "ignoring tick");
            return Err(err);
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.ticks += 1;
        self.elapsed += f64::from(dt);

        match self.phase {
            Phase::Approaching => self.tick_approach(),
            Phase::Patrolling => self.tick_patrol(dt),
            Phase::Attacking => self.tick_attack(),
            Phase::DamageFeedback => self.tick_feedback(dt),
        }
        Ok(())
    }

    /// Dispatch a player turn now. Debug helper; only honored while patrolling.
    pub fn request_player_turn(&mut self) -> bool {
        self.request_turn(Side::Player)
    }

    /// Dispatch an opponent turn now. Debug helper; only honored while patrolling.
    pub fn request_opponent_turn(&mut self) -> bool {
        self.request_turn(Side::Opponent)
    }

    /// Dispatch a turn for `side` now, bypassing the turn timer.
    pub fn request_turn(&mut self, side: Side) -> bool {
        if self.torn_down || self.phase != Phase::Patrolling {
            debug!(%side, phase = ?self.phase, "manual turn request ignored");
            return false;
        }
        self.turn.turn_timer = 0.0;
        self.dispatch_turn(side);
        true
    }

    /// Stop accepting ticks without signaling the navigator.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            self.torn_down = true;
            info!(tick = self.ticks, "battle torn down");
        }
    }

    // === Accessors ===

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Turn order and timers.
    #[must_use]
    pub const fn turn(&self) -> &TurnState {
        &self.turn
    }

    /// Side whose turn is next or being resolved.
    #[must_use]
    pub const fn active_turn(&self) -> Side {
        self.turn.active_turn
    }

    /// Whether a strike is animating.
    #[must_use]
    pub const fn is_fighting(&self) -> bool {
        self.turn.is_fighting
    }

    /// Side whose strike is animating.
    #[must_use]
    pub fn fighting_side(&self) -> Option<Side> {
        self.strike.map(|strike| strike.attacker)
    }

    /// Seconds patrolled since the last dispatch.
    #[must_use]
    pub const fn turn_timer(&self) -> f32 {
        self.turn.turn_timer
    }

    /// Seconds of damage feedback played so far (zero outside feedback).
    #[must_use]
    pub fn damage_timer(&self) -> f32 {
        self.feedback.as_ref().map_or(0.0, DamageFeedback::timer)
    }

    /// Whether a combatant's HP has reached zero.
    #[must_use]
    pub const fn fatal_hit(&self) -> bool {
        self.turn.fatal_hit
    }

    /// Whether the battle stopped accepting ticks.
    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// How the battle ended, once it has.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Winning side, once the battle has ended.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        self.outcome.map(|outcome| outcome.winner)
    }

    /// A combatant.
    #[must_use]
    pub const fn combatant(&self, side: Side) -> &Combatant {
        self.combatants.get(side)
    }

    /// The shared skill effect.
    #[must_use]
    pub const fn effect(&self) -> &SkillEffect {
        &self.effect
    }

    /// The shared skill effect, for hosts that finish its animation themselves.
    pub fn effect_mut(&mut self) -> &mut SkillEffect {
        &mut self.effect
    }

    /// Battle variant.
    #[must_use]
    pub const fn variant(&self) -> &BattleVariant {
        &self.variant
    }

    /// Stage layout in use.
    #[must_use]
    pub const fn layout(&self) -> &StageLayout {
        &self.layout
    }

    /// HUD adapter.
    #[must_use]
    pub const fn hud(&self) -> &H {
        &self.hud
    }

    /// Scene navigator.
    #[must_use]
    pub const fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Skill rotation counters.
    #[must_use]
    pub const fn rotation(&self) -> &SkillRotation {
        &self.rotation
    }

    /// Battle event bus.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Drain pending battle events.
    ///
    /// The bus holds a bounded backlog; hosts that embed the choreographer
    /// directly must drain it regularly or later events such as
    /// `BattleEnded` are dropped.
    pub fn drain_events(&self) -> Vec<BattleEvent> {
        self.events.drain()
    }

    /// Events lost because nobody drained the bus in time.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.events.dropped_count()
    }

    /// Ticks processed.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Seconds of battle time processed.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    // === Phase handlers ===

    fn tick_approach(&mut self) {
        let step = self.layout.approach_step;
        for side in Side::ALL {
            if !self.variant.approaches(side) {
                continue;
            }
            let stance = self.layout.stance(side);
            let direction = side.attack_direction();
            let combatant = self.combatants.get_mut(side);

            let x = combatant.position().x + step * direction;
            // never walk past the stance
            let x = if direction > 0.0 { x.min(stance.x) } else { x.max(stance.x) };
            combatant.set_position(Vec2::new(x, stance.y));
        }

        if self.combatants.player.position().x >= self.layout.engage_x {
            for side in Side::ALL {
                let stance = self.layout.stance(side);
                let combatant = self.combatants.get_mut(side);
                combatant.set_position(stance);
                combatant.set_animation_state(AnimationState::Stance);
            }
            self.enter(Phase::Patrolling);
        }
    }

    fn tick_patrol(&mut self, dt: f32) {
        let range = self.layout.patrol_range;
        for side in Side::ALL {
            let patrol = self.patrol.get_mut(side);
            patrol.offset += patrol.direction * self.layout.patrol_step;
            if patrol.offset >= range {
                patrol.offset = range;
                patrol.direction = -1.0;
            } else if patrol.offset <= -range {
                patrol.offset = -range;
                patrol.direction = 1.0;
            }

            let stance = self.layout.stance(side);
            self.combatants
                .get_mut(side)
                .set_position(Vec2::new(stance.x + patrol.offset, stance.y));
        }

        self.turn.turn_timer += dt;
        if threshold_reached(self.turn.turn_timer, self.layout.turn_interval) {
            self.turn.turn_timer = 0.0;
            self.dispatch_turn(self.turn.active_turn);
        }
    }

    fn dispatch_turn(&mut self, attacker: Side) {
        let selection = self.combatants.get(attacker).skill_selection();
        let skill = self.rotation.select(attacker, selection);

        let combatant = self.combatants.get_mut(attacker);
        combatant.telegraph(skill);
        if skill.uses_effect() {
            combatant.set_animation_state(AnimationState::Cast);
        } else {
            combatant.set_alpha(self.layout.strike_start_alpha);
            combatant.set_animation_state(AnimationState::Attack);
        }

        self.hud.highlight_skill_slot(skill, attacker);
        self.hud
            .spawn_highlight_glow(self.layout.slot_position(attacker, skill));
        *self.highlighted.get_mut(attacker) = Some(skill);

        self.turn.active_turn = attacker;
        self.turn.is_fighting = true;
        self.strike = Some(StrikeInFlight {
            attacker,
            skill,
            travelled: 0.0,
        });

        info!(%attacker, %skill, tick = self.ticks, "turn dispatched");
        self.events
            .publish(BattleEvent::TurnDispatched { attacker, skill });
        self.enter(Phase::Attacking);
    }

    fn tick_attack(&mut self) {
        let Some(mut strike) = self.strike.take() else {
            warn!("attacking without a strike in flight");
            self.turn.is_fighting = false;
            self.enter(Phase::Patrolling);
            return;
        };

        let landed = if strike.skill.uses_effect() {
            self.advance_effect_strike(&strike)
        } else {
            self.advance_melee_strike(&mut strike)
        };

        if landed {
            self.land_strike(strike);
        } else {
            self.strike = Some(strike);
        }
    }

    fn advance_melee_strike(&mut self, strike: &mut StrikeInFlight) -> bool {
        let step = self.layout.strike_step;
        let attacker = self.combatants.get_mut(strike.attacker);

        let position = attacker.position();
        attacker.set_position(Vec2::new(
            position.x + step * strike.attacker.attack_direction(),
            position.y,
        ));
        let alpha = attacker.visual().alpha;
        attacker.set_alpha(alpha + self.layout.strike_alpha_step);

        strike.travelled += step;
        strike.travelled >= self.layout.strike_travel
    }

    fn advance_effect_strike(&mut self, strike: &StrikeInFlight) -> bool {
        let origin = self.combatants.get(strike.attacker).position();
        let target = self.combatants.get(strike.attacker.opposite()).position();
        let step = self.layout.effect_step(strike.skill);

        let Some(mut lease) = self.effect.lease(strike.attacker) else {
            debug!(attacker = %strike.attacker, "skill effect still held by the other side");
            return false;
        };

        let engaged = self.turn.attacker_engaged.get_mut(strike.attacker);
        if *engaged {
            lease.travel(step);
        } else {
            lease.trigger(
                strike.skill,
                strike.attacker.attack_direction(),
                origin,
                target,
            );
            *engaged = true;
        }
        lease.is_finished()
    }

    fn land_strike(&mut self, strike: StrikeInFlight) {
        let attacker = strike.attacker;
        let defender = attacker.opposite();

        self.effect.clear_finished();
        *self.turn.attacker_engaged.get_mut(attacker) = false;

        let strikes_needed = self.combatants.get(attacker).strike_count();
        let landed = self.turn.strikes_landed.get_mut(attacker);
        *landed += 1;
        let final_strike = *landed >= strikes_needed;

        let target = self.combatants.get_mut(defender);
        let mut damage = strike_damage(target.max_hp(), strikes_needed);
        if final_strike {
            // The last of the derived strikes always finishes the job.
            damage = damage.max(target.current_hp());
        }
        let dealt = target.apply_damage(damage);
        let defender_hp = target.current_hp();
        self.refresh_hp_bars();

        let stance = self.layout.stance(attacker);
        let combatant = self.combatants.get_mut(attacker);
        combatant.set_position(stance);
        combatant.set_alpha(1.0);
        combatant.set_animation_state(AnimationState::Stance);
        *self.patrol.get_mut(attacker) = PatrolState::default();

        self.turn.active_turn = defender;
        self.turn.is_fighting = false;

        info!(
            %attacker,
            skill = %strike.skill,
            damage = dealt,
            defender_hp,
            "strike landed"
        );
        self.events.publish(BattleEvent::StrikeLanded {
            attacker,
            skill: strike.skill,
            damage: dealt,
            defender_hp,
        });

        let feedback = DamageFeedback::begin(defender, &mut self.combatants, &self.layout);
        if let Some(defeated) = feedback.defeated() {
            self.turn.fatal_hit = true;
            info!(%defeated, "fatal hit");
            self.events.publish(BattleEvent::FatalHit { defeated });
        }
        self.feedback = Some(feedback);
        self.enter(Phase::DamageFeedback);
    }

    fn tick_feedback(&mut self, dt: f32) {
        let Some(mut feedback) = self.feedback.take() else {
            warn!("damage feedback phase without feedback state");
            self.enter(Phase::Patrolling);
            return;
        };

        match feedback.advance(dt, &mut self.combatants, &self.layout) {
            FeedbackStep::Continue => self.feedback = Some(feedback),
            FeedbackStep::Complete => self.finish_damage_cycle(&feedback),
        }
    }

    fn finish_damage_cycle(&mut self, feedback: &DamageFeedback) {
        for side in Side::ALL {
            let stance = self.layout.stance(side);
            let combatant = self.combatants.get_mut(side);
            combatant.reset_to_stance(stance);
            combatant.clear_telegraph();
            *self.patrol.get_mut(side) = PatrolState::default();

            if let Some(skill) = self.highlighted.get_mut(side).take() {
                self.hud.clear_skill_slot(skill, side);
            }
        }
        self.effect.reset();

        let Some(defeated) = feedback.defeated() else {
            self.enter(Phase::Patrolling);
            return;
        };

        let outcome = Outcome {
            winner: defeated.opposite(),
            ticks: self.ticks,
            elapsed: self.elapsed,
        };
        self.outcome = Some(outcome);
        self.torn_down = true;
        self.navigator.pop_current_scene();

        info!(
            winner = %outcome.winner,
            ticks = outcome.ticks,
            elapsed = outcome.elapsed,
            "battle ended"
        );
        self.events.publish(BattleEvent::BattleEnded {
            winner: outcome.winner,
            ticks: outcome.ticks,
        });
    }

    fn refresh_hp_bars(&mut self) {
        for side in Side::ALL {
            let combatant = self.combatants.get(side);
            self.hud
                .set_hp_bar(side, combatant.current_hp(), combatant.max_hp());
        }
    }

    fn enter(&mut self, phase: Phase) {
        if self.phase == phase {
            return;
        }
        debug!(from = ?self.phase, to = ?phase, tick = self.ticks, "phase change");
        self.events.publish(BattleEvent::PhaseChanged {
            from: self.phase,
            to: phase,
        });
        self.phase = phase;
    }
}
