//! Scene stack hosting battles.
//!
//! Each pushed battle is registered with the [`TickScheduler`] and receives
//! a [`ChannelNavigator`]. When a battle signals its end, the navigator
//! queues a [`SceneCommand`]; the stack applies it after the tick, first
//! unregistering the battle's listener and only then dropping the battle.

use crossbeam_channel::{unbounded, Receiver, Sender};
use duel_common::DuelResult;
use duel_gameplay::{BattleEvent, BattleSetup, Outcome, SceneNavigator, TurnChoreographer};
use tracing::{debug, info, warn};

use crate::hud_state::{HudState, SharedHud};
use crate::scheduler::{ListenerId, TickScheduler};

/// Battle as hosted by the scene stack.
pub type HostedBattle = TurnChoreographer<SharedHud, ChannelNavigator>;

/// Request from a scene to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    /// Remove the scene owning `listener`
    Pop {
        /// Listener of the scene to remove
        listener: ListenerId,
    },
}

/// Scene navigator that forwards pop requests to the stack.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    listener: ListenerId,
    sender: Sender<SceneCommand>,
}

impl ChannelNavigator {
    /// Navigator for the scene owning `listener`.
    #[must_use]
    pub fn new(listener: ListenerId, sender: Sender<SceneCommand>) -> Self {
        Self { listener, sender }
    }

    /// Listener of the owning scene.
    #[must_use]
    pub const fn listener(&self) -> ListenerId {
        self.listener
    }
}

impl SceneNavigator for ChannelNavigator {
    fn pop_current_scene(&mut self) {
        let command = SceneCommand::Pop {
            listener: self.listener,
        };
        if self.sender.send(command).is_err() {
            warn!(listener = %self.listener, "scene stack gone, pop request dropped");
        }
    }
}

/// A battle that left the stack.
#[derive(Debug, Clone)]
pub struct FinishedBattle {
    /// Listener the battle was registered under
    pub listener: ListenerId,
    /// How it ended; `None` when it was torn down externally
    pub outcome: Option<Outcome>,
    /// Every event the battle published
    pub transcript: Vec<BattleEvent>,
    /// Final HUD state
    pub hud: HudState,
}

#[derive(Debug)]
struct BattleScene {
    listener: ListenerId,
    battle: HostedBattle,
    hud: SharedHud,
    transcript: Vec<BattleEvent>,
}

impl BattleScene {
    fn collect_events(&mut self) {
        self.transcript.extend(self.battle.drain_events());
    }

    fn finish(mut self) -> FinishedBattle {
        self.collect_events();
        FinishedBattle {
            listener: self.listener,
            outcome: self.battle.outcome(),
            transcript: self.transcript,
            hud: self.hud.snapshot(),
        }
    }
}

/// Stack of battle scenes driven by a shared scheduler.
#[derive(Debug)]
pub struct SceneStack {
    scheduler: TickScheduler,
    scenes: Vec<BattleScene>,
    sender: Sender<SceneCommand>,
    receiver: Receiver<SceneCommand>,
    finished: Vec<FinishedBattle>,
}

impl Default for SceneStack {
    fn default() -> Self {
        Self::new(TickScheduler::default())
    }
}

impl SceneStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new(scheduler: TickScheduler) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            scheduler,
            scenes: Vec::new(),
            sender,
            receiver,
            finished: Vec::new(),
        }
    }

    /// Set up a battle, register it for ticks and push it.
    pub fn push_battle(&mut self, setup: BattleSetup) -> DuelResult<ListenerId> {
        let listener = self.scheduler.register();
        let hud = SharedHud::new();
        let navigator = ChannelNavigator::new(listener, self.sender.clone());

        let battle = match TurnChoreographer::setup(setup, hud.clone(), navigator) {
            Ok(battle) => battle,
            Err(e) => {
                self.scheduler.unregister(listener);
                warn!(%listener, "battle setup failed: {e}");
                return Err(e);
            },
        };

        info!(%listener, depth = self.scenes.len() + 1, "battle pushed");
        self.scenes.push(BattleScene {
            listener,
            battle,
            hud,
            transcript: Vec::new(),
        });
        Ok(listener)
    }

    /// Drive every registered battle by one frame, then apply scene commands.
    ///
    /// Returns the number of battles that left the stack.
    pub fn tick(&mut self, dt: f32) -> usize {
        let dt = self.scheduler.clamp_dt(dt);
        self.scheduler.record_frame();

        for scene in &mut self.scenes {
            if !self.scheduler.is_registered(scene.listener) {
                continue;
            }
            if let Err(e) = scene.battle.advance(dt) {
                debug!(listener = %scene.listener, "tick rejected: {e}");
            }
            scene.hud.update(dt);
            scene.collect_events();
        }

        self.apply_commands()
    }

    /// Tear down and remove the top battle.
    pub fn pop_battle(&mut self) -> Option<&FinishedBattle> {
        let mut scene = self.scenes.pop()?;
        self.scheduler.unregister(scene.listener);
        scene.battle.teardown();
        info!(listener = %scene.listener, "battle popped");
        self.finished.push(scene.finish());
        self.finished.last()
    }

    fn apply_commands(&mut self) -> usize {
        let mut popped = 0;
        while let Ok(command) = self.receiver.try_recv() {
            match command {
                SceneCommand::Pop { listener } => {
                    let Some(index) = self.scenes.iter().position(|s| s.listener == listener) else {
                        debug!(%listener, "pop for a scene no longer on the stack");
                        continue;
                    };
                    // stop ticks before the battle is dropped
                    self.scheduler.unregister(listener);
                    let scene = self.scenes.remove(index);
                    let finished = scene.finish();
                    info!(
                        %listener,
                        winner = ?finished.outcome.map(|o| o.winner),
                        "battle finished"
                    );
                    self.finished.push(finished);
                    popped += 1;
                },
            }
        }
        popped
    }

    // === Accessors ===

    /// Number of battles on the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Top battle.
    #[must_use]
    pub fn current(&self) -> Option<&HostedBattle> {
        self.scenes.last().map(|scene| &scene.battle)
    }

    /// HUD snapshot of the top battle.
    #[must_use]
    pub fn current_hud(&self) -> Option<HudState> {
        self.scenes.last().map(|scene| scene.hud.snapshot())
    }

    /// Battles that left the stack, oldest first.
    #[must_use]
    pub fn finished(&self) -> &[FinishedBattle] {
        &self.finished
    }

    /// Tick scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }
}
