//! Tick scheduling.
//!
//! Clamps frame deltas before they reach a battle and tracks which battles
//! are registered to receive ticks.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Instant;

use crate::config::BattleConfig;

/// Handle of a registered tick listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Frame timing and tick listener registry.
#[derive(Debug)]
pub struct TickScheduler {
    /// Fixed delta for simulated frames
    frame_dt: f32,
    /// Maximum delta time to keep a long stall from skipping choreography
    max_dt: f32,
    /// Time of the last measured frame
    last_frame: Instant,
    /// Registered listeners
    listeners: BTreeSet<ListenerId>,
    /// Next id to hand out
    next_id: u64,
    /// Frames dispatched
    frames: u64,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(60, 0.25)
    }
}

impl TickScheduler {
    /// Create a scheduler for `target_fps` with deltas clamped to `max_dt`.
    #[must_use]
    pub fn new(target_fps: u32, max_dt: f32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            frame_dt: 1.0 / target_fps as f32,
            max_dt: max_dt.max(0.001),
            last_frame: Instant::now(),
            listeners: BTreeSet::new(),
            next_id: 1,
            frames: 0,
        }
    }

    /// Create a scheduler from the timing section of a config.
    #[must_use]
    pub fn from_config(config: &BattleConfig) -> Self {
        Self::new(config.target_fps, config.max_dt)
    }

    /// Fixed delta for simulated frames.
    #[must_use]
    pub const fn frame_dt(&self) -> f32 {
        self.frame_dt
    }

    /// Largest delta handed to listeners.
    #[must_use]
    pub const fn max_dt(&self) -> f32 {
        self.max_dt
    }

    /// Wall-clock delta since the previous call, clamped.
    pub fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.clamp_dt(dt)
    }

    /// Clamp a frame delta into `0..=max_dt`. Non-finite deltas become zero.
    #[must_use]
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }

    /// Register a listener and return its handle.
    pub fn register(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id);
        id
    }

    /// Stop delivering ticks to `id`. Returns whether it was registered.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id)
    }

    /// Whether `id` currently receives ticks.
    #[must_use]
    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.contains(&id)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Count one dispatched frame.
    pub fn record_frame(&mut self) {
        self.frames += 1;
    }

    /// Frames dispatched so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_frame_dt_from_fps() {
        let scheduler = TickScheduler::new(50, 0.25);
        assert!((scheduler.frame_dt() - 0.02).abs() < f32::EPSILON);

        let scheduler = TickScheduler::new(0, 0.25);
        assert!((scheduler.frame_dt() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_register_unregister() {
        let mut scheduler = TickScheduler::default();
        let first = scheduler.register();
        let second = scheduler.register();
        assert_ne!(first, second);
        assert_eq!(scheduler.listener_count(), 2);

        assert!(scheduler.unregister(first));
        assert!(!scheduler.is_registered(first));
        assert!(scheduler.is_registered(second));
        assert!(!scheduler.unregister(first));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut scheduler = TickScheduler::default();
        let first = scheduler.register();
        scheduler.unregister(first);
        assert_ne!(scheduler.register(), first);
    }

    #[test]
    fn test_delta_time_is_clamped() {
        let mut scheduler = TickScheduler::new(60, 0.1);
        let dt = scheduler.delta_time();
        assert!((0.0..=0.1).contains(&dt));
    }

    #[test]
    fn test_non_finite_delta_is_zero() {
        let scheduler = TickScheduler::default();
        assert!(scheduler.clamp_dt(f32::NAN).abs() < f32::EPSILON);
        assert!(scheduler.clamp_dt(f32::INFINITY).abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_clamped_delta_in_range(dt in -10.0f32..10.0, max_dt in 0.001f32..1.0) {
            let scheduler = TickScheduler::new(60, max_dt);
            let clamped = scheduler.clamp_dt(dt);
            prop_assert!(clamped >= 0.0);
            prop_assert!(clamped <= scheduler.max_dt());
        }
    }
}
