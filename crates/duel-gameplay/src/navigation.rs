//! Scene navigation boundary.

/// Host scene stack the battle reports its end to.
pub trait SceneNavigator {
    /// Leave the battle scene. Called once, when the fatal hit resolves.
    fn pop_current_scene(&mut self);
}

/// Navigator that counts pop requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordingNavigator {
    pops: u32,
}

impl RecordingNavigator {
    /// Creates a navigator with no recorded pops.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `pop_current_scene` calls received.
    #[must_use]
    pub const fn pops(&self) -> u32 {
        self.pops
    }
}

impl SceneNavigator for RecordingNavigator {
    fn pop_current_scene(&mut self) {
        self.pops += 1;
    }
}
