//! # Duel Engine
//!
//! Host side of the Duel battle engine.
//!
//! This crate ties the battle layer to a running program:
//! - Configuration loaded from TOML
//! - Tick scheduling with clamped frame deltas
//! - A shared HUD model behind a mutex
//! - A scene stack that drives battles and removes them when they end
//! - A tracing sprite for headless runs

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod hud_state;
pub mod scene;
pub mod scheduler;
pub mod sprite;


/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::hud_state::*;
    pub use crate::scene::*;
    pub use crate::scheduler::*;
    pub use crate::sprite::*;
}

pub use prelude::*;
