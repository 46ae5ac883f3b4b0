//! # Duel Gameplay
//!
//! Battle systems for the Duel engine.
//!
//! This crate provides the frame-driven battle layer:
//! - Combatants with stats, HP and visual state
//! - Strike count resolution from attack power and max HP
//! - Skill rotation and boss skill overrides
//! - The shared skill effect and its per-turn lease
//! - Damage feedback (bounce, fade, shrink)
//! - The turn choreographer state machine
//! - HUD and scene navigation boundaries
//! - Event bus for battle notifications

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod choreographer;
pub mod combatant;
pub mod events;
pub mod feedback;
pub mod hud;
pub mod navigation;
pub mod roster;
pub mod skill_effect;
pub mod skill_rotation;
pub mod stage;
pub mod stat_resolver;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::choreographer::*;
    pub use crate::combatant::*;
    pub use crate::events::*;
    pub use crate::feedback::*;
    pub use crate::hud::*;
    pub use crate::navigation::*;
    pub use crate::roster::*;
    pub use crate::skill_effect::*;
    pub use crate::skill_rotation::*;
    pub use crate::stage::*;
    pub use crate::stat_resolver::*;
}

pub use prelude::*;
