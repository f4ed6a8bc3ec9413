//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or file I/O

pub mod collision;
pub mod geometry;
pub mod level;
pub mod particles;
pub mod patrol;
pub mod state;
pub mod tick;

pub use collision::{BodySignals, DynamicBody, step_body};
pub use geometry::{Aabb, StaticGeometry};
pub use level::{LEVEL_1, LEVEL_2, LevelError, LevelLayout, LevelMode, builtin, parse_level};
pub use particles::{BurstKind, Particle, ParticleSystem, ParticleView, Rgb};
pub use patrol::{Enemy, RescueKind, update_ai};
pub use state::{
    Entity, EntityKind, EntityTag, EntityView, GameEvent, Intent, LevelSession, MoveIntent,
    Player, SessionStatus, Snapshot,
};
pub use tick::{TickInput, tick};
