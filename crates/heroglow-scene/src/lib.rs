//! Procedural hero animations for the terminal.
//!
//! A scene is a pool of short-lived entities (drifting particles, laser
//! beams or lattice pulses) that fade out and are replaced on a randomized
//! schedule. The simulation in [`SceneState`] is pure: every tick takes the
//! previous state plus a time delta and an injected RNG and returns the next
//! state. [`HeroScene`] wraps it for a host render loop and rasterises
//! snapshots into ratatui cells.

pub mod animations;
mod chars;
mod color;
pub mod geometry;
mod hero;
pub mod pool;
pub mod render;
pub mod scheduler;
mod state;
pub mod texture;

pub use color::Tier;
pub use hero::{HeroScene, MAX_FRAME_DT};
pub use pool::{Entity, EntityId, Lifecycle, Pool};
pub use render::{Canvas, rasterize};
pub use scheduler::{SpawnScheduler, SpawnWindow};
pub use state::{Archetype, ScenePool, SceneState};
pub use texture::{Texture, TextureMode, synthesize_beam, synthesize_sprite};
