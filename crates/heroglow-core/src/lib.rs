//! Core types shared by the heroglow crates.
//!
//! Scene selection, animation speed, colors, per-scene tuning and the error
//! taxonomy of the animation subsystem live here so that the configuration
//! layer and the simulation can agree on them without depending on each other.

mod color;
mod error;
mod scene;
mod tuning;

pub use color::Rgb;
pub use error::SceneError;
pub use scene::{AnimationSpeed, SceneKind};
pub use tuning::{MAX_ENTITIES, SceneTuning, TextureSize};
