//! Per-scene knobs that are not part of the scene selector itself.

use serde::{Deserialize, Serialize};

/// Upper bound on live entities in one scene.
pub const MAX_ENTITIES: u32 = 4096;

/// Logical canvas size for a synthesized texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

impl TextureSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Tuning shared by every scene kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneTuning {
    /// Entities created at time zero (capped by the scene's maximum).
    pub seed_count: u32,
    /// Canvas used for beam textures.
    pub beam_texture: TextureSize,
    /// Canvas used for particle sprites.
    pub sprite_texture: TextureSize,
}

impl Default for SceneTuning {
    fn default() -> Self {
        Self {
            seed_count: 2,
            beam_texture: TextureSize::new(256, 64),
            sprite_texture: TextureSize::new(32, 32),
        }
    }
}
