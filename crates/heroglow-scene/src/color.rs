//! Palette and color utility functions for hero animations.

use heroglow_core::Rgb;
use rand::Rng;
use serde::Serialize;

/// Weighted palette tier an entity is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    /// 70% of spawns.
    Standard,
    /// 20% of spawns; also travels faster.
    Fast,
    /// 10% of spawns.
    Accent,
}

impl Tier {
    /// Pick a tier from a uniform roll in 0.0-1.0.
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.7 {
            Tier::Standard
        } else if roll < 0.9 {
            Tier::Fast
        } else {
            Tier::Accent
        }
    }

    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_roll(rng.r#gen::<f32>())
    }

    pub fn color(self) -> Rgb {
        match self {
            Tier::Standard => Rgb(64, 156, 255), // Azure
            Tier::Fast => Rgb(0, 229, 255),      // Electric cyan
            Tier::Accent => Rgb(186, 104, 255),  // Violet
        }
    }

    /// Multiplier on the archetype's base speed.
    pub fn speed_multiplier(self) -> f32 {
        match self {
            Tier::Standard => 1.0,
            Tier::Fast => 1.8,
            Tier::Accent => 1.2,
        }
    }
}
