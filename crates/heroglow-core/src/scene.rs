//! Scene selection and animation speed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which hero background is mounted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Drifting glow points inside a wrapping cube.
    Particles,
    /// Animated lattice with pulses running along its lines.
    Geometric,
    /// Laser beams carrying data packets between random endpoints.
    #[default]
    Dataflow,
}

impl SceneKind {
    /// All scene kinds, in cycling order.
    pub const ALL: [SceneKind; 3] = [
        SceneKind::Particles,
        SceneKind::Geometric,
        SceneKind::Dataflow,
    ];

    /// Cycle to the next scene.
    pub fn next(self) -> Self {
        match self {
            SceneKind::Particles => SceneKind::Geometric,
            SceneKind::Geometric => SceneKind::Dataflow,
            SceneKind::Dataflow => SceneKind::Particles,
        }
    }

    /// Lowercase identifier used by the config file and the CLI.
    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Particles => "particles",
            SceneKind::Geometric => "geometric",
            SceneKind::Dataflow => "dataflow",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "particles" => Ok(SceneKind::Particles),
            "geometric" => Ok(SceneKind::Geometric),
            "dataflow" => Ok(SceneKind::Dataflow),
            other => Err(format!(
                "unknown scene '{other}' (expected particles, geometric or dataflow)"
            )),
        }
    }
}

/// Global playback speed of the hero animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    /// Cycle to the next speed.
    pub fn next(self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Medium,
            AnimationSpeed::Medium => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }

    /// Multiplier applied to the host-supplied frame delta.
    pub fn time_scale(self) -> f32 {
        match self {
            AnimationSpeed::Slow => 0.5,
            AnimationSpeed::Medium => 1.0,
            AnimationSpeed::Fast => 1.75,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Medium => "medium",
            AnimationSpeed::Fast => "fast",
        }
    }
}

impl fmt::Display for AnimationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(AnimationSpeed::Slow),
            "medium" => Ok(AnimationSpeed::Medium),
            "fast" => Ok(AnimationSpeed::Fast),
            other => Err(format!(
                "unknown speed '{other}' (expected slow, medium or fast)"
            )),
        }
    }
}
