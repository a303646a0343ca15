//! Particle field: glowing points drifting inside a wrapping cube.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use heroglow_core::Rgb;
use rand::Rng;
use serde::Serialize;

use crate::color::Tier;
use crate::geometry::{PARTICLE_BOUNDS, clamp_point_size, point_size, wrap_position};
use crate::pool::{Entity, EntityId, Lifecycle, Pool};
use crate::render::{Canvas, draw_sprite};
use crate::scheduler::SpawnWindow;
use crate::state::Archetype;
use crate::texture::TextureMode;

/// Distance from the cube centre to the camera along +z.
pub const CAMERA_Z: f32 = 10.0;

/// Time a new particle takes to fade in.
const FADE_IN_MS: f64 = 500.0;
const DRIFT_SPEED: (f32, f32) = (0.2, 0.6);
const BASE_SIZE: (f32, f32) = (12.0, 30.0);

/// A single drifting particle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub life: Lifecycle,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Pulsation phase offset, radians.
    pub phase: f32,
    pub base_size: f32,
    pub color: Rgb,
}

impl Entity for Particle {
    fn lifecycle(&self) -> &Lifecycle {
        &self.life
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.life
    }

    fn advance(&mut self, dt: f32) {
        self.life.advance(dt);
        self.position = wrap_position(self.position + self.velocity * dt, PARTICLE_BOUNDS);
    }
}

impl Archetype for Particle {
    const DECAY_RATE: f32 = 0.12;
    const SPAWN_WINDOW: SpawnWindow = SpawnWindow::new(120.0, 300.0);

    fn create<R: Rng + ?Sized>(id: EntityId, now_ms: f64, rng: &mut R) -> Self {
        let tier = Tier::pick(rng);
        let b = PARTICLE_BOUNDS;
        let position = Vec3::new(
            rng.gen_range(-b..b),
            rng.gen_range(-b..b),
            rng.gen_range(-b..b),
        );
        // Uniform direction on the unit sphere.
        let z: f32 = rng.gen_range(-1.0..=1.0);
        let theta: f32 = rng.gen_range(0.0..TAU);
        let r = (1.0 - z * z).sqrt();
        let dir = Vec3::new(r * theta.cos(), r * theta.sin(), z);
        let speed = rng.gen_range(DRIFT_SPEED.0..=DRIFT_SPEED.1) * tier.speed_multiplier();

        Particle {
            // Progress tracks age in seconds for particles.
            life: Lifecycle::new(id, 1.0, Self::DECAY_RATE, now_ms),
            position,
            velocity: dir * speed,
            phase: rng.gen_range(0.0..TAU),
            base_size: rng.gen_range(BASE_SIZE.0..=BASE_SIZE.1),
            color: tier.color(),
        }
    }
}

/// Perspective projection onto the world plane: `(screen point, depth)`.
pub fn project(position: Vec3) -> (Vec2, f32) {
    let depth = CAMERA_Z - position.z;
    let scale = CAMERA_Z / depth;
    (position.truncate() * scale, depth)
}

/// Draw every live particle.
pub fn draw(pool: &Pool<Particle>, mode: &TextureMode, canvas: &mut Canvas, now_ms: f64) {
    let time_s = (now_ms / 1000.0) as f32;
    for particle in pool.iter() {
        let (screen, depth) = project(particle.position);
        let size = clamp_point_size(point_size(
            particle.base_size,
            time_s,
            particle.phase,
            depth,
        ));
        let fade_in = (particle.life.age_ms(now_ms) / FADE_IN_MS).min(1.0) as f32;
        let opacity = particle.life.visible_opacity() * fade_in;
        draw_sprite(canvas, mode, screen, size, particle.color, opacity);
    }
}
