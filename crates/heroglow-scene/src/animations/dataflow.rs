//! Dataflow scene: laser bursts carrying a bright packet from origin to target.

use glam::Vec3;
use heroglow_core::Rgb;
use rand::Rng;
use serde::Serialize;

use crate::color::Tier;
use crate::geometry::{BeamGeometry, BeamTransform};
use crate::pool::{Entity, EntityId, Lifecycle, Pool};
use crate::render::{BeamDraw, Canvas, WORLD_HALF_HEIGHT, WORLD_HALF_WIDTH, draw_beam};
use crate::scheduler::SpawnWindow;
use crate::state::Archetype;
use crate::texture::TextureMode;

/// Packet trips per second along a standard beam.
const BASE_SPEED: f32 = 0.6;
/// Shortest beam worth drawing, in world units.
const MIN_LENGTH: f32 = 3.0;
const WIDTH_RANGE: (f32, f32) = (0.02, 0.05);

/// A single laser beam.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Laser {
    pub life: Lifecycle,
    pub tier: Tier,
    pub color: Rgb,
    geometry: BeamGeometry,
}

impl Laser {
    pub fn origin(&self) -> Vec3 {
        self.geometry.origin()
    }

    pub fn target(&self) -> Vec3 {
        self.geometry.target()
    }

    pub fn width(&self) -> f32 {
        self.geometry.width()
    }

    pub fn transform(&self) -> &BeamTransform {
        self.geometry.transform()
    }

    /// Where the packet currently sits along the beam (0.0-1.0).
    pub fn packet(&self) -> f32 {
        self.life.progress.fract()
    }
}

impl Entity for Laser {
    fn lifecycle(&self) -> &Lifecycle {
        &self.life
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.life
    }
}

fn random_point<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.gen_range(-WORLD_HALF_WIDTH..=WORLD_HALF_WIDTH),
        rng.gen_range(-WORLD_HALF_HEIGHT..=WORLD_HALF_HEIGHT),
        rng.gen_range(-1.0..=1.0),
    )
}

impl Archetype for Laser {
    const DECAY_RATE: f32 = 0.4;
    const SPAWN_WINDOW: SpawnWindow = SpawnWindow::new(800.0, 1500.0);

    fn create<R: Rng + ?Sized>(id: EntityId, now_ms: f64, rng: &mut R) -> Self {
        let tier = Tier::pick(rng);
        let origin = random_point(rng);
        let mut target = random_point(rng);
        // A handful of redraws; the last candidate is kept either way.
        for _ in 0..8 {
            if (target - origin).truncate().length() >= MIN_LENGTH {
                break;
            }
            target = random_point(rng);
        }
        let width = rng.gen_range(WIDTH_RANGE.0..=WIDTH_RANGE.1);

        Laser {
            life: Lifecycle::new(
                id,
                BASE_SPEED * tier.speed_multiplier(),
                Self::DECAY_RATE,
                now_ms,
            ),
            tier,
            color: tier.color(),
            geometry: BeamGeometry::new(origin, target, width),
        }
    }
}

/// Draw every live laser.
pub fn draw(pool: &Pool<Laser>, mode: &TextureMode, canvas: &mut Canvas) {
    for laser in pool.iter() {
        draw_beam(
            canvas,
            mode,
            &BeamDraw {
                transform: *laser.transform(),
                color: laser.color,
                opacity: laser.life.visible_opacity(),
                packet: Some(laser.packet()),
            },
        );
    }
}
