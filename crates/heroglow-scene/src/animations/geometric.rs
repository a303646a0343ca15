//! Geometric scene: an animated lattice with pulses running along its lines.

use std::f32::consts::TAU;

use glam::Vec3;
use heroglow_core::Rgb;
use rand::Rng;
use serde::Serialize;

use crate::chars::{LATTICE_CROSS, LATTICE_H, LATTICE_V};
use crate::color::Tier;
use crate::geometry::{BeamGeometry, BeamTransform};
use crate::pool::{Entity, EntityId, Lifecycle, Pool};
use crate::render::{BeamDraw, Canvas, WORLD_HALF_HEIGHT, WORLD_HALF_WIDTH, draw_beam};
use crate::scheduler::SpawnWindow;
use crate::state::Archetype;
use crate::texture::TextureMode;

/// Spacing between lattice lines, in world units.
pub const LATTICE_STEP: f32 = 1.5;

/// Period of the brightness sweep across the lattice.
const SWEEP_PERIOD_MS: f64 = 6000.0;
const PULSE_WIDTH: f32 = 0.03;
const BASE_SPEED: f32 = 0.9;

/// Which lattice direction a pulse runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A short bright segment travelling along one lattice line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridPulse {
    pub life: Lifecycle,
    pub axis: Axis,
    pub color: Rgb,
    geometry: BeamGeometry,
}

impl GridPulse {
    pub fn origin(&self) -> Vec3 {
        self.geometry.origin()
    }

    pub fn target(&self) -> Vec3 {
        self.geometry.target()
    }

    pub fn transform(&self) -> &BeamTransform {
        self.geometry.transform()
    }
}

impl Entity for GridPulse {
    fn lifecycle(&self) -> &Lifecycle {
        &self.life
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.life
    }
}

/// Number of lattice lines on each side of the origin that fit in `half_extent`.
fn lines_within(half_extent: f32) -> i32 {
    (half_extent / LATTICE_STEP).floor() as i32
}

impl Archetype for GridPulse {
    const DECAY_RATE: f32 = 0.5;
    const SPAWN_WINDOW: SpawnWindow = SpawnWindow::new(400.0, 800.0);

    fn create<R: Rng + ?Sized>(id: EntityId, now_ms: f64, rng: &mut R) -> Self {
        let tier = Tier::pick(rng);
        let axis = if rng.gen_bool(0.5) {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };

        let nx = lines_within(WORLD_HALF_WIDTH);
        let ny = lines_within(WORLD_HALF_HEIGHT);
        let span = rng.gen_range(2..=4) as f32 * LATTICE_STEP;
        let forward = rng.gen_bool(0.5);

        let (origin, target) = match axis {
            Axis::Horizontal => {
                let y = rng.gen_range(-ny..=ny) as f32 * LATTICE_STEP;
                let x = rng.gen_range(-nx..=nx) as f32 * LATTICE_STEP;
                let end = if forward { x + span } else { x - span };
                (Vec3::new(x, y, 0.0), Vec3::new(end, y, 0.0))
            }
            Axis::Vertical => {
                let x = rng.gen_range(-nx..=nx) as f32 * LATTICE_STEP;
                let y = rng.gen_range(-ny..=ny) as f32 * LATTICE_STEP;
                let end = if forward { y + span } else { y - span };
                (Vec3::new(x, y, 0.0), Vec3::new(x, end, 0.0))
            }
        };

        GridPulse {
            life: Lifecycle::new(
                id,
                BASE_SPEED * tier.speed_multiplier(),
                Self::DECAY_RATE,
                now_ms,
            ),
            axis,
            color: tier.color(),
            geometry: BeamGeometry::new(origin, target, PULSE_WIDTH),
        }
    }
}

/// Brightness and color of the lattice at a world point.
fn sweep(x: f32, y: f32, now_ms: f64) -> (f32, Rgb) {
    let phase = ((now_ms % SWEEP_PERIOD_MS) / SWEEP_PERIOD_MS) as f32;
    let wave = ((x * 0.35 + y * 0.2) - phase * TAU).sin() * 0.5 + 0.5;
    let color = Rgb::from_hsl(210.0 + wave * 50.0, 0.6, 0.35 + wave * 0.15);
    (0.08 + 0.14 * wave, color)
}

/// Draw the static lattice with its travelling brightness sweep.
pub fn draw_lattice(canvas: &mut Canvas, now_ms: f64) {
    let viewport = canvas.viewport();
    let half = viewport.cell_size() * 0.5;
    for row in 0..viewport.rows {
        for col in 0..viewport.cols {
            let p = viewport.cell_center(col, row);
            let near_v = (p.x - (p.x / LATTICE_STEP).round() * LATTICE_STEP).abs() <= half.x;
            let near_h = (p.y - (p.y / LATTICE_STEP).round() * LATTICE_STEP).abs() <= half.y;
            let glyph = match (near_v, near_h) {
                (true, true) => LATTICE_CROSS,
                (true, false) => LATTICE_V,
                (false, true) => LATTICE_H,
                (false, false) => continue,
            };
            let (intensity, color) = sweep(p.x, p.y, now_ms);
            canvas.stamp(col, row, glyph, intensity, color);
        }
    }
}

/// Draw every live pulse; the segment's head is where the packet sits.
pub fn draw(pool: &Pool<GridPulse>, mode: &TextureMode, canvas: &mut Canvas) {
    for pulse in pool.iter() {
        draw_beam(
            canvas,
            mode,
            &BeamDraw {
                transform: *pulse.transform(),
                color: pulse.color,
                opacity: pulse.life.visible_opacity(),
                packet: Some(pulse.life.progress.min(1.0)),
            },
        );
    }
}
