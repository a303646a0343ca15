//! Terminal renderer adapter.
//!
//! Entities are rasterised into a [`Canvas`] of character cells, which is then
//! turned into ratatui lines. The simulation never touches this module; it
//! only reads finished [`SceneState`] snapshots.

use glam::Vec2;
use heroglow_core::Rgb;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

use crate::animations::{dataflow, geometric, particles};
use crate::chars::glyph_for;
use crate::geometry::BeamTransform;
use crate::state::{ScenePool, SceneState};
use crate::texture::TextureMode;

/// Half-width of the visible world plane.
pub const WORLD_HALF_WIDTH: f32 = 8.0;
/// Half-height of the visible world plane.
pub const WORLD_HALF_HEIGHT: f32 = 4.5;

/// Intensity below which a cell is left blank.
const VISIBLE_THRESHOLD: f32 = 0.05;

/// Maps the world plane (y up) onto a grid of terminal cells (row 0 at the top).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// World-space size of one cell.
    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(
            2.0 * WORLD_HALF_WIDTH / self.cols.max(1) as f32,
            2.0 * WORLD_HALF_HEIGHT / self.rows.max(1) as f32,
        )
    }

    /// Fractional cell coordinates of a world point.
    pub fn world_to_cell(&self, p: Vec2) -> Vec2 {
        let cell = self.cell_size();
        Vec2::new(
            (p.x + WORLD_HALF_WIDTH) / cell.x,
            (WORLD_HALF_HEIGHT - p.y) / cell.y,
        )
    }

    /// World point at the centre of a cell.
    pub fn cell_center(&self, col: u16, row: u16) -> Vec2 {
        let cell = self.cell_size();
        Vec2::new(
            (col as f32 + 0.5) * cell.x - WORLD_HALF_WIDTH,
            WORLD_HALF_HEIGHT - (row as f32 + 0.5) * cell.y,
        )
    }

    /// Inclusive cell ranges covering a world-space box, or `None` if it is off screen.
    fn cells_covering(&self, min: Vec2, max: Vec2) -> Option<((u16, u16), (u16, u16))> {
        if self.cols == 0 || self.rows == 0 {
            return None;
        }
        let a = self.world_to_cell(min);
        let b = self.world_to_cell(max);
        let (c0, c1) = (a.x.min(b.x).floor(), a.x.max(b.x).floor());
        let (r0, r1) = (a.y.min(b.y).floor(), a.y.max(b.y).floor());
        if c1 < 0.0 || r1 < 0.0 || c0 >= self.cols as f32 || r0 >= self.rows as f32 {
            return None;
        }
        let clamp_c = |v: f32| v.clamp(0.0, (self.cols - 1) as f32) as u16;
        let clamp_r = |v: f32| v.clamp(0.0, (self.rows - 1) as f32) as u16;
        Some(((clamp_c(c0), clamp_c(c1)), (clamp_r(r0), clamp_r(r1))))
    }
}

/// One character cell of accumulated light.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cell {
    pub intensity: f32,
    pub color: Rgb,
    /// Fixed glyph (lattice lines) instead of the intensity ramp.
    pub glyph: Option<char>,
}

/// Cell buffer one frame is rasterised into.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    viewport: Viewport,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            viewport: Viewport::new(cols, rows),
            cells: vec![Cell::default(); cols as usize * rows as usize],
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn get(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.viewport.cols || row >= self.viewport.rows {
            return None;
        }
        self.cells
            .get(row as usize * self.viewport.cols as usize + col as usize)
    }

    fn cell_mut(&mut self, col: u16, row: u16) -> Option<&mut Cell> {
        if col >= self.viewport.cols || row >= self.viewport.rows {
            return None;
        }
        let idx = row as usize * self.viewport.cols as usize + col as usize;
        self.cells.get_mut(idx)
    }

    /// Add light to a cell. The brighter contribution decides the color.
    pub fn splat(&mut self, col: u16, row: u16, intensity: f32, color: Rgb) {
        if intensity <= 0.0 {
            return;
        }
        if let Some(cell) = self.cell_mut(col, row) {
            if intensity >= cell.intensity {
                cell.color = color;
                cell.glyph = None;
            }
            cell.intensity = (cell.intensity + intensity).min(1.0);
        }
    }

    /// Paint a fixed glyph unless something brighter is already there.
    pub fn stamp(&mut self, col: u16, row: u16, glyph: char, intensity: f32, color: Rgb) {
        if let Some(cell) = self.cell_mut(col, row) {
            if intensity > cell.intensity {
                *cell = Cell {
                    intensity,
                    color,
                    glyph: Some(glyph),
                };
            }
        }
    }

    /// Number of cells bright enough to be drawn.
    pub fn lit_cells(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.intensity >= VISIBLE_THRESHOLD)
            .count()
    }

    pub fn to_lines(&self) -> Vec<Line<'static>> {
        self.cells
            .chunks(self.viewport.cols.max(1) as usize)
            .map(|row| {
                let spans: Vec<Span> = row.iter().map(render_cell).collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn render_cell(cell: &Cell) -> Span<'static> {
    if cell.intensity < VISIBLE_THRESHOLD {
        return Span::raw(" ");
    }
    let Some(ch) = cell.glyph.or_else(|| glyph_for(cell.intensity)) else {
        return Span::raw(" ");
    };
    let Rgb(r, g, b) = cell.color.scale(0.35 + 0.65 * cell.intensity);
    Span::styled(ch.to_string(), Style::new().fg(Color::Rgb(r, g, b)))
}

/// A beam quad to rasterise.
#[derive(Debug, Clone, Copy)]
pub struct BeamDraw {
    pub transform: BeamTransform,
    pub color: Rgb,
    pub opacity: f32,
    /// Position of the bright packet along the beam (0.0-1.0), if any.
    pub packet: Option<f32>,
}

/// Rasterise a textured beam.
pub fn draw_beam(canvas: &mut Canvas, mode: &TextureMode, beam: &BeamDraw) {
    let viewport = canvas.viewport();
    let half_cell = viewport.cell_size() * 0.5;
    let transform = &beam.transform;

    let (min, max) = transform.bounds();
    let Some(((c0, c1), (r0, r1))) = viewport.cells_covering(min, max) else {
        return;
    };

    for row in r0..=r1 {
        for col in c0..=c1 {
            let quad = transform.to_quad_within(viewport.cell_center(col, row), half_cell);
            let alpha = mode.beam_alpha(quad.x, quad.y);
            if alpha <= 0.0 {
                continue;
            }
            let boost = beam.packet.map_or(0.0, |p| {
                let d = (quad.x - p) / 0.06;
                (-d * d).exp()
            });
            let intensity = alpha * beam.opacity * (0.55 + 0.9 * boost);
            let color = beam.color.lerp(Rgb::WHITE, boost * 0.6);
            canvas.splat(col, row, intensity, color);
        }
    }
}

/// Rasterise a round sprite of `size` cells across, centred on a world point.
pub fn draw_sprite(
    canvas: &mut Canvas,
    mode: &TextureMode,
    center: Vec2,
    size: f32,
    color: Rgb,
    opacity: f32,
) {
    let viewport = canvas.viewport();
    let cell = viewport.cell_size();
    // Terminal cells are roughly twice as tall as they are wide.
    let radius = Vec2::new((size * 0.5).max(0.5), (size * 0.25).max(0.5)) * cell;

    let Some(((c0, c1), (r0, r1))) = viewport.cells_covering(center - radius, center + radius)
    else {
        return;
    };

    for row in r0..=r1 {
        for col in c0..=c1 {
            let rel = (viewport.cell_center(col, row) - center) / radius;
            // rel is in -1..1 across the sprite; v grows downwards like the bitmap.
            let alpha = mode.sprite_alpha(rel.x * 0.5 + 0.5, 0.5 - rel.y * 0.5);
            canvas.splat(col, row, alpha * opacity, color);
        }
    }
}

/// Rasterise a full scene snapshot.
pub fn rasterize(state: &SceneState, mode: &TextureMode, cols: u16, rows: u16) -> Canvas {
    let mut canvas = Canvas::new(cols, rows);
    let now_ms = state.clock_ms();
    match state.pool() {
        ScenePool::Particles(pool) => particles::draw(pool, mode, &mut canvas, now_ms),
        ScenePool::Geometric(pool) => {
            geometric::draw_lattice(&mut canvas, now_ms);
            geometric::draw(pool, mode, &mut canvas);
        }
        ScenePool::Dataflow(pool) => dataflow::draw(pool, mode, &mut canvas),
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use heroglow_core::TextureSize;

    use crate::texture::synthesize_beam;

    #[test]
    fn test_viewport_round_trip() {
        let viewport = Viewport::new(80, 24);
        let center = viewport.cell_center(40, 12);
        let cell = viewport.world_to_cell(center);
        assert!((cell.x - 40.5).abs() < 1e-3);
        assert!((cell.y - 12.5).abs() < 1e-3);
        // y grows upwards in the world and downwards on screen.
        assert!(viewport.cell_center(0, 0).y > viewport.cell_center(0, 23).y);
    }

    #[test]
    fn test_splat_accumulates_and_clamps() {
        let mut canvas = Canvas::new(4, 4);
        canvas.splat(1, 1, 0.6, Rgb(10, 20, 30));
        canvas.splat(1, 1, 0.7, Rgb(40, 50, 60));
        let cell = canvas.get(1, 1).unwrap();
        assert_eq!(cell.intensity, 1.0);
        assert_eq!(cell.color, Rgb(40, 50, 60));
        // Out of bounds is ignored.
        canvas.splat(9, 9, 1.0, Rgb::WHITE);
        assert_eq!(canvas.lit_cells(), 1);
    }

    #[test]
    fn test_horizontal_beam_lights_its_row() {
        let mode = TextureMode::Shaded(synthesize_beam(TextureSize::new(256, 64)).unwrap());
        let mut canvas = Canvas::new(80, 24);
        let beam = BeamDraw {
            transform: BeamTransform::from_endpoints(
                Vec3::new(-6.0, 0.0, 0.0),
                Vec3::new(6.0, 0.0, 0.0),
                0.05,
            ),
            color: Rgb(64, 156, 255),
            opacity: 1.0,
            packet: None,
        };
        draw_beam(&mut canvas, &mode, &beam);

        let row = canvas.viewport().world_to_cell(Vec2::ZERO).y as u16;
        assert!(canvas.get(40, row).unwrap().intensity > 0.3);
        assert_eq!(canvas.get(40, 0).unwrap().intensity, 0.0);
        assert_eq!(canvas.to_lines().len(), 24);
    }

    #[test]
    fn test_solid_sprite_fallback_draws() {
        let mut canvas = Canvas::new(40, 20);
        draw_sprite(
            &mut canvas,
            &TextureMode::Solid,
            Vec2::ZERO,
            3.0,
            Rgb::WHITE,
            0.8,
        );
        assert!(canvas.lit_cells() > 0);
    }

    #[test]
    fn test_offscreen_beam_is_skipped() {
        let mut canvas = Canvas::new(20, 10);
        let beam = BeamDraw {
            transform: BeamTransform::from_endpoints(
                Vec3::new(50.0, 50.0, 0.0),
                Vec3::new(60.0, 50.0, 0.0),
                0.05,
            ),
            color: Rgb::WHITE,
            opacity: 1.0,
            packet: Some(0.5),
        };
        draw_beam(&mut canvas, &TextureMode::Solid, &beam);
        assert_eq!(canvas.lit_cells(), 0);
    }
}
