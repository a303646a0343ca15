//! The scene component a host mounts, drives once per frame, and tears down.

use heroglow_core::{AnimationSpeed, SceneKind, SceneTuning};
use log::{debug, warn};
use rand::Rng;
use ratatui::{Frame, layout::Rect, widgets::Paragraph};

use crate::render::{Canvas, rasterize};
use crate::state::SceneState;
use crate::texture::{TextureMode, synthesize_beam, synthesize_sprite};

/// Longest simulated step a single frame may take, in seconds.
///
/// A host that was suspended (for example a backgrounded terminal) would
/// otherwise hand over one huge delta and wipe the whole pool in one tick.
pub const MAX_FRAME_DT: f32 = 0.25;

/// A mounted hero animation.
///
/// A scene whose configuration is invalid mounts blank: it renders nothing
/// and ignores frames. After [`teardown`](Self::teardown) the same holds.
#[derive(Debug)]
pub struct HeroScene<R> {
    kind: SceneKind,
    tuning: SceneTuning,
    speed: AnimationSpeed,
    state: Option<SceneState>,
    texture: Option<TextureMode>,
    rng: R,
    alive: bool,
}

impl<R: Rng> HeroScene<R> {
    /// Create the scene, its texture and its seed entities.
    pub fn mount(
        kind: SceneKind,
        max_entities: u32,
        tuning: &SceneTuning,
        speed: AnimationSpeed,
        mut rng: R,
    ) -> Self {
        let (state, texture) = build(kind, max_entities, tuning, &mut rng);
        Self {
            kind,
            tuning: *tuning,
            speed,
            state,
            texture,
            rng,
            alive: true,
        }
    }

    /// Replace the running scene, keeping the RNG stream and tuning.
    pub fn remount(&mut self, kind: SceneKind, max_entities: u32) {
        let (state, texture) = build(kind, max_entities, &self.tuning, &mut self.rng);
        self.kind = kind;
        self.state = state;
        self.texture = texture;
        self.alive = true;
    }

    /// Per-frame callback: advance the simulation by `dt` host seconds.
    pub fn on_frame(&mut self, dt: f32) {
        if !self.alive {
            return;
        }
        let Some(state) = self.state.take() else {
            return;
        };
        let dt = if dt.is_finite() {
            (dt * self.speed.time_scale()).clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.state = Some(state.tick(dt, &mut self.rng));
    }

    /// Release the texture and the pool. Later frames are no-ops.
    pub fn teardown(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.state = None;
        self.texture = None;
        debug!("{} scene torn down", self.kind);
    }

    /// Rasterise the current snapshot, or `None` when there is nothing to draw.
    pub fn rasterize(&self, cols: u16, rows: u16) -> Option<Canvas> {
        if !self.alive {
            return None;
        }
        let state = self.state.as_ref()?;
        let texture = self.texture.as_ref()?;
        Some(rasterize(state, texture, cols, rows))
    }

    /// Draw the scene into `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(canvas) = self.rasterize(area.width, area.height) {
            frame.render_widget(Paragraph::new(canvas.to_lines()), area);
        }
    }

    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        self.speed = speed;
    }

    pub fn speed(&self) -> AnimationSpeed {
        self.speed
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn tuning(&self) -> &SceneTuning {
        &self.tuning
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// True when there is no simulation behind this component.
    pub fn is_blank(&self) -> bool {
        self.state.is_none()
    }

    pub fn state(&self) -> Option<&SceneState> {
        self.state.as_ref()
    }

    pub fn texture(&self) -> Option<&TextureMode> {
        self.texture.as_ref()
    }

    pub fn active_count(&self) -> usize {
        self.state.as_ref().map_or(0, SceneState::active_count)
    }
}

fn build<R: Rng + ?Sized>(
    kind: SceneKind,
    max_entities: u32,
    tuning: &SceneTuning,
    rng: &mut R,
) -> (Option<SceneState>, Option<TextureMode>) {
    let state = match SceneState::new(kind, max_entities as usize, tuning.seed_count as usize, rng)
    {
        Ok(state) => state,
        Err(err) => {
            warn!("{err}; {kind} scene mounted blank");
            return (None, None);
        }
    };
    let texture = match kind {
        SceneKind::Particles => synthesize_sprite(tuning.sprite_texture),
        SceneKind::Geometric | SceneKind::Dataflow => synthesize_beam(tuning.beam_texture),
    };
    debug!("mounted {kind} scene (max {max_entities})");
    (Some(state), Some(TextureMode::or_solid(texture)))
}
