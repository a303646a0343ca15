//! Glow textures shared by every entity of a scene.
//!
//! Textures are synthesized once per scene and never mutated. A beam texture
//! is laid out with the beam's length along x and its thickness along y; a
//! sprite texture is radially symmetric.

use std::f32::consts::PI;
use std::path::Path;
use std::sync::Arc;

use heroglow_core::{SceneError, TextureSize};
use image::{Rgba, RgbaImage};

/// Largest side accepted for a synthesized canvas.
pub const MAX_TEXTURE_DIM: u32 = 4096;

/// Soft outer glow: (distance from the axis, alpha).
const GLOW_STOPS: &[(f32, f32)] = &[(0.0, 0.55), (0.35, 0.22), (0.7, 0.06), (1.0, 0.0)];

/// Bright narrow core layered on top of the glow.
const CORE_STOPS: &[(f32, f32)] = &[(0.0, 1.0), (0.1, 0.85), (0.22, 0.0)];

const GLOW_RGB: [f32; 3] = [190.0, 205.0, 230.0];
const CORE_RGB: [f32; 3] = [255.0, 255.0, 255.0];

/// Alpha falloff along a tapered axis: fast rise from the head, long soft tail.
pub fn taper(t: f32) -> f32 {
    (t.clamp(0.0, 1.0) * PI).sin().max(0.0).sqrt()
}

/// Piecewise-linear lookup through `(position, value)` stops.
fn gradient(stops: &[(f32, f32)], d: f32) -> f32 {
    let d = d.clamp(0.0, 1.0);
    let mut prev = stops[0];
    for &stop in stops {
        if d <= stop.0 {
            let span = stop.0 - prev.0;
            if span <= f32::EPSILON {
                return stop.1;
            }
            let t = (d - prev.0) / span;
            return prev.1 + (stop.1 - prev.1) * t;
        }
        prev = stop;
    }
    prev.1
}

/// Composite the core over the glow at normalized distance `d` and fade by `fade`.
fn glow_pixel(d: f32, fade: f32) -> Rgba<u8> {
    let glow_a = gradient(GLOW_STOPS, d);
    let core_a = gradient(CORE_STOPS, d);
    let alpha = core_a + glow_a * (1.0 - core_a);
    if alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        let c = (CORE_RGB[i] * core_a + GLOW_RGB[i] * glow_a * (1.0 - core_a)) / alpha;
        c.round().clamp(0.0, 255.0) as u8
    };
    let a = (alpha * fade * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba([channel(0), channel(1), channel(2), a])
}

fn check_canvas(what: &'static str, width: u32, height: u32) -> Result<(), SceneError> {
    if width == 0 || height == 0 || width > MAX_TEXTURE_DIM || height > MAX_TEXTURE_DIM {
        return Err(SceneError::ResourceCreation {
            what,
            width,
            height,
        });
    }
    Ok(())
}

/// Immutable RGBA bitmap, cheap to clone and share.
#[derive(Debug, Clone)]
pub struct Texture {
    image: Arc<RgbaImage>,
}

impl Texture {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Nearest-neighbour alpha lookup in normalized coordinates (0.0-1.0).
    pub fn sample_alpha(&self, u: f32, v: f32) -> f32 {
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return 0.0;
        }
        let x = ((u * (self.width() - 1) as f32).round() as u32).min(self.width() - 1);
        let y = ((v * (self.height() - 1) as f32).round() as u32).min(self.height() - 1);
        self.image.get_pixel(x, y).0[3] as f32 / 255.0
    }

    pub fn save_png(&self, path: &Path) -> image::ImageResult<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }
}

/// Beam texture: glow and core across y, taper along x.
pub fn synthesize_beam(size: TextureSize) -> Result<Texture, SceneError> {
    let TextureSize { width, height } = size;
    check_canvas("beam texture", width, height)?;

    let half = (height.max(2) - 1) as f32 / 2.0;
    let span = (width.max(2) - 1) as f32;
    let image = RgbaImage::from_fn(width, height, |x, y| {
        let d = ((y as f32 - half) / half).abs();
        glow_pixel(d, taper(x as f32 / span))
    });

    Ok(Texture {
        image: Arc::new(image),
    })
}

/// Particle sprite: glow and core radially, taper towards the rim.
pub fn synthesize_sprite(size: TextureSize) -> Result<Texture, SceneError> {
    let TextureSize { width, height } = size;
    check_canvas("sprite texture", width, height)?;

    let cx = (width.max(2) - 1) as f32 / 2.0;
    let cy = (height.max(2) - 1) as f32 / 2.0;
    let image = RgbaImage::from_fn(width, height, |x, y| {
        let dx = (x as f32 - cx) / cx;
        let dy = (y as f32 - cy) / cy;
        let r = (dx * dx + dy * dy).sqrt().min(1.0);
        // Centre maps to the taper peak (t = 0.5), the rim to t = 0.
        glow_pixel(r, taper((1.0 - r) * 0.5))
    });

    Ok(Texture {
        image: Arc::new(image),
    })
}

/// What the renderer draws entities with.
#[derive(Debug, Clone)]
pub enum TextureMode {
    Shaded(Texture),
    /// Flat-color fallback used when the texture canvas could not be created.
    Solid,
}

impl TextureMode {
    /// Use the texture from `result`, or degrade to flat primitives.
    pub fn or_solid(result: Result<Texture, SceneError>) -> Self {
        match result {
            Ok(texture) => TextureMode::Shaded(texture),
            Err(err) => {
                log::warn!("{err}; falling back to solid primitives");
                TextureMode::Solid
            }
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, TextureMode::Solid)
    }

    /// Beam coverage at normalized `(u, v)`.
    pub fn beam_alpha(&self, u: f32, v: f32) -> f32 {
        match self {
            TextureMode::Shaded(texture) => texture.sample_alpha(u, v),
            TextureMode::Solid => {
                if (0.0..=1.0).contains(&u) && (v - 0.5).abs() <= 0.15 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Sprite coverage at normalized `(u, v)`.
    pub fn sprite_alpha(&self, u: f32, v: f32) -> f32 {
        match self {
            TextureMode::Shaded(texture) => texture.sample_alpha(u, v),
            TextureMode::Solid => {
                let (dx, dy) = (u - 0.5, v - 0.5);
                if dx * dx + dy * dy <= 0.25 { 1.0 } else { 0.0 }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEAM: TextureSize = TextureSize::new(256, 64);

    #[test]
    fn test_taper_shape() {
        assert!(taper(0.0).abs() < 1e-6);
        assert!((taper(0.5) - 1.0).abs() < 1e-6);
        assert!(taper(1.0).abs() < 1e-3);
        // Square root makes the rise faster than a plain sine.
        assert!(taper(0.1) > (0.1 * PI).sin());
    }

    #[test]
    fn test_gradient_interpolates() {
        let stops = &[(0.0, 1.0), (1.0, 0.0)];
        assert!((gradient(stops, 0.25) - 0.75).abs() < 1e-6);
        assert_eq!(gradient(stops, 2.0), 0.0);
    }

    #[test]
    fn test_beam_is_pure() {
        let a = synthesize_beam(BEAM).unwrap();
        let b = synthesize_beam(BEAM).unwrap();
        assert_eq!(a.image().as_raw(), b.image().as_raw());
    }

    #[test]
    fn test_sprite_is_pure() {
        let size = TextureSize::new(32, 32);
        let a = synthesize_sprite(size).unwrap();
        let b = synthesize_sprite(size).unwrap();
        assert_eq!(a.image().as_raw(), b.image().as_raw());
        assert_eq!((a.width(), a.height()), (32, 32));
    }

    #[test]
    fn test_beam_layers_and_taper() {
        let texture = synthesize_beam(BEAM).unwrap();
        let mid_x = texture.width() / 2;
        let mid_y = texture.height() / 2;

        let center = texture.image().get_pixel(mid_x, mid_y).0[3];
        let edge = texture.image().get_pixel(mid_x, 0).0[3];
        assert!(center > 200, "core should be bright, got {center}");
        assert!(center > edge);

        // Both ends fade to transparent.
        assert_eq!(texture.image().get_pixel(0, mid_y).0[3], 0);
        assert!(texture.image().get_pixel(texture.width() - 1, mid_y).0[3] < 8);
    }

    #[test]
    fn test_sprite_fades_to_rim() {
        let texture = synthesize_sprite(TextureSize::new(32, 32)).unwrap();
        assert!(texture.sample_alpha(0.5, 0.5) > 0.9);
        assert_eq!(texture.sample_alpha(0.0, 0.0), 0.0);
        assert_eq!(texture.sample_alpha(1.5, 0.5), 0.0);
    }

    #[test]
    fn test_bad_canvas_falls_back_to_solid() {
        let result = synthesize_beam(TextureSize::new(0, 64));
        assert!(matches!(result, Err(SceneError::ResourceCreation { .. })));

        let mode = TextureMode::or_solid(synthesize_sprite(TextureSize::new(
            MAX_TEXTURE_DIM + 1,
            8,
        )));
        assert!(mode.is_solid());
        assert_eq!(mode.beam_alpha(0.5, 0.5), 1.0);
        assert_eq!(mode.beam_alpha(0.5, 0.0), 0.0);
    }
}
