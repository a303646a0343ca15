//! Mapping from entity state to drawable transforms.

use glam::{Vec2, Vec3};
use serde::Serialize;

/// Visual thickness multiplier applied to a beam's logical width.
pub const BEAM_THICKNESS: f32 = 8.0;

/// Half-extent of the cube particles wrap around in.
pub const PARTICLE_BOUNDS: f32 = 5.0;

/// Point-size range the renderer accepts, in cells.
pub const MIN_POINT_SIZE: f32 = 1.0;
pub const MAX_POINT_SIZE: f32 = 4.0;

/// Placement of a beam quad: unit quad scaled, rotated in-plane, then moved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeamTransform {
    pub position: Vec3,
    /// Angle of the origin→target direction in the x/y plane, radians.
    pub rotation: f32,
    /// `(length, width * BEAM_THICKNESS, 1)`.
    pub scale: Vec3,
}

impl BeamTransform {
    pub fn from_endpoints(origin: Vec3, target: Vec3, width: f32) -> Self {
        let dir = target - origin;
        Self {
            position: (origin + target) * 0.5,
            rotation: dir.y.atan2(dir.x),
            scale: Vec3::new(dir.length(), width * BEAM_THICKNESS, 1.0),
        }
    }

    pub fn length(&self) -> f32 {
        self.scale.x
    }

    pub fn thickness(&self) -> f32 {
        self.scale.y
    }

    /// Map a world point in the x/y plane into quad coordinates.
    ///
    /// `u` runs 0→1 from origin to target and `v` 0→1 across the thickness;
    /// points outside the quad fall outside that range.
    pub fn to_quad(&self, point: Vec2) -> Vec2 {
        let rel = point - self.position.truncate();
        let (sin, cos) = self.rotation.sin_cos();
        let along = rel.x * cos + rel.y * sin;
        let across = -rel.x * sin + rel.y * cos;
        let length = self.length().max(f32::EPSILON);
        let thickness = self.thickness().max(f32::EPSILON);
        Vec2::new(along / length + 0.5, across / thickness + 0.5)
    }

    /// Like [`to_quad`](Self::to_quad) for a cell of half-size `half` centred
    /// on `point`: the cross-axis distance is measured to the nearest part of
    /// the cell, so a beam thinner than a cell still lights every cell it crosses.
    pub fn to_quad_within(&self, point: Vec2, half: Vec2) -> Vec2 {
        let quad = self.to_quad(point);
        let (sin, cos) = self.rotation.sin_cos();
        let reach = (half.x * sin).abs() + (half.y * cos).abs();
        let thickness = self.thickness().max(f32::EPSILON);
        let across = (quad.y - 0.5) * thickness;
        let shrunk = across.signum() * (across.abs() - reach).max(0.0);
        Vec2::new(quad.x, shrunk / thickness + 0.5)
    }

    /// Axis-aligned bounds of the quad in the x/y plane: `(min, max)`.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let (sin, cos) = self.rotation.sin_cos();
        let half_l = self.length() * 0.5;
        let half_t = self.thickness() * 0.5;
        let ext = Vec2::new(
            (half_l * cos).abs() + (half_t * sin).abs(),
            (half_l * sin).abs() + (half_t * cos).abs(),
        );
        let center = self.position.truncate();
        (center - ext, center + ext)
    }
}

/// Memoized beam transform, recomputed only when its inputs change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeamGeometry {
    origin: Vec3,
    target: Vec3,
    width: f32,
    transform: BeamTransform,
}

impl BeamGeometry {
    pub fn new(origin: Vec3, target: Vec3, width: f32) -> Self {
        Self {
            origin,
            target,
            width,
            transform: BeamTransform::from_endpoints(origin, target, width),
        }
    }

    /// Update the inputs. Returns `true` if the transform had to be recomputed.
    pub fn update(&mut self, origin: Vec3, target: Vec3, width: f32) -> bool {
        if origin == self.origin && target == self.target && width == self.width {
            return false;
        }
        *self = Self::new(origin, target, width);
        true
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn transform(&self) -> &BeamTransform {
        &self.transform
    }
}

/// Toroidal wrap into `[-bounds, bounds)` on every axis.
pub fn wrap_position(pos: Vec3, bounds: f32) -> Vec3 {
    let span = 2.0 * bounds;
    Vec3::new(
        (pos.x + bounds).rem_euclid(span) - bounds,
        (pos.y + bounds).rem_euclid(span) - bounds,
        (pos.z + bounds).rem_euclid(span) - bounds,
    )
}

/// Pulsating point size before the renderer clamps it.
pub fn point_size(base: f32, time_s: f32, phase: f32, depth: f32) -> f32 {
    let pulse = (time_s * 2.0 + phase).sin() * 0.5 + 0.5;
    base * pulse / depth.max(f32::EPSILON)
}

/// Clamp a point size to what the renderer can draw.
pub fn clamp_point_size(size: f32) -> f32 {
    size.clamp(MIN_POINT_SIZE, MAX_POINT_SIZE)
}
