use polyview_paint::{Point2, pos2};

use crate::math::{Bounds3, Vec3};

pub const DEFAULT_FOV_DEG: f64 = 45.0;
pub const NEAR_PLANE: f64 = 0.1;
pub const FAR_PLANE: f64 = 10_000.0;
pub const MIN_DISTANCE: f64 = 10.0;
pub const MAX_DISTANCE: f64 = 5_000.0;
pub const DEFAULT_POSITION: Vec3 = Vec3::new(200.0, 200.0, 400.0);
pub const FRAMING_DIRECTION: Vec3 = Vec3::new(200.0, 200.0, -200.0);
pub const FRAMING_MARGIN: f64 = 1.02;

// Keeps orbiting away from the poles, where the up vector degenerates.
const POLAR_EPS: f64 = 1.0e-3;

/// Mount point of the viewer, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug)]
struct CameraBasis {
    pos: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
}

/// Perspective camera orbiting a target, Y up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerCameraState {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for ViewerCameraState {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION,
            target: Vec3::ZERO,
            fov_deg: DEFAULT_FOV_DEG,
            near: NEAR_PLANE,
            far: FAR_PLANE,
        }
    }
}

impl ViewerCameraState {
    pub fn distance(&self) -> f64 {
        self.position.distance(self.target)
    }

    /// Fits `bounds` along the fixed framing direction. Returns false and
    /// leaves the camera alone when the box is degenerate.
    pub fn frame_bounds(&mut self, bounds: Bounds3) -> bool {
        let center = (bounds.0 + bounds.1) * 0.5;
        let max_dim = (bounds.1 - bounds.0).max_component();
        if max_dim == 0.0 || !max_dim.is_finite() {
            return false;
        }
        let half_fov = self.fov_deg.to_radians() * 0.5;
        let distance = (max_dim / (2.0 * half_fov.tan())).abs() * FRAMING_MARGIN;
        self.target = center;
        self.position = center + FRAMING_DIRECTION.normalized() * distance;
        true
    }

    /// Rotates the camera around its target by `yaw` about world Y and
    /// `pitch` toward the poles, both in radians.
    pub fn orbit(&mut self, yaw: f64, pitch: f64) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f64::EPSILON {
            return;
        }
        let theta = offset.x.atan2(offset.z) + yaw;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() - pitch)
            .clamp(POLAR_EPS, std::f64::consts::PI - POLAR_EPS);
        let offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        self.position = self.target + offset;
    }

    /// Scales the orbit distance by `factor`, within the allowed range.
    pub fn zoom(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let offset = self.position - self.target;
        let distance = offset.length();
        if distance <= f64::EPSILON {
            return;
        }
        let next = (distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.position = self.target + offset.normalized() * next;
    }

    pub fn forward(&self) -> Vec3 {
        let dir = self.target - self.position;
        if dir.length() <= f64::EPSILON {
            Vec3::new(0.0, 0.0, -1.0)
        } else {
            dir.normalized()
        }
    }

    /// Screen position and view depth of `point`, or `None` outside the
    /// near/far range.
    pub fn project(&self, point: Vec3, viewport: Viewport) -> Option<(Point2, f64)> {
        let basis = self.basis();
        let rel = point - basis.pos;
        let depth = rel.dot(basis.forward);
        if depth <= self.near || depth >= self.far {
            return None;
        }
        let height = f64::from(viewport.height);
        let scale = height * 0.5 / (self.fov_deg.to_radians() * 0.5).tan();
        let sx = f64::from(viewport.width) * 0.5 + rel.dot(basis.right) / depth * scale;
        let sy = height * 0.5 - rel.dot(basis.up) / depth * scale;
        Some((pos2(sx as f32, sy as f32), depth))
    }

    fn basis(&self) -> CameraBasis {
        let forward = self.forward();
        let mut right = forward.cross(Vec3::Y);
        if right.length() <= 1.0e-6 {
            right = forward.cross(Vec3::new(0.0, 0.0, -1.0));
        }
        let right = right.normalized();
        let up = right.cross(forward).normalized();
        CameraBasis {
            pos: self.position,
            right,
            up,
            forward,
        }
    }

    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.position.distance(other.position) <= eps && self.target.distance(other.target) <= eps
    }
}
