//! Look-at camera producing the camera transform the projection pipeline
//! consumes.
//!
//! # Coordinate System
//!
//! Right-handed: X right, Y up, and the camera looks down its local -Z axis.
//! [`Camera::transform`] chains view, perspective projection and viewport, so
//! points come out in pixel coordinates with the origin at the top-left and
//! NDC depth in `z` (smaller is closer).

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Width divided by height.
    aspect_ratio: f32,
    z_near: f32,
    z_far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::from_degrees(45.0, 1.0, 0.1, 100.0)
    }
}

impl Projection {
    /// `fov_y` is in radians; `z_near` must be positive and below `z_far`.
    pub fn new(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    pub fn from_degrees(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::new(fov_y_degrees.to_radians(), aspect_ratio, z_near, z_far)
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// Horizontal field of view in radians, derived from `fov_y` and the
    /// aspect ratio.
    pub fn fov_x(&self) -> f32 {
        2.0 * (self.aspect_ratio * (self.fov_y / 2.0).tan()).atan()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.z_near, self.z_far)
    }
}

/// A camera at `eye` looking at `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Projection::default())
    }
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, projection: Projection) -> Self {
        Self {
            eye,
            target,
            up: Vec3::UP,
            projection,
        }
    }

    /// A camera on the +Z side of `target`, far enough back that an object
    /// of size `extent` centered there fits the vertical field of view.
    pub fn framing(target: Vec3, extent: f32, projection: Projection) -> Self {
        let half = extent.abs().max(f32::EPSILON) / 2.0;
        let distance = half / (projection.fov_y() / 2.0).tan() * 1.5 + half;
        Self::new(target + Vec3::new(0.0, 0.0, distance), target, projection)
    }

    // ============ Placement ============

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn set_eye(&mut self, eye: Vec3) {
        self.eye = eye;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
    }

    /// Swings the eye around the target about the world Y axis.
    pub fn orbit_y(&mut self, degrees: f32) {
        let offset = self.eye - self.target;
        let rotated = (Mat4::rotation_y(degrees) * Vec4::from(offset)).to_vec3();
        self.eye = self.target + rotated;
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn projection_mut(&mut self) -> &mut Projection {
        &mut self.projection
    }

    // ============ Matrix Generation ============

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// viewport * projection * view for a `width x height` pixel viewport.
    /// The projection's aspect ratio is taken from the viewport.
    pub fn transform(&self, width: u32, height: u32) -> Mat4 {
        let mut projection = self.projection;
        projection.set_aspect_ratio(width as f32 / height.max(1) as f32);
        Mat4::viewport(width, height) * projection.matrix() * self.view_matrix()
    }
}
