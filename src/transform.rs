//! Local/world transform state and its composition into matrices.
//!
//! Each entity carries two [`TransformTier`]s. A tier holds a translation, an
//! Euler rotation in degrees (applied X, then Y, then Z) and either a per-axis
//! or a locked uniform scale. [`TransformState::compose`] turns the state into
//! a [`ComposedTransform`]; it is a pure function of the parameters, so there
//! is nothing to invalidate when a parameter changes.

use crate::math::{mat4::Mat4, vec3::Vec3};

/// One tier (local or world) of an entity's transform.
///
/// Provides a fluent API where mutating methods return `&mut Self` for chaining:
///
/// ```ignore
/// tier.set_translation_xyz(5.0, 2.0, 0.0)
///     .rotate_y(15.0)
///     .lock_scale(2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformTier {
    translation: Vec3,
    rotation: Vec3, // Euler angles in degrees
    scale: Vec3,
    locked_scale: f32,
    scale_locked: bool,
}

impl Default for TransformTier {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            locked_scale: 1.0,
            scale_locked: false,
        }
    }
}

impl TransformTier {
    /// Create a tier with identity defaults (translation=0, rotation=0, scale=1).
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Translation ============

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn set_translation(&mut self, translation: Vec3) -> &mut Self {
        self.translation = translation;
        self
    }

    pub fn set_translation_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.translation = Vec3::new(x, y, z);
        self
    }

    /// Translate by a delta vector.
    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.translation = self.translation + delta;
        self
    }

    // ============ Rotation ============

    /// Get the rotation (Euler angles in degrees).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Set the rotation (Euler angles in degrees).
    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.rotation = rotation;
        self
    }

    pub fn set_rotation_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    pub fn rotate_x(&mut self, degrees: f32) -> &mut Self {
        self.rotation.x += degrees;
        self
    }

    pub fn rotate_y(&mut self, degrees: f32) -> &mut Self {
        self.rotation.y += degrees;
        self
    }

    pub fn rotate_z(&mut self, degrees: f32) -> &mut Self {
        self.rotation.z += degrees;
        self
    }

    // ============ Scale ============

    /// The per-axis scale. Kept even while a locked scale overrides it.
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn set_scale_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.scale = Vec3::new(x, y, z);
        self
    }

    pub fn locked_scale(&self) -> f32 {
        self.locked_scale
    }

    pub fn is_scale_locked(&self) -> bool {
        self.scale_locked
    }

    /// Switch to uniform scale `s` on all three axes.
    pub fn lock_scale(&mut self, s: f32) -> &mut Self {
        self.locked_scale = s;
        self.scale_locked = true;
        self
    }

    /// Go back to the per-axis scale.
    pub fn unlock_scale(&mut self) -> &mut Self {
        self.scale_locked = false;
        self
    }

    /// Lock a uniform scale that shrinks an object of extent `max_scale` down to
    /// unit size. Zero or non-finite extents leave the tier untouched.
    pub fn fit_uniform(&mut self, max_scale: f32) -> &mut Self {
        if max_scale.is_finite() && max_scale > 0.0 {
            self.lock_scale(1.0 / max_scale);
        }
        self
    }

    /// The scale actually applied: the locked value on every axis when locked.
    pub fn effective_scale(&self) -> Vec3 {
        if self.scale_locked {
            Vec3::splat(self.locked_scale)
        } else {
            self.scale
        }
    }

    // ============ Matrix Generation ============

    pub fn translation_matrix(&self) -> Mat4 {
        Mat4::translation(self.translation)
    }

    /// RotationX * RotationY * RotationZ.
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
    }

    pub fn scale_matrix(&self) -> Mat4 {
        Mat4::scaling(self.effective_scale())
    }

    /// Generate the tier matrix.
    ///
    /// Order: Translation * RotationX * RotationY * RotationZ * Scale
    /// (Scale applied first, then rotations, then translation)
    pub fn to_matrix(&self) -> Mat4 {
        self.translation_matrix() * self.rotation_matrix() * self.scale_matrix()
    }
}

/// Local (object-space) and world (scene-space) tiers of one entity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformState {
    pub local: TransformTier,
    pub world: TransformTier,
}

/// Matrices derived from a [`TransformState`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ComposedTransform {
    /// world * local: object space to scene space.
    pub object: Mat4,
    /// The world tier alone.
    pub world: Mat4,
    /// Translations and scales of both tiers without their rotations, used to
    /// place axis indicators aligned with the world axes.
    pub axis: Mat4,
}

impl TransformState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compose(&self) -> ComposedTransform {
        let world = self.world.to_matrix();
        ComposedTransform {
            object: world * self.local.to_matrix(),
            world,
            axis: self.world.translation_matrix()
                * self.world.scale_matrix()
                * self.local.translation_matrix()
                * self.local.scale_matrix(),
        }
    }
}
