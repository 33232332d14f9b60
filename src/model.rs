//! A mesh placed in the scene.
//!
//! A [`MeshModel`] pairs an immutable [`Mesh`] with its local/world transform
//! state and keeps the results of the most recent projection, so the
//! renderer (or any other consumer) can read the edge and indicator lists
//! after [`MeshModel::draw`].

use crate::math::mat4::Mat4;
use crate::mesh::{Face, Mesh};
use crate::pipeline::{self, DrawOptions, ScreenPrimitives, Segment};
use crate::transform::{ComposedTransform, TransformState};

#[derive(Clone, Debug)]
pub struct MeshModel {
    mesh: Mesh,
    transform: TransformState,
    composed: ComposedTransform,
    primitives: ScreenPrimitives,
}

impl MeshModel {
    /// Wraps `mesh` with identity transforms and empty primitive lists.
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            transform: TransformState::default(),
            composed: ComposedTransform::default(),
            primitives: ScreenPrimitives::default(),
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn name(&self) -> &str {
        self.mesh.name()
    }

    pub fn face(&self, index: usize) -> Option<&Face> {
        self.mesh.face(index)
    }

    pub fn faces_count(&self) -> usize {
        self.mesh.faces_count()
    }

    // ============ Transform ============

    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    /// Mutable access to both tiers. Changes take effect on the next
    /// [`compute_transform`](Self::compute_transform) or draw.
    pub fn transform_mut(&mut self) -> &mut TransformState {
        &mut self.transform
    }

    /// Recomputes the object, world and axis matrices from the current
    /// transform state.
    pub fn compute_transform(&mut self) -> &ComposedTransform {
        self.composed = self.transform.compose();
        &self.composed
    }

    /// Matrices from the last [`compute_transform`](Self::compute_transform).
    pub fn composed(&self) -> &ComposedTransform {
        &self.composed
    }

    // ============ Projection ============

    /// Refreshes the transform and projects the mesh through `camera`,
    /// replacing every list from the previous draw. Returns the edge list.
    pub fn draw(&mut self, camera: &Mat4, options: &DrawOptions) -> &[Segment] {
        self.compute_transform();
        self.primitives = pipeline::project(&self.mesh, &self.composed, camera, options);
        &self.primitives.edges
    }

    pub fn primitives(&self) -> &ScreenPrimitives {
        &self.primitives
    }

    pub fn edges(&self) -> &[Segment] {
        &self.primitives.edges
    }

    pub fn vertex_normals(&self) -> Option<&[Segment]> {
        self.primitives.vertex_normals.as_deref()
    }

    pub fn face_normals(&self) -> Option<&[Segment]> {
        self.primitives.face_normals.as_deref()
    }

    pub fn bounding_box(&self) -> Option<&[Segment]> {
        self.primitives.bounding_box.as_deref()
    }

    pub fn axis(&self) -> Option<&[Segment]> {
        self.primitives.axis.as_deref()
    }
}
