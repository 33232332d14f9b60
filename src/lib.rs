//! Geometry and software rasterization core of a 3D mesh viewer.
//!
//! A [`Mesh`] is placed in the scene through a two-tier (local/world)
//! transform, projected through a camera matrix into 2D screen-space
//! primitives, and rasterized into an owned color buffer with per-pixel
//! depth testing.
//!
//! # Quick Start
//!
//! ```ignore
//! use meshview::prelude::*;
//!
//! let mut scene = Scene::new();
//! scene.add_model(MeshModel::new(meshview::mesh::cube()));
//!
//! let camera = Camera::default().transform(640, 480);
//! let mut renderer = Renderer::new(640, 480)?;
//! renderer.render(&mut scene, &camera, &DrawOptions::default(), &RenderOptions::default());
//! renderer.save_png("cube.png")?;
//! ```

pub mod camera;
pub mod colors;
pub mod loader;
pub mod math;
pub mod mesh;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod scene;
pub mod transform;

pub use loader::{load_obj, LoadError};
pub use mesh::{Face, Mesh, MeshError};
pub use model::MeshModel;
pub use render::{RenderError, Renderer};
pub use scene::Scene;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::camera::{Camera, Projection};
    pub use crate::colors::Color;
    pub use crate::loader::load_obj;
    pub use crate::mesh::{Face, Mesh};
    pub use crate::model::MeshModel;
    pub use crate::pipeline::{DrawOptions, ScreenPrimitives, Segment};
    pub use crate::render::{DepthCompare, RenderOptions, Renderer};
    pub use crate::scene::Scene;
    pub use crate::transform::{ComposedTransform, TransformState, TransformTier};

    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;
}
