//! The software renderer: owns the frame buffer and draws projected models
//! into it.
//!
//! [`Renderer::render`] produces one frame of a [`Scene`]: it clears the
//! buffers, projects every model through the camera and rasterizes filled
//! faces, edges and the enabled indicator overlays.

use std::path::Path;

use log::debug;

use super::framebuffer::{DepthCompare, FrameBuffer, RenderError};
use crate::colors::{self, Color};
use crate::math::{mat4::Mat4, vec2::Vec2, vec3::Vec3};
use crate::model::MeshModel;
use crate::pipeline::{DrawOptions, Segment};
use crate::scene::Scene;

/// Pulls edges towards the viewer so they win against the faces they border.
const EDGE_DEPTH_BIAS: f32 = 1e-4;

/// Per-frame rasterization settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Fill faces with `fill_color` before drawing edges.
    pub fill: bool,
    pub draw_edges: bool,
    /// Draw each face's screen bounding rectangle instead of filling it.
    pub triangle_bounding_boxes: bool,
    pub background: Color,
    pub fill_color: Color,
    pub edge_color: Color,
    pub vertex_normal_color: Color,
    pub face_normal_color: Color,
    pub bounding_box_color: Color,
    /// X, Y and Z axis colors.
    pub axis_colors: [Color; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            fill: false,
            draw_edges: true,
            triangle_bounding_boxes: false,
            background: colors::BACKGROUND,
            fill_color: colors::FILL,
            edge_color: colors::WIREFRAME,
            vertex_normal_color: colors::VERTEX_NORMAL,
            face_normal_color: colors::FACE_NORMAL,
            bounding_box_color: colors::BOUNDING_BOX,
            axis_colors: [colors::AXIS_X, colors::AXIS_Y, colors::AXIS_Z],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    buffer: FrameBuffer,
}

impl Renderer {
    /// A renderer with a black `width x height` frame and the default
    /// depth comparison.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Self::with_depth_compare(width, height, DepthCompare::default())
    }

    pub fn with_depth_compare(
        width: u32,
        height: u32,
        depth_compare: DepthCompare,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            buffer: FrameBuffer::new(width, height, depth_compare)?,
        })
    }

    /// Reallocates both buffers for a new viewport size. The depth comparison
    /// is kept. On error the current buffers stay untouched.
    pub fn create_buffers(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        debug!(
            "resizing viewport {}x{} -> {width}x{height}",
            self.viewport_width(),
            self.viewport_height()
        );
        self.buffer = FrameBuffer::new(width, height, self.buffer.depth_compare())?;
        Ok(())
    }

    pub fn viewport_width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn viewport_height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn depth_compare(&self) -> DepthCompare {
        self.buffer.depth_compare()
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Depth-tested pixel write; out-of-bounds coordinates are ignored.
    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color, depth: f32) -> bool {
        self.buffer.put_pixel(x, y, color, depth)
    }

    pub fn clear_color_buffer(&mut self, color: Color) {
        self.buffer.clear(color);
    }

    /// Draws `step_size`-spaced spokes from `center` out to a circle of
    /// `radius` pixels. The spokes share the center's depth.
    pub fn draw_circle(&mut self, center: Vec3, radius: f32, step_size: u32, color: Color) {
        let steps = step_size.max(1);
        for i in 0..steps {
            let angle = std::f32::consts::TAU * i as f32 / steps as f32;
            let rim = Vec3::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
                center.z,
            );
            self.draw_line(center, rim, color);
        }
    }

    /// Projects `model` through `camera` and rasterizes it.
    ///
    /// Filled faces and edges are depth-tested with their projected depth.
    /// Indicator overlays are drawn on top of the mesh.
    pub fn render_model(
        &mut self,
        model: &mut MeshModel,
        camera: &Mat4,
        draw: &DrawOptions,
        options: &RenderOptions,
    ) {
        model.draw(camera, draw);
        let compare = self.depth_compare();
        let primitives = model.primitives();
        let vertices = &primitives.vertices;

        if options.fill || options.triangle_bounding_boxes {
            for face in model.mesh().faces() {
                let [p1, p2, p3] = face.vertex_indices().map(|i| vertices[i]);
                self.draw_triangle(p1, p2, p3, options.fill_color, options.triangle_bounding_boxes);
            }
        }

        if options.draw_edges {
            let bias = match compare {
                DepthCompare::Less | DepthCompare::LessEqual => -EDGE_DEPTH_BIAS,
                DepthCompare::Greater => EDGE_DEPTH_BIAS,
            };
            let lift = |p: Vec3| Vec3::new(p.x, p.y, p.z + bias);
            for face in model.mesh().faces() {
                let [p1, p2, p3] = face.vertex_indices().map(|i| lift(vertices[i]));
                self.draw_line(p1, p2, options.edge_color);
                self.draw_line(p2, p3, options.edge_color);
                self.draw_line(p1, p3, options.edge_color);
            }
        }

        let overlay = overlay_depth(compare);
        if let Some(segments) = model.vertex_normals() {
            self.draw_segments(segments, overlay, options.vertex_normal_color);
        }
        if let Some(segments) = model.face_normals() {
            self.draw_segments(segments, overlay, options.face_normal_color);
        }
        if let Some(segments) = model.bounding_box() {
            self.draw_segments(segments, overlay, options.bounding_box_color);
        }
        if let Some(segments) = model.axis() {
            for (segment, color) in segments.iter().zip(options.axis_colors) {
                self.draw_segments(std::slice::from_ref(segment), overlay, color);
            }
        }
    }

    /// Clears the frame to the background color and renders every model of
    /// the scene.
    pub fn render(
        &mut self,
        scene: &mut Scene,
        camera: &Mat4,
        draw: &DrawOptions,
        options: &RenderOptions,
    ) {
        self.clear_color_buffer(options.background);
        for model in scene.models_mut() {
            self.render_model(model, camera, draw, options);
        }
    }

    /// Writes the color buffer as an 8-bit PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        self.buffer.to_image().save(path)?;
        debug!("wrote {}", path.display());
        Ok(())
    }

    fn draw_segments(&mut self, segments: &[Segment], depth: f32, color: Color) {
        let at = |p: Vec2| Vec3::new(p.x, p.y, depth);
        for segment in segments {
            self.draw_line(at(segment.start), at(segment.end), color);
        }
    }
}

/// A depth in front of every projected point. Overlapping overlays keep the
/// first one drawn.
fn overlay_depth(compare: DepthCompare) -> f32 {
    match compare {
        DepthCompare::Less | DepthCompare::LessEqual => f32::MIN,
        DepthCompare::Greater => f32::MAX,
    }
}
