//! Rasterization into an owned color + depth buffer.
//!
//! - [`FrameBuffer`] - color and depth storage with the depth-tested pixel write
//! - [`Renderer`] - lines, triangles, circles, and whole scenes on top of it

mod framebuffer;
mod line;
mod renderer;
mod triangle;

pub use framebuffer::{DepthCompare, FrameBuffer, RenderError};
pub use renderer::{RenderOptions, Renderer};
pub use triangle::barycentric;
