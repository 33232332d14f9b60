//! Color and depth buffers sized to the viewport.
//!
//! The buffers are private: [`FrameBuffer::put_pixel`] is the only way to
//! write a pixel, so every primitive goes through the same bounds check and
//! depth test. [`FrameBuffer::clear`] is the only bulk write.

use image::RgbImage;
use log::debug;
use thiserror::Error;

use crate::colors::Color;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid viewport {width}x{height}: both dimensions must be positive")]
    InvalidViewport { width: u32, height: u32 },

    #[error("failed to write image")]
    Image(#[from] image::ImageError),
}

/// How an incoming depth is compared against the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthCompare {
    /// Smaller depth is closer; ties keep the stored pixel.
    #[default]
    Less,
    /// Smaller depth is closer; ties overwrite the stored pixel.
    LessEqual,
    /// Larger depth is closer, e.g. for a buffer of `1/w` values.
    Greater,
}

impl DepthCompare {
    /// The depth a cleared buffer holds: every real depth wins against it.
    pub fn far(self) -> f32 {
        match self {
            DepthCompare::Less | DepthCompare::LessEqual => f32::INFINITY,
            DepthCompare::Greater => f32::NEG_INFINITY,
        }
    }

    /// Whether `incoming` replaces `stored`.
    #[inline]
    pub fn passes(self, incoming: f32, stored: f32) -> bool {
        match self {
            DepthCompare::Less => incoming < stored,
            DepthCompare::LessEqual => incoming <= stored,
            DepthCompare::Greater => incoming > stored,
        }
    }
}

/// Owned color buffer (`width * height * 3` channels) and depth buffer
/// (`width * height`).
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    color_buffer: Vec<f32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
    depth_compare: DepthCompare,
}

impl FrameBuffer {
    /// Allocates buffers with a black color buffer and a cleared depth buffer.
    ///
    /// # Errors
    /// Returns [`RenderError::InvalidViewport`] if either dimension is zero.
    pub fn new(width: u32, height: u32, depth_compare: DepthCompare) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidViewport { width, height });
        }
        let size = width as usize * height as usize;
        debug!("allocating {width}x{height} frame buffer");
        Ok(Self {
            color_buffer: vec![0.0; size * 3],
            depth_buffer: vec![depth_compare.far(); size],
            width,
            height,
            depth_compare,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth_compare(&self) -> DepthCompare {
        self.depth_compare
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Set a pixel at (x, y) with depth testing.
    ///
    /// The pixel is only written if `depth` wins the configured comparison
    /// against the depth already stored there. Silently ignores out-of-bounds
    /// coordinates. Returns whether the pixel was written.
    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color, depth: f32) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        if !self.depth_compare.passes(depth, self.depth_buffer[idx]) {
            return false;
        }
        self.depth_buffer[idx] = depth;
        self.color_buffer[idx * 3..idx * 3 + 3].copy_from_slice(&[color.r, color.g, color.b]);
        true
    }

    /// Fill every pixel with `color` and reset every depth to the far value.
    pub fn clear(&mut self, color: Color) {
        for pixel in self.color_buffer.chunks_exact_mut(3) {
            pixel.copy_from_slice(&[color.r, color.g, color.b]);
        }
        self.depth_buffer.fill(self.depth_compare.far());
    }

    /// Get the color at (x, y), or None if out of bounds.
    pub fn color_at(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|idx| {
            let c = &self.color_buffer[idx * 3..idx * 3 + 3];
            Color::rgb(c[0], c[1], c[2])
        })
    }

    /// Get the stored depth at (x, y), or None if out of bounds.
    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|idx| self.depth_buffer[idx])
    }

    /// The raw color channels, row-major RGB.
    pub fn color_buffer(&self) -> &[f32] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// Quantizes the color buffer into an 8-bit RGB image.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let idx = (y * self.width + x) as usize * 3;
            let c = &self.color_buffer[idx..idx + 3];
            image::Rgb(Color::rgb(c[0], c[1], c[2]).to_rgb8())
        })
    }
}
