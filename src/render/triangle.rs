//! Triangle rasterization with barycentric coverage and depth.
//!
//! For an edge from point A to point B, the edge function at point P is:
//!
//! ```text
//! E(P) = (P.x - A.x) * (B.y - A.y) - (P.y - A.y) * (B.x - A.x)
//! ```
//!
//! Dividing the edge function of the edge opposite each vertex by the signed
//! area `E_AB(C)` gives that vertex's barycentric weight. The division makes
//! the weights winding-independent: inside points have all three weights
//! non-negative whichever way the triangle is wound.
//!
//! Pixels are sampled at their integer coordinates. A pixel exactly on an edge
//! belongs to the triangle only when that edge is a top or left edge, so two
//! triangles sharing an edge never both cover the pixels along it.

use super::framebuffer::DepthCompare;
use super::renderer::Renderer;
use crate::colors::Color;
use crate::math::vec3::Vec3;

#[inline]
fn edge_function(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

/// Whether `a -> b` is a top or left edge of a triangle wound so that its
/// interior has positive edge functions. Screen y grows downward.
#[inline]
fn is_top_left(a: Vec3, b: Vec3) -> bool {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    dy > 0.0 || (dy == 0.0 && dx < 0.0)
}

/// Barycentric weights of `p` with respect to `(v0, v1, v2)`, or `None` for a
/// degenerate (zero-area) triangle.
pub fn barycentric(v0: Vec3, v1: Vec3, v2: Vec3, p: Vec3) -> Option<[f32; 3]> {
    let area = edge_function(v0, v1, v2);
    if area.abs() < f32::EPSILON {
        return None;
    }
    Some([
        edge_function(v1, v2, p) / area,
        edge_function(v2, v0, p) / area,
        edge_function(v0, v1, p) / area,
    ])
}

/// Inclusive pixel bounds of a screen-space rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PixelRect {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl Renderer {
    /// Fills the triangle `p1 p2 p3`, or with `bounding_box_mode` set, outlines
    /// its viewport-clipped bounding rectangle instead.
    ///
    /// `x`/`y` are screen coordinates and `z` is the depth, interpolated across
    /// the triangle with the barycentric weights. Degenerate triangles and
    /// triangles with non-finite coordinates draw nothing.
    pub fn draw_triangle(
        &mut self,
        p1: Vec3,
        p2: Vec3,
        p3: Vec3,
        color: Color,
        bounding_box_mode: bool,
    ) {
        let finite = |p: Vec3| p.x.is_finite() && p.y.is_finite() && p.z.is_finite();
        if !(finite(p1) && finite(p2) && finite(p3)) {
            return;
        }
        let Some(rect) = self.clipped_bounds(p1, p2, p3) else {
            return;
        };

        if bounding_box_mode {
            self.outline_rect(rect, nearest_depth(self.depth_compare(), p1, p2, p3), color);
            return;
        }

        let area = edge_function(p1, p2, p3);
        if area.abs() < f32::EPSILON {
            return;
        }
        // Wind the triangle so inside points have positive edge functions.
        let (p2, p3, area) = if area < 0.0 {
            (p3, p2, -area)
        } else {
            (p2, p3, area)
        };
        let inv_area = 1.0 / area;
        let owned = [is_top_left(p2, p3), is_top_left(p3, p1), is_top_left(p1, p2)];

        for y in rect.min_y..=rect.max_y {
            for x in rect.min_x..=rect.max_x {
                let p = Vec3::new(x as f32, y as f32, 0.0);
                let e = [
                    edge_function(p2, p3, p),
                    edge_function(p3, p1, p),
                    edge_function(p1, p2, p),
                ];
                let inside = e
                    .iter()
                    .zip(owned)
                    .all(|(&e, owned)| e > 0.0 || (e == 0.0 && owned));
                if inside {
                    let depth = (e[0] * p1.z + e[1] * p2.z + e[2] * p3.z) * inv_area;
                    self.put_pixel(x, y, color, depth);
                }
            }
        }
    }

    /// The triangle's bounding box in whole pixels, clipped to the viewport.
    fn clipped_bounds(&self, p1: Vec3, p2: Vec3, p3: Vec3) -> Option<PixelRect> {
        let max_x = (self.viewport_width() - 1) as f32;
        let max_y = (self.viewport_height() - 1) as f32;
        // Clamp in float space first so huge coordinates cannot saturate.
        let rect = PixelRect {
            min_x: p1.x.min(p2.x).min(p3.x).ceil().max(0.0) as i32,
            min_y: p1.y.min(p2.y).min(p3.y).ceil().max(0.0) as i32,
            max_x: p1.x.max(p2.x).max(p3.x).floor().min(max_x) as i32,
            max_y: p1.y.max(p2.y).max(p3.y).floor().min(max_y) as i32,
        };
        (rect.min_x <= rect.max_x && rect.min_y <= rect.max_y).then_some(rect)
    }

    fn outline_rect(&mut self, rect: PixelRect, depth: f32, color: Color) {
        let corner = |x: i32, y: i32| Vec3::new(x as f32, y as f32, depth);
        let top_left = corner(rect.min_x, rect.min_y);
        let top_right = corner(rect.max_x, rect.min_y);
        let bottom_right = corner(rect.max_x, rect.max_y);
        let bottom_left = corner(rect.min_x, rect.max_y);
        self.draw_line(top_left, top_right, color);
        self.draw_line(top_right, bottom_right, color);
        self.draw_line(bottom_right, bottom_left, color);
        self.draw_line(bottom_left, top_left, color);
    }
}

/// The vertex depth closest to the viewer under `compare`.
fn nearest_depth(compare: DepthCompare, p1: Vec3, p2: Vec3, p3: Vec3) -> f32 {
    match compare {
        DepthCompare::Less | DepthCompare::LessEqual => p1.z.min(p2.z).min(p3.z),
        DepthCompare::Greater => p1.z.max(p2.z).max(p3.z),
    }
}
