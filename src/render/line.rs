//! Line rasterization.
//!
//! Lines are stepped with integer error accumulation, split into a shallow
//! routine (|dy| < |dx|, stepping along x) and a steep routine (stepping along
//! y). Each routine swaps its endpoints so it always walks in the positive
//! direction of its major axis, which covers all eight octants and makes a
//! line touch the same pixels whichever endpoint is passed first.

use super::renderer::Renderer;
use crate::colors::Color;
use crate::math::vec3::Vec3;

/// An integer pixel position with the depth to test there.
#[derive(Clone, Copy, Debug)]
struct PixelPoint {
    x: i32,
    y: i32,
    depth: f32,
}

impl PixelPoint {
    fn from_vec3(p: Vec3) -> Self {
        Self {
            x: p.x.round() as i32,
            y: p.y.round() as i32,
            depth: p.z,
        }
    }
}

#[inline]
fn lerp_depth(from: f32, to: f32, step: i32, steps: i32) -> f32 {
    if steps == 0 {
        from
    } else {
        from + (to - from) * (step as f32 / steps as f32)
    }
}

/// Clips the segment to the rectangle `[-1, width] x [-1, height]` using the
/// Liang-Barsky parametric test. Endpoints already inside come back
/// unchanged; a clipped endpoint lands exactly on the boundary it was clipped
/// against. Returns `None` when the segment misses the rectangle.
pub(crate) fn clip_segment(a: Vec3, b: Vec3, width: u32, height: u32) -> Option<(Vec3, Vec3)> {
    let (x_min, y_min) = (-1.0f32, -1.0f32);
    let (x_max, y_max) = (width as f32, height as f32);
    let d = b - a;
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    let (mut snap0, mut snap1) = (None, None);

    for (p, q, boundary) in [
        (-d.x, a.x - x_min, Boundary::X(x_min)),
        (d.x, x_max - a.x, Boundary::X(x_max)),
        (-d.y, a.y - y_min, Boundary::Y(y_min)),
        (d.y, y_max - a.y, Boundary::Y(y_max)),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            if r > t0 {
                t0 = r;
                snap0 = Some(boundary);
            }
        } else {
            if r < t0 {
                return None;
            }
            if r < t1 {
                t1 = r;
                snap1 = Some(boundary);
            }
        }
    }

    let start = snap0.map_or(a, |boundary| boundary.snap(a + d * t0));
    let end = snap1.map_or(b, |boundary| boundary.snap(a + d * t1));
    Some((start, end))
}

#[derive(Clone, Copy, Debug)]
enum Boundary {
    X(f32),
    Y(f32),
}

impl Boundary {
    fn snap(self, mut p: Vec3) -> Vec3 {
        match self {
            Boundary::X(x) => p.x = x,
            Boundary::Y(y) => p.y = y,
        }
        p
    }
}

impl Renderer {
    /// Draws a line between two points, depth-testing every pixel.
    ///
    /// `x`/`y` are rounded to the nearest pixel; `z` is the depth, linearly
    /// interpolated along the major axis. Parts outside the viewport are
    /// clipped before stepping; non-finite endpoints draw nothing.
    pub fn draw_line(&mut self, p1: Vec3, p2: Vec3, color: Color) {
        let finite = |p: Vec3| p.x.is_finite() && p.y.is_finite() && p.z.is_finite();
        if !finite(p1) || !finite(p2) {
            return;
        }

        // A fixed endpoint order keeps clipping and rounding identical for
        // both directions.
        let (a, b) = if (p1.x, p1.y) <= (p2.x, p2.y) {
            (p1, p2)
        } else {
            (p2, p1)
        };
        let Some((a, b)) = clip_segment(a, b, self.viewport_width(), self.viewport_height())
        else {
            return;
        };

        let (a, b) = (PixelPoint::from_vec3(a), PixelPoint::from_vec3(b));
        if (b.y - a.y).abs() < (b.x - a.x).abs() {
            if a.x > b.x {
                self.draw_line_low(b, a, color);
            } else {
                self.draw_line_low(a, b, color);
            }
        } else if a.y > b.y {
            self.draw_line_high(b, a, color);
        } else {
            self.draw_line_high(a, b, color);
        }
    }

    /// Shallow slope: one pixel per x step, `from.x <= to.x`.
    fn draw_line_low(&mut self, from: PixelPoint, to: PixelPoint, color: Color) {
        let dx = to.x - from.x;
        let mut dy = to.y - from.y;
        let mut y_step = 1;
        if dy < 0 {
            y_step = -1;
            dy = -dy;
        }

        let mut error = 2 * dy - dx;
        let mut y = from.y;
        for (step, x) in (from.x..=to.x).enumerate() {
            let depth = lerp_depth(from.depth, to.depth, step as i32, dx);
            self.put_pixel(x, y, color, depth);
            if error > 0 {
                y += y_step;
                error += 2 * (dy - dx);
            } else {
                error += 2 * dy;
            }
        }
    }

    /// Steep slope: one pixel per y step, `from.y <= to.y`.
    fn draw_line_high(&mut self, from: PixelPoint, to: PixelPoint, color: Color) {
        let mut dx = to.x - from.x;
        let dy = to.y - from.y;
        let mut x_step = 1;
        if dx < 0 {
            x_step = -1;
            dx = -dx;
        }

        let mut error = 2 * dx - dy;
        let mut x = from.x;
        for (step, y) in (from.y..=to.y).enumerate() {
            let depth = lerp_depth(from.depth, to.depth, step as i32, dy);
            self.put_pixel(x, y, color, depth);
            if error > 0 {
                x += x_step;
                error += 2 * (dx - dy);
            } else {
                error += 2 * dx;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, WHITE};
    use approx::assert_relative_eq;

    fn touched(renderer: &Renderer) -> Vec<(i32, i32)> {
        let (w, h) = (renderer.viewport_width() as i32, renderer.viewport_height() as i32);
        let mut out = Vec::new();
        for y in 0..h {
            for x in 0..w {
                if renderer.frame_buffer().color_at(x, y) != Some(BLACK) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    fn line_pixels(p1: Vec3, p2: Vec3) -> Vec<(i32, i32)> {
        let mut renderer = Renderer::new(32, 32).unwrap();
        renderer.draw_line(p1, p2, WHITE);
        touched(&renderer)
    }

    #[test]
    fn horizontal_and_vertical_lines() {
        let h = line_pixels(Vec3::new(2.0, 5.0, 0.0), Vec3::new(6.0, 5.0, 0.0));
        assert_eq!(h, (2..=6).map(|x| (x, 5)).collect::<Vec<_>>());

        let v = line_pixels(Vec3::new(3.0, 1.0, 0.0), Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(v, vec![(3, 1), (3, 2), (3, 3), (3, 4)]);
    }

    #[test]
    fn single_point_line() {
        let p = Vec3::new(7.0, 7.0, 0.0);
        assert_eq!(line_pixels(p, p), vec![(7, 7)]);
    }

    #[test]
    fn diagonal_line() {
        let d = line_pixels(Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 4.0, 0.0));
        assert_eq!(d, (0..=4).map(|i| (i, i)).collect::<Vec<_>>());
    }

    #[test]
    fn every_octant_is_symmetric_and_connected() {
        let center = Vec3::new(16.0, 16.0, 0.0);
        let targets = [
            (29.0, 20.0),
            (20.0, 29.0),
            (12.0, 29.0),
            (3.0, 20.0),
            (3.0, 12.0),
            (12.0, 3.0),
            (20.0, 3.0),
            (29.0, 12.0),
        ];
        for (x, y) in targets {
            let end = Vec3::new(x, y, 0.0);
            let forward = line_pixels(center, end);
            let backward = line_pixels(end, center);
            assert_eq!(forward, backward, "octant towards ({x}, {y})");
            assert!(forward.contains(&(16, 16)));
            assert!(forward.contains(&(x as i32, y as i32)));

            let dx = (x as i32 - 16).abs();
            let dy = (y as i32 - 16).abs();
            assert_eq!(forward.len() as i32, dx.max(dy) + 1);
        }
    }

    #[test]
    fn depth_is_interpolated_along_the_line() {
        let mut renderer = Renderer::new(16, 16).unwrap();
        renderer.draw_line(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 1.0), WHITE);
        let fb = renderer.frame_buffer();
        assert_relative_eq!(fb.depth_at(0, 0).unwrap(), 0.0);
        assert_relative_eq!(fb.depth_at(5, 0).unwrap(), 0.5);
        assert_relative_eq!(fb.depth_at(10, 0).unwrap(), 1.0);
    }

    #[test]
    fn line_respects_depth_test() {
        let mut renderer = Renderer::new(16, 16).unwrap();
        let red = Color::rgb(1.0, 0.0, 0.0);
        renderer.draw_line(Vec3::new(0.0, 4.0, 1.0), Vec3::new(15.0, 4.0, 1.0), red);
        renderer.draw_line(Vec3::new(0.0, 4.0, 2.0), Vec3::new(15.0, 4.0, 2.0), WHITE);
        assert_eq!(renderer.frame_buffer().color_at(8, 4), Some(red));
    }

    #[test]
    fn offscreen_segments_are_clipped() {
        let pixels = line_pixels(Vec3::new(-1.0e9, 10.0, 0.0), Vec3::new(1.0e9, 10.0, 0.0));
        assert_eq!(pixels, (0..32).map(|x| (x, 10)).collect::<Vec<_>>());

        assert!(line_pixels(Vec3::new(-50.0, -50.0, 0.0), Vec3::new(-10.0, -5.0, 0.0)).is_empty());
    }

    #[test]
    fn non_finite_endpoints_draw_nothing() {
        let pixels = line_pixels(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::new(5.0, 5.0, 0.0));
        assert!(pixels.is_empty());
    }

    #[test]
    fn clip_keeps_inside_endpoints() {
        let a = Vec3::new(1.0, 2.0, 0.3);
        let b = Vec3::new(5.0, 7.0, 0.9);
        assert_eq!(clip_segment(a, b, 10, 10), Some((a, b)));
    }
}
