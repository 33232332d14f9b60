//! Linear RGB colors stored as three `f32` channels in `[0, 1]`.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Quantizes to 8-bit channels, clamping out-of-range values.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
pub const BACKGROUND: Color = Color::rgb(0.12, 0.12, 0.12);
pub const FILL: Color = Color::rgb(0.55, 0.55, 0.6);
pub const WIREFRAME: Color = Color::rgb(0.9, 0.9, 0.9);
pub const VERTEX_NORMAL: Color = Color::rgb(0.2, 0.8, 1.0);
pub const FACE_NORMAL: Color = Color::rgb(1.0, 0.4, 0.8);
pub const BOUNDING_BOX: Color = Color::rgb(1.0, 0.85, 0.2);
pub const AXIS_X: Color = Color::rgb(1.0, 0.0, 0.0);
pub const AXIS_Y: Color = Color::rgb(0.0, 1.0, 0.0);
pub const AXIS_Z: Color = Color::rgb(0.0, 0.0, 1.0);
