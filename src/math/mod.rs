//! Small linear-algebra kit used by the transform and projection code.

pub mod mat4;
pub mod vec2;
pub mod vec3;
pub mod vec4;
