//! Projection of a mesh into screen-space primitive lists.
//!
//! [`project`] multiplies the camera transform by the composed object
//! transform, pushes every vertex and normal through the result, performs the
//! homogeneous divide and emits 2D line segments for the mesh edges and any
//! enabled indicator overlays. Emission order is fixed, so two calls with the
//! same inputs produce identical lists.

use log::debug;

use crate::math::{mat4::Mat4, vec2::Vec2, vec3::Vec3, vec4::Vec4};
use crate::mesh::Mesh;
use crate::transform::ComposedTransform;

/// Smallest |w| used as a divisor. Points closer to the `w = 0` plane are
/// divided by `±W_EPSILON` instead, keeping the sign of `w`.
pub const W_EPSILON: f32 = 1e-6;

/// Corner pairs of the 12 bounding box edges, indexing [`Mesh::bounding_box`].
const BOUNDING_BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// A 2D line segment in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }
}

/// Which optional lists a projection emits, and how long indicator lines are.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawOptions {
    pub draw_vertex_normals: bool,
    pub draw_face_normals: bool,
    pub draw_bounding_box: bool,
    pub draw_axis: bool,
    /// Reuse the full object matrix for the axis indicators instead of the
    /// rotation-free axis matrix, so the gizmo follows the object's rotation.
    pub axis_tracks_object: bool,
    pub vertex_normals_scale: f32,
    pub face_normals_scale: f32,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            draw_vertex_normals: false,
            draw_face_normals: false,
            draw_bounding_box: false,
            draw_axis: false,
            axis_tracks_object: false,
            vertex_normals_scale: 1.0,
            face_normals_scale: 1.0,
        }
    }
}

/// Output of one projection. Lists whose option is off are `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScreenPrimitives {
    /// Projected vertices, `x`/`y` in screen space and `z` as depth.
    pub vertices: Vec<Vec3>,
    /// Normals pushed through the same matrix as the vertices.
    pub normals: Vec<Vec3>,
    /// Three per face: v1-v2, v2-v3, v1-v3.
    pub edges: Vec<Segment>,
    /// Three per face, one per corner.
    pub vertex_normals: Option<Vec<Segment>>,
    /// One per face, starting at the face centroid.
    pub face_normals: Option<Vec<Segment>>,
    pub bounding_box: Option<Vec<Segment>>,
    /// X, Y and Z, in that order.
    pub axis: Option<Vec<Segment>>,
}

/// Homogeneous divide with the near-zero `w` clamp. Returns the point and
/// whether the clamp kicked in.
fn project_point(matrix: &Mat4, p: Vec3) -> (Vec3, bool) {
    let v = *matrix * Vec4::from(p);
    if v.w.abs() < W_EPSILON {
        (v.divide_by(W_EPSILON.copysign(v.w)), true)
    } else {
        (v.divide_by(v.w), false)
    }
}

struct Projector {
    matrix: Mat4,
    clamped: usize,
}

impl Projector {
    fn new(matrix: Mat4) -> Self {
        Self { matrix, clamped: 0 }
    }

    fn point(&mut self, p: Vec3) -> Vec3 {
        let (out, clamped) = project_point(&self.matrix, p);
        self.clamped += clamped as usize;
        out
    }

    fn segments(&mut self, points: &[Vec3], pairs: &[(usize, usize)]) -> Vec<Segment> {
        let projected: Vec<Vec3> = points.iter().map(|&p| self.point(p)).collect();
        pairs
            .iter()
            .map(|&(a, b)| Segment::new(projected[a].xy(), projected[b].xy()))
            .collect()
    }
}

/// Projects `mesh` through `camera * transform.object`.
///
/// Vertex normal indicators use the mesh's untransformed normals, anchored at
/// the projected vertex. Face normal indicators point along the negated cross
/// product of the projected edges `p2 - p1` and `p3 - p1`.
pub fn project(
    mesh: &Mesh,
    transform: &ComposedTransform,
    camera: &Mat4,
    options: &DrawOptions,
) -> ScreenPrimitives {
    let matrix = *camera * transform.object;
    let mut projector = Projector::new(matrix);

    let vertices: Vec<Vec3> = mesh.vertices().iter().map(|&v| projector.point(v)).collect();
    let normals: Vec<Vec3> = mesh.normals().iter().map(|&n| projector.point(n)).collect();

    let faces_count = mesh.faces_count();
    let mut edges = Vec::with_capacity(faces_count * 3);
    let mut vertex_normals = options
        .draw_vertex_normals
        .then(|| Vec::with_capacity(faces_count * 3));
    let mut face_normals = options
        .draw_face_normals
        .then(|| Vec::with_capacity(faces_count));

    for face in mesh.faces() {
        let [p1, p2, p3] = face.vertex_indices().map(|i| vertices[i]);
        let (v1, v2, v3) = (p1.xy(), p2.xy(), p3.xy());

        edges.push(Segment::new(v1, v2));
        edges.push(Segment::new(v2, v3));
        edges.push(Segment::new(v1, v3));

        if let Some(out) = vertex_normals.as_mut() {
            let scale = options.vertex_normals_scale;
            for (anchor, n) in [v1, v2, v3].into_iter().zip(face.normal_indices()) {
                let normal = mesh.normals()[n].xy();
                out.push(Segment::new(anchor, anchor + normal * scale));
            }
        }

        if let Some(out) = face_normals.as_mut() {
            let normal = (p2 - p1).cross(p3 - p1);
            let centroid = (v1 + v2 + v3) / 3.0;
            out.push(Segment::new(
                centroid,
                centroid + (normal * -options.face_normals_scale).xy(),
            ));
        }
    }

    let bounding_box = options
        .draw_bounding_box
        .then(|| projector.segments(mesh.bounding_box(), &BOUNDING_BOX_EDGES));

    let axis = options.draw_axis.then(|| {
        let base = if options.axis_tracks_object {
            matrix
        } else {
            *camera * transform.axis
        };
        let mut axis_projector = Projector::new(base);
        let segments = axis_projector.segments(mesh.axis(), &[(0, 1), (2, 3), (4, 5)]);
        projector.clamped += axis_projector.clamped;
        segments
    });

    if projector.clamped > 0 {
        debug!(
            "{}: clamped w for {} point(s) near the w = 0 plane",
            mesh.name(),
            projector.clamped
        );
    }

    ScreenPrimitives {
        vertices,
        normals,
        edges,
        vertex_normals,
        face_normals,
        bounding_box,
        axis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{cube, Face};
    use crate::transform::TransformState;
    use approx::assert_relative_eq;

    fn unit_triangle() -> Mesh {
        Mesh::new(
            "tri",
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![Face::from_one_based([1, 2, 3], [1, 2, 3]).unwrap()],
        )
        .unwrap()
    }

    fn identity_projection(mesh: &Mesh, options: &DrawOptions) -> ScreenPrimitives {
        project(
            mesh,
            &TransformState::default().compose(),
            &Mat4::identity(),
            options,
        )
    }

    fn all_on() -> DrawOptions {
        DrawOptions {
            draw_vertex_normals: true,
            draw_face_normals: true,
            draw_bounding_box: true,
            draw_axis: true,
            ..DrawOptions::default()
        }
    }

    #[test]
    fn identity_projection_preserves_vertices() {
        let mesh = cube();
        let out = identity_projection(&mesh, &DrawOptions::default());
        assert_eq!(out.vertices, mesh.vertices());
    }

    #[test]
    fn edges_follow_face_order() {
        let mesh = unit_triangle();
        let out = identity_projection(&mesh, &DrawOptions::default());
        let (a, b, c) = (Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0));
        assert_eq!(
            out.edges,
            vec![Segment::new(a, b), Segment::new(b, c), Segment::new(a, c)]
        );
    }

    #[test]
    fn disabled_lists_are_none() {
        let out = identity_projection(&cube(), &DrawOptions::default());
        assert_eq!(out.edges.len(), 36);
        assert!(out.vertex_normals.is_none());
        assert!(out.face_normals.is_none());
        assert!(out.bounding_box.is_none());
        assert!(out.axis.is_none());
    }

    #[test]
    fn enabled_lists_have_expected_lengths() {
        let out = identity_projection(&cube(), &all_on());
        assert_eq!(out.vertex_normals.map(|v| v.len()), Some(36));
        assert_eq!(out.face_normals.map(|v| v.len()), Some(12));
        assert_eq!(out.bounding_box.map(|v| v.len()), Some(12));
        assert_eq!(out.axis.map(|v| v.len()), Some(3));
    }

    #[test]
    fn face_normal_starts_at_centroid_with_inverted_cross_product() {
        let mesh = unit_triangle();
        let options = DrawOptions {
            draw_face_normals: true,
            face_normals_scale: 2.0,
            ..DrawOptions::default()
        };
        let out = identity_projection(&mesh, &options);
        let segment = out.face_normals.unwrap()[0];
        assert_relative_eq!(segment.start.x, 1.0 / 3.0);
        assert_relative_eq!(segment.start.y, 1.0 / 3.0);
        // The cross product is (0, 0, 1); negated and scaled it has no x/y part.
        assert_relative_eq!(segment.end.x, segment.start.x);
        assert_relative_eq!(segment.end.y, segment.start.y);
    }

    #[test]
    fn face_normal_sign_is_inverted() {
        // Tilted triangle whose cross product has an x/y component.
        let mesh = Mesh::new(
            "tilted",
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            vec![Vec3::UP],
            vec![Face::new([0, 1, 2], [0, 0, 0])],
        )
        .unwrap();
        let options = DrawOptions {
            draw_face_normals: true,
            ..DrawOptions::default()
        };
        let segment = identity_projection(&mesh, &options).face_normals.unwrap()[0];
        // U x V = (1,0,0) x (0,0,1) = (0,-1,0); inverted it points up.
        assert_relative_eq!(segment.end.y - segment.start.y, 1.0);
        assert_relative_eq!(segment.end.x - segment.start.x, 0.0);
    }

    #[test]
    fn vertex_normals_use_untransformed_normals() {
        let mesh = unit_triangle();
        let mut state = TransformState::default();
        state.local.lock_scale(10.0);
        let options = DrawOptions {
            draw_vertex_normals: true,
            vertex_normals_scale: 0.5,
            ..DrawOptions::default()
        };
        let out = project(&mesh, &state.compose(), &Mat4::identity(), &options);
        let normals = out.vertex_normals.unwrap();
        assert_eq!(normals.len(), 3);
        // Anchors move with the scaled vertices, the normals do not scale.
        assert_eq!(normals[0], Segment::new(Vec2::ZERO, Vec2::ZERO));
        assert_eq!(
            normals[1],
            Segment::new(Vec2::new(10.0, 0.0), Vec2::new(10.5, 0.0))
        );
        assert_eq!(
            normals[2],
            Segment::new(Vec2::new(0.0, 10.0), Vec2::new(0.0, 10.5))
        );
    }

    #[test]
    fn bounding_box_edges_use_projected_corners() {
        let mesh = cube();
        let options = DrawOptions {
            draw_bounding_box: true,
            ..DrawOptions::default()
        };
        let out = identity_projection(&mesh, &options);
        let edges = out.bounding_box.unwrap();
        assert_eq!(
            edges[0],
            Segment::new(Vec2::new(-1.0, -1.0), Vec2::new(-1.0, 1.0))
        );
        assert_eq!(
            edges[8],
            Segment::new(Vec2::new(-1.0, -1.0), Vec2::new(-1.0, -1.0))
        );
    }

    #[test]
    fn axis_ignores_rotation_unless_tracking_object() {
        let mesh = cube();
        let mut state = TransformState::default();
        state.local.set_rotation_xyz(0.0, 0.0, 90.0);
        let composed = state.compose();

        let mut options = DrawOptions {
            draw_axis: true,
            ..DrawOptions::default()
        };
        let fixed = project(&mesh, &composed, &Mat4::identity(), &options)
            .axis
            .unwrap();
        assert_eq!(fixed[0], Segment::new(Vec2::ZERO, Vec2::new(1.0, 0.0)));

        options.axis_tracks_object = true;
        let tracked = project(&mesh, &composed, &Mat4::identity(), &options)
            .axis
            .unwrap();
        assert_relative_eq!(tracked[0].end.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(tracked[0].end.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn camera_applies_after_object_transform() {
        let mesh = unit_triangle();
        let mut state = TransformState::default();
        state.local.lock_scale(2.0);
        let camera = Mat4::translation(Vec3::new(5.0, 0.0, 0.0));
        let out = project(&mesh, &state.compose(), &camera, &DrawOptions::default());
        assert_eq!(out.vertices[1], Vec3::new(7.0, 0.0, 0.0));
    }

    #[test]
    fn perspective_divide_uses_w() {
        let mesh = unit_triangle();
        // w = 2 for every point.
        let camera = Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 2.0],
        ]);
        let out = project(
            &mesh,
            &TransformState::default().compose(),
            &camera,
            &DrawOptions::default(),
        );
        assert_eq!(out.vertices[1], Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn vanishing_w_is_clamped() {
        let mesh = unit_triangle();
        let camera = Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
        ]);
        let out = project(
            &mesh,
            &TransformState::default().compose(),
            &camera,
            &DrawOptions::default(),
        );
        assert!(out.vertices.iter().all(|v| v.x.is_finite() && v.y.is_finite()));
        assert_relative_eq!(out.vertices[1].x, 1.0 / W_EPSILON);
    }
}
