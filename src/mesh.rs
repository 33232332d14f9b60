//! Immutable mesh geometry.
//!
//! A [`Mesh`] owns its vertices, normals and faces, plus the bounds derived
//! from them once at construction. Faces reference the arrays by index; every
//! index is validated when the mesh is built, so later lookups cannot go out
//! of range.

use thiserror::Error;

use crate::math::vec3::Vec3;

/// Which array a face index points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Vertex,
    Normal,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::Vertex => write!(f, "vertex"),
            IndexKind::Normal => write!(f, "normal"),
        }
    }
}

/// Invalid mesh data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("{kind} index 0 in a 1-based face reference")]
    ZeroIndex { kind: IndexKind },

    #[error("face {face}: {kind} index {index} (slot {slot}) out of bounds for {len} {kind}s")]
    InvalidFaceIndex {
        face: usize,
        slot: usize,
        kind: IndexKind,
        index: usize,
        len: usize,
    },
}

// The members are indices into the vertex and normal arrays of the owning
// mesh, stored 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    vertices: [usize; 3],
    normals: [usize; 3],
}

impl Face {
    /// Builds a face from 0-based indices.
    pub const fn new(vertices: [usize; 3], normals: [usize; 3]) -> Self {
        Self { vertices, normals }
    }

    /// Builds a face from 1-based indices, as mesh files store them.
    pub fn from_one_based(vertices: [usize; 3], normals: [usize; 3]) -> Result<Self, MeshError> {
        let shift = |indices: [usize; 3], kind| -> Result<[usize; 3], MeshError> {
            let mut out = [0; 3];
            for (dst, &src) in out.iter_mut().zip(indices.iter()) {
                *dst = src.checked_sub(1).ok_or(MeshError::ZeroIndex { kind })?;
            }
            Ok(out)
        };
        Ok(Self {
            vertices: shift(vertices, IndexKind::Vertex)?,
            normals: shift(normals, IndexKind::Normal)?,
        })
    }

    /// 0-based vertex index of corner `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= 3`.
    #[inline]
    pub fn vertex_index(&self, i: usize) -> usize {
        self.vertices[i]
    }

    /// 0-based normal index of corner `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= 3`.
    #[inline]
    pub fn normal_index(&self, i: usize) -> usize {
        self.normals[i]
    }

    pub fn vertex_indices(&self) -> [usize; 3] {
        self.vertices
    }

    pub fn normal_indices(&self) -> [usize; 3] {
        self.normals
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    faces: Vec<Face>,
    min_coordinates: Vec3,
    max_coordinates: Vec3,
    bounding_box: [Vec3; 8],
    axis: [Vec3; 6],
    max_scale: f32,
}

impl Mesh {
    /// Builds a mesh and derives its bounds.
    ///
    /// Fails if any face refers past the end of the vertex or normal array.
    /// A mesh without vertices gets all-zero bounds.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vec3>,
        normals: Vec<Vec3>,
        faces: Vec<Face>,
    ) -> Result<Self, MeshError> {
        for (face_index, face) in faces.iter().enumerate() {
            check_indices(face_index, face.vertices, IndexKind::Vertex, vertices.len())?;
            check_indices(face_index, face.normals, IndexKind::Normal, normals.len())?;
        }

        Ok(Self::build(name.into(), vertices, normals, faces))
    }

    fn build(name: String, vertices: Vec<Vec3>, normals: Vec<Vec3>, faces: Vec<Face>) -> Self {
        let (min, max) = match vertices.split_first() {
            Some((first, rest)) => rest
                .iter()
                .fold((*first, *first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
            None => (Vec3::ZERO, Vec3::ZERO),
        };

        let bounding_box = [
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, min.y, min.z),
        ];

        let axis = [
            Vec3::ZERO,
            Vec3::new(max.x, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::new(0.0, max.y, 0.0),
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, max.z),
        ];

        Self {
            name,
            vertices,
            normals,
            faces,
            min_coordinates: min,
            max_coordinates: max,
            bounding_box,
            axis,
            max_scale: (max - min).max_element(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face(&self, index: usize) -> Option<&Face> {
        self.faces.get(index)
    }

    pub fn faces_count(&self) -> usize {
        self.faces.len()
    }

    pub fn min_coordinates(&self) -> Vec3 {
        self.min_coordinates
    }

    pub fn max_coordinates(&self) -> Vec3 {
        self.max_coordinates
    }

    /// The 8 box corners: the `max.z` ring first, then the `min.z` ring, each
    /// ordered (min,min) (min,max) (max,max) (max,min) in x/y.
    pub fn bounding_box(&self) -> &[Vec3; 8] {
        &self.bounding_box
    }

    /// Axis indicator endpoints, as pairs: X, Y, then Z, each from the origin
    /// to the mesh's maximum along that axis.
    pub fn axis(&self) -> &[Vec3; 6] {
        &self.axis
    }

    /// Largest extent of the mesh along any axis.
    pub fn max_scale(&self) -> f32 {
        self.max_scale
    }
}

fn check_indices(
    face: usize,
    indices: [usize; 3],
    kind: IndexKind,
    len: usize,
) -> Result<(), MeshError> {
    match indices.iter().position(|&index| index >= len) {
        Some(slot) => Err(MeshError::InvalidFaceIndex {
            face,
            slot,
            kind,
            index: indices[slot],
            len,
        }),
        None => Ok(()),
    }
}

const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
];

// One normal per cube side: front, right, back, left, top, bottom.
const CUBE_NORMALS: [Vec3; 6] = [
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
];

// 1-based vertex triples, two per side, in CUBE_NORMALS order.
const CUBE_FACES: [[usize; 3]; 12] = [
    [1, 2, 3],
    [1, 3, 4],
    [4, 3, 5],
    [4, 5, 6],
    [6, 5, 7],
    [6, 7, 8],
    [8, 7, 2],
    [8, 2, 1],
    [2, 7, 5],
    [2, 5, 3],
    [6, 8, 1],
    [6, 1, 4],
];

/// A 2x2x2 cube centered on the origin.
pub fn cube() -> Mesh {
    let faces = CUBE_FACES
        .iter()
        .enumerate()
        .map(|(i, &[a, b, c])| Face::new([a - 1, b - 1, c - 1], [i / 2; 3]))
        .collect();
    Mesh::build(
        "cube".to_string(),
        CUBE_VERTICES.to_vec(),
        CUBE_NORMALS.to_vec(),
        faces,
    )
}
