//! Wavefront OBJ loading.
//!
//! Each object/group in the file becomes one [`Mesh`]. Polygons are
//! triangulated on load. Objects that carry no normals get one flat normal
//! per face, computed from the face's winding.

use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::math::vec3::Vec3;
use crate::mesh::{Face, Mesh, MeshError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load OBJ file {}", path.display())]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("object '{name}' has invalid face data")]
    Mesh {
        name: String,
        #[source]
        source: MeshError,
    },
}

/// Loads every object of an OBJ file as a separate mesh.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Vec<Mesh>, LoadError> {
    let path = path.as_ref();
    let options = tobj::LoadOptions {
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &options).map_err(|source| LoadError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let meshes = models
        .iter()
        .map(mesh_from_obj)
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "loaded {} mesh(es) from {}: {} faces",
        meshes.len(),
        path.display(),
        meshes.iter().map(Mesh::faces_count).sum::<usize>()
    );
    Ok(meshes)
}

fn to_vec3s(flat: &[f32]) -> Vec<Vec3> {
    flat.chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
        .collect()
}

fn triples(indices: &[u32]) -> impl Iterator<Item = [usize; 3]> + '_ {
    indices
        .chunks_exact(3)
        .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
}

fn mesh_from_obj(model: &tobj::Model) -> Result<Mesh, LoadError> {
    let obj = &model.mesh;
    let vertices = to_vec3s(&obj.positions);

    let has_normals = !obj.normals.is_empty() && obj.normal_indices.len() == obj.indices.len();
    let (normals, faces) = if has_normals {
        let faces = triples(&obj.indices)
            .zip(triples(&obj.normal_indices))
            .map(|(v, n)| Face::new(v, n))
            .collect();
        (to_vec3s(&obj.normals), faces)
    } else {
        warn!("{}: no normals, generating flat face normals", model.name);
        flat_normals(&vertices, &obj.indices)
    };

    Mesh::new(model.name.clone(), vertices, normals, faces).map_err(|source| LoadError::Mesh {
        name: model.name.clone(),
        source,
    })
}

/// One normal per face from `(b - a) x (c - a)`. Faces with out-of-range
/// indices get a zero normal and are rejected later by [`Mesh::new`].
fn flat_normals(vertices: &[Vec3], indices: &[u32]) -> (Vec<Vec3>, Vec<Face>) {
    triples(indices)
        .enumerate()
        .map(|(i, v)| {
            let normal = match v.map(|index| vertices.get(index)) {
                [Some(&a), Some(&b), Some(&c)] => {
                    let n = (b - a).cross(c - a);
                    let length = n.magnitude();
                    if length > f32::EPSILON {
                        n / length
                    } else {
                        Vec3::ZERO
                    }
                }
                _ => Vec3::ZERO,
            };
            (normal, Face::new(v, [i; 3]))
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn write_obj(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_positions_normals_and_faces() {
        let file = write_obj(
            "o tri\n\
             v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             vn 0 0 1\n\
             f 1//1 2//1 3//1\n",
        );
        let meshes = load_obj(file.path()).unwrap();
        assert_eq!(meshes.len(), 1);

        let mesh = &meshes[0];
        assert_eq!(mesh.name(), "tri");
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.normals(), &[Vec3::new(0.0, 0.0, 1.0)]);
        assert_eq!(mesh.faces_count(), 1);
        assert_eq!(mesh.face(0).unwrap().vertex_indices(), [0, 1, 2]);
        assert_eq!(mesh.face(0).unwrap().normal_indices(), [0, 0, 0]);
        assert_eq!(mesh.max_coordinates(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn quads_are_triangulated() {
        let file = write_obj(
            "o quad\n\
             v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             vn 0 0 1\n\
             f 1//1 2//1 3//1 4//1\n",
        );
        let meshes = load_obj(file.path()).unwrap();
        assert_eq!(meshes[0].faces_count(), 2);
    }

    #[test]
    fn missing_normals_are_generated_per_face() {
        let file = write_obj(
            "o bare\n\
             v 0 0 0\nv 2 0 0\nv 0 2 0\n\
             f 1 2 3\n",
        );
        let mesh = &load_obj(file.path()).unwrap()[0];
        assert_eq!(mesh.normals().len(), 1);
        let n = mesh.normals()[0];
        assert_relative_eq!(n.x, 0.0);
        assert_relative_eq!(n.y, 0.0);
        assert_relative_eq!(n.z, 1.0);
        assert_eq!(mesh.face(0).unwrap().normal_indices(), [0, 0, 0]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_obj("/nonexistent/model.obj").unwrap_err();
        assert!(matches!(err, LoadError::Obj { .. }));
        assert!(err.to_string().contains("/nonexistent/model.obj"));
    }

    #[test]
    fn each_object_becomes_a_mesh() {
        let file = write_obj(
            "o first\n\
             v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             f 1 2 3\n\
             o second\n\
             v 0 0 1\nv 1 0 1\nv 0 1 1\n\
             f 4 5 6\n",
        );
        let meshes = load_obj(file.path()).unwrap();
        let names: Vec<_> = meshes.iter().map(Mesh::name).collect();
        assert_eq!(names, ["first", "second"]);
        // Each object only keeps its own vertices.
        assert_eq!(meshes[1].vertices().len(), 3);
        assert_eq!(meshes[1].min_coordinates().z, 1.0);
    }
}
