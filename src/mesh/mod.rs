//! `Mesh` struct: an indexed polygon soup whose vertex ORDER is meaningful.
//!
//! Generators emit vertices in a fixed, documented sequence (see
//! [`crate::shapes`]); the classifier and the extractors read fixed index
//! positions out of it. Edit operations in [`edit`] append new vertices at the
//! end so that the generator's prefix stays stable.

use crate::errors::ValidationError;
use crate::float_types::{Real, TAU, tolerance};
use crate::math;
use nalgebra::{Matrix4, Point3, Vector3};
use std::collections::{BTreeSet, HashMap};

pub mod edit;
pub mod topology;

pub use topology::{FanKind, Topology};

/// An undirected edge stored with the smaller index first.
pub type Edge = (usize, usize);

#[inline]
pub const fn edge_key(a: usize, b: usize) -> Edge {
    if a < b { (a, b) } else { (b, a) }
}

/// One polygon of the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub indices: Vec<usize>,
    /// Smooth shading flag
    pub smooth: bool,
}

impl Face {
    pub const fn new(indices: Vec<usize>) -> Self {
        Face {
            indices,
            smooth: false,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Edges of the closed loop, in winding order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let n = self.indices.len();
        (0..n).map(move |i| edge_key(self.indices[i], self.indices[(i + 1) % n]))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions in object-local space
    pub vertices: Vec<Point3<Real>>,
    pub faces: Vec<Face>,
    /// Edges that belong to no face (an unfilled circle is nothing but these)
    pub loose_edges: Vec<[usize; 2]>,
    /// Optional per-vertex texture coordinates
    pub uvs: Option<Vec<[Real; 2]>>,
}

impl Mesh {
    pub const fn new() -> Self {
        Mesh {
            vertices: Vec::new(),
            faces: Vec::new(),
            loose_edges: Vec::new(),
            uvs: None,
        }
    }

    /// Build a mesh from raw positions and face index lists.
    pub fn from_faces(vertices: Vec<Point3<Real>>, faces: Vec<Vec<usize>>) -> Self {
        Mesh {
            vertices,
            faces: faces.into_iter().map(Face::new).collect(),
            loose_edges: Vec::new(),
            uvs: None,
        }
    }

    /// Check index ranges, face sizes, repeated corners, duplicate faces and
    /// coordinate finiteness.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let count = self.vertices.len();

        for p in &self.vertices {
            if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
                return Err(ValidationError::InvalidCoordinate(*p));
            }
        }

        let mut seen: HashMap<Vec<usize>, usize> = HashMap::new();
        for (face_index, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(ValidationError::TooFewPoints(face_index));
            }
            let mut corners = BTreeSet::new();
            for &index in &face.indices {
                if index >= count {
                    return Err(ValidationError::IndexOutOfRange {
                        element: face_index,
                        index,
                        count,
                    });
                }
                if !corners.insert(index) {
                    return Err(ValidationError::RepeatedPoint {
                        face: face_index,
                        index,
                    });
                }
            }
            let key: Vec<usize> = corners.into_iter().collect();
            if let Some(&first) = seen.get(&key) {
                return Err(ValidationError::DuplicateFace(face_index, first));
            }
            seen.insert(key, face_index);
        }

        for (edge_index, edge) in self.loose_edges.iter().enumerate() {
            for &index in edge {
                if index >= count {
                    return Err(ValidationError::IndexOutOfRange {
                        element: edge_index,
                        index,
                        count,
                    });
                }
            }
        }

        Ok(())
    }

    /// All distinct edges: face edges plus loose edges.
    pub fn edges(&self) -> BTreeSet<Edge> {
        let mut edges: BTreeSet<Edge> = self.faces.iter().flat_map(Face::edges).collect();
        edges.extend(self.loose_edges.iter().map(|&[a, b]| edge_key(a, b)));
        edges
    }

    pub fn face_points(&self, face: usize) -> Vec<Point3<Real>> {
        self.faces[face]
            .indices
            .iter()
            .map(|&i| self.vertices[i])
            .collect()
    }

    /// Newell normal of a face.
    pub fn face_normal(&self, face: usize) -> Vector3<Real> {
        math::newell_normal(&self.face_points(face))
    }

    pub fn points(&self, indices: &[usize]) -> Vec<Point3<Real>> {
        indices.iter().map(|&i| self.vertices[i]).collect()
    }

    /// Median point of all vertices (the "geometry median" origin).
    pub fn median(&self) -> Point3<Real> {
        math::centroid(&self.vertices)
    }

    pub fn all_faces_have(&self, corners: usize) -> bool {
        !self.faces.is_empty() && self.faces.iter().all(|f| f.len() == corners)
    }

    /// Every face normal points the same way: the mesh is a flat disk.
    pub fn normals_uniform(&self) -> bool {
        if self.faces.is_empty() {
            return true;
        }
        let first = self.face_normal(0);
        (1..self.faces.len()).all(|f| first.dot(&self.face_normal(f)) > 1.0 - tolerance())
    }

    /// Multiply every vertex by a homogeneous matrix.
    pub fn transform(&mut self, matrix: &Matrix4<Real>) {
        for p in &mut self.vertices {
            *p = matrix.transform_point(p);
        }
    }

    pub fn translate(&mut self, offset: &Vector3<Real>) {
        for p in &mut self.vertices {
            *p += offset;
        }
    }

    /// Set every face's smooth-shading flag.
    pub fn set_smooth(&mut self, smooth: bool) {
        for face in &mut self.faces {
            face.smooth = smooth;
        }
    }

    /// Cylindrical projection around local Z: `u` follows the azimuth,
    /// `v` the normalized height.
    pub fn project_uvs(&mut self) {
        let (min_z, max_z) = self
            .vertices
            .iter()
            .fold((Real::MAX, Real::MIN), |(lo, hi), p| (lo.min(p.z), hi.max(p.z)));
        let height = max_z - min_z;
        let uvs = self
            .vertices
            .iter()
            .map(|p| {
                let u = p.y.atan2(p.x) / TAU + 0.5;
                let v = if height > Real::EPSILON {
                    (p.z - min_z) / height
                } else {
                    0.5
                };
                [u, v]
            })
            .collect();
        self.uvs = Some(uvs);
    }

    /// Select the full loop through two adjacent seed vertices.
    ///
    /// `axis` restricts the walk to edges perpendicular to it, which is how
    /// planar rings are told apart from side edges on cylinders and cones.
    pub fn select_ring_from_seed_vertices(
        &self,
        seeds: [usize; 2],
        axis: Option<&Vector3<Real>>,
    ) -> Option<Vec<usize>> {
        Topology::new(self).walk_loop(self, seeds[0], seeds[1], axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh::from_faces(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
        )
    }

    #[test]
    fn validate_accepts_simple_quad() {
        assert_eq!(quad().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_bad_indices() {
        let mut mesh = quad();
        mesh.faces.push(Face::new(vec![0, 1, 7]));
        assert!(matches!(
            mesh.validate(),
            Err(ValidationError::IndexOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_faces() {
        let mut mesh = quad();
        mesh.faces.push(Face::new(vec![2, 3, 0, 1]));
        assert_eq!(mesh.validate(), Err(ValidationError::DuplicateFace(1, 0)));
    }

    #[test]
    fn validate_rejects_repeated_corner() {
        let mut mesh = quad();
        mesh.faces[0] = Face::new(vec![0, 1, 1]);
        assert!(matches!(
            mesh.validate(),
            Err(ValidationError::RepeatedPoint { face: 0, index: 1 })
        ));
    }

    #[test]
    fn edges_merge_face_and_loose_edges() {
        let mut mesh = quad();
        mesh.vertices.push(Point3::new(2.0, 0.0, 0.0));
        mesh.loose_edges.push([1, 4]);
        let edges = mesh.edges();
        assert_eq!(edges.len(), 5);
        assert!(edges.contains(&(1, 4)));
        assert!(edges.contains(&(0, 3)));
    }

    #[test]
    fn face_normal_follows_winding() {
        let mesh = quad();
        assert!((mesh.face_normal(0) - Vector3::z()).norm() < 1e-12);
    }
}
