//! Mesh edit operations used while analysing and rebuilding primitives:
//! hole filling, face deletion, plane bisection and volume centroid.

use super::{Edge, Face, Mesh, Topology, edge_key};
use crate::float_types::{Real, tolerance};
use nalgebra::{Point3, Vector3};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// What [`Mesh::delete_faces`] takes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Remove the faces, keep their edges as wire
    FacesOnly,
    /// Remove the faces' edges and every face that uses one of them
    Edges,
}

const COPLANAR: i8 = 0;
const FRONT: i8 = 1;
const BACK: i8 = 2;
const SPANNING: i8 = 3;

impl Mesh {
    /// Close every boundary loop with a single n-gon.
    ///
    /// Boundary edges are face edges used by exactly one face, plus loose
    /// edges. New faces wind opposite to their neighbours so normals stay
    /// consistent. Returns the number of faces added; new faces are appended.
    pub fn fill_boundary_holes(&mut self) -> usize {
        let topology = Topology::new(self);
        let mut next: BTreeMap<usize, usize> = BTreeMap::new();

        for face in &self.faces {
            let n = face.len();
            for i in 0..n {
                let (u, v) = (face.indices[i], face.indices[(i + 1) % n]);
                if topology.faces_of_edge(u, v).len() == 1 {
                    next.insert(v, u);
                }
            }
        }
        for &[a, b] in &self.loose_edges {
            if !next.contains_key(&a) {
                next.insert(a, b);
            } else if !next.contains_key(&b) {
                next.insert(b, a);
            }
        }

        let mut visited = BTreeSet::new();
        let mut added = Vec::new();
        for &start in next.keys() {
            if visited.contains(&start) {
                continue;
            }
            let mut hole = vec![start];
            visited.insert(start);
            let mut closed = false;
            let mut cur = start;
            while let Some(&step) = next.get(&cur) {
                if step == start {
                    closed = true;
                    break;
                }
                if !visited.insert(step) {
                    break;
                }
                hole.push(step);
                cur = step;
            }
            if closed && hole.len() >= 3 {
                added.push(Face::new(hole));
            }
        }

        let count = added.len();
        if count > 0 {
            let filled: BTreeSet<Edge> = added.iter().flat_map(Face::edges).collect();
            self.loose_edges
                .retain(|&[a, b]| !filled.contains(&edge_key(a, b)));
            self.faces.extend(added);
            log::trace!("filled {count} boundary hole(s)");
        }
        count
    }

    /// Delete faces by index. Returns how many faces were removed.
    pub fn delete_faces(&mut self, faces: &[usize], mode: DeleteMode) -> usize {
        let selected: BTreeSet<usize> = faces
            .iter()
            .copied()
            .filter(|&f| f < self.faces.len())
            .collect();
        if selected.is_empty() {
            return 0;
        }

        let selected_edges: BTreeSet<Edge> = selected
            .iter()
            .flat_map(|&f| self.faces[f].edges().collect::<Vec<_>>())
            .collect();

        let doomed: BTreeSet<usize> = match mode {
            DeleteMode::FacesOnly => selected,
            DeleteMode::Edges => self
                .faces
                .iter()
                .enumerate()
                .filter(|(_, face)| face.edges().any(|e| selected_edges.contains(&e)))
                .map(|(i, _)| i)
                .collect(),
        };

        let before = self.faces.len();
        let mut index = 0;
        self.faces.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });

        match mode {
            DeleteMode::FacesOnly => {
                let remaining: BTreeSet<Edge> = self.faces.iter().flat_map(Face::edges).collect();
                let mut loose: BTreeSet<Edge> = self
                    .loose_edges
                    .iter()
                    .map(|&[a, b]| edge_key(a, b))
                    .collect();
                for edge in selected_edges {
                    if !remaining.contains(&edge) && loose.insert(edge) {
                        self.loose_edges.push([edge.0, edge.1]);
                    }
                }
            },
            DeleteMode::Edges => {
                self.loose_edges
                    .retain(|&[a, b]| !selected_edges.contains(&edge_key(a, b)));
            },
        }

        before - self.faces.len()
    }

    /// Cut every face crossing the plane through `point` with `normal`,
    /// inserting one shared vertex per crossed edge. No geometry is removed.
    ///
    /// New vertices are appended after the existing ones; a split face keeps
    /// its slot for the back half and the front half is appended. Returns the
    /// number of vertices inserted.
    pub fn bisect_at_plane(&mut self, point: &Point3<Real>, normal: &Vector3<Real>) -> usize {
        let Some(normal) = normal.try_normalize(Real::EPSILON) else {
            return 0;
        };
        let w = normal.dot(&point.coords);
        let eps = tolerance();

        let types: Vec<i8> = self
            .vertices
            .iter()
            .map(|p| {
                let d = normal.dot(&p.coords) - w;
                if d > eps {
                    FRONT
                } else if d < -eps {
                    BACK
                } else {
                    COPLANAR
                }
            })
            .collect();

        let first_new = self.vertices.len();
        let mut cache: HashMap<Edge, usize> = HashMap::new();
        let mut split_edge = |mesh: &mut Mesh, a: usize, b: usize| -> usize {
            *cache.entry(edge_key(a, b)).or_insert_with(|| {
                let (pa, pb) = (mesh.vertices[a], mesh.vertices[b]);
                let t = (w - normal.dot(&pa.coords)) / normal.dot(&(pb - pa));
                mesh.vertices.push(pa + (pb - pa) * t);
                if let Some(uvs) = mesh.uvs.as_mut() {
                    let (ua, ub) = (uvs[a], uvs[b]);
                    uvs.push([ua[0] + (ub[0] - ua[0]) * t, ua[1] + (ub[1] - ua[1]) * t]);
                }
                mesh.vertices.len() - 1
            })
        };

        let mut appended = Vec::new();
        for face_index in 0..self.faces.len() {
            let face = self.faces[face_index].clone();
            let polygon_type = face.indices.iter().fold(COPLANAR, |acc, &i| acc | types[i]);
            if polygon_type != SPANNING {
                continue;
            }

            let n = face.len();
            let mut front = Vec::new();
            let mut back = Vec::new();
            for i in 0..n {
                let (a, b) = (face.indices[i], face.indices[(i + 1) % n]);
                let (ta, tb) = (types[a], types[b]);
                if ta != BACK {
                    front.push(a);
                }
                if ta != FRONT {
                    back.push(a);
                }
                if (ta | tb) == SPANNING {
                    let v = split_edge(self, a, b);
                    front.push(v);
                    back.push(v);
                }
            }

            if back.len() >= 3 && front.len() >= 3 {
                self.faces[face_index] = Face {
                    indices: back,
                    smooth: face.smooth,
                };
                appended.push(Face {
                    indices: front,
                    smooth: face.smooth,
                });
            }
        }
        self.faces.extend(appended);

        let loose = std::mem::take(&mut self.loose_edges);
        for [a, b] in loose {
            if (types[a] | types[b]) == SPANNING {
                let v = split_edge(self, a, b);
                self.loose_edges.push([a, v]);
                self.loose_edges.push([v, b]);
            } else {
                self.loose_edges.push([a, b]);
            }
        }

        self.vertices.len() - first_new
    }

    /// Centroid of the enclosed volume. Only meaningful for closed meshes;
    /// returns `None` when the signed volume vanishes.
    pub fn volume_centroid(&self) -> Option<Point3<Real>> {
        let reference = self.median();
        let mut volume = 0.0;
        let mut weighted = Vector3::zeros();
        for face in &self.faces {
            let a = self.vertices[face.indices[0]];
            for k in 1..face.len().saturating_sub(1) {
                let b = self.vertices[face.indices[k]];
                let c = self.vertices[face.indices[k + 1]];
                let v = (a - reference).dot(&(b - reference).cross(&(c - reference))) / 6.0;
                let center = (reference.coords + a.coords + b.coords + c.coords) / 4.0;
                volume += v;
                weighted += center * v;
            }
        }
        if volume.abs() < Real::EPSILON {
            return None;
        }
        Some(Point3::from(weighted / volume))
    }
}
