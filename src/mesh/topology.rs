//! Vertex/edge/face adjacency and the loop-walking rules built on it.

use super::{Edge, Mesh, edge_key};
use crate::float_types::{Real, tolerance};
use nalgebra::Vector3;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// How a vertex whose faces are all triangles sits in the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanKind {
    /// Coplanar fan: the center vertex of a triangle-fan cap
    Center,
    /// Non-coplanar closed fan: a cone tip or a sphere pole
    Apex,
}

/// Adjacency tables for one mesh snapshot.
#[derive(Debug, Clone)]
pub struct Topology {
    neighbours: Vec<Vec<usize>>,
    vertex_faces: Vec<Vec<usize>>,
    edge_faces: HashMap<Edge, Vec<usize>>,
}

impl Topology {
    pub fn new(mesh: &Mesh) -> Self {
        let n = mesh.vertices.len();
        let mut neighbour_sets = vec![BTreeSet::new(); n];
        for (a, b) in mesh.edges() {
            if a < n && b < n && a != b {
                neighbour_sets[a].insert(b);
                neighbour_sets[b].insert(a);
            }
        }

        let mut vertex_faces = vec![Vec::new(); n];
        let mut edge_faces: HashMap<Edge, Vec<usize>> = HashMap::new();
        for (face_index, face) in mesh.faces.iter().enumerate() {
            for &i in &face.indices {
                if i < n {
                    vertex_faces[i].push(face_index);
                }
            }
            for edge in face.edges() {
                edge_faces.entry(edge).or_default().push(face_index);
            }
        }

        Topology {
            neighbours: neighbour_sets
                .into_iter()
                .map(|set| set.into_iter().collect())
                .collect(),
            vertex_faces,
            edge_faces,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.neighbours.len()
    }

    /// Number of distinct edges at `v`.
    pub fn degree(&self, v: usize) -> usize {
        self.neighbours.get(v).map_or(0, Vec::len)
    }

    /// Sorted neighbour indices of `v`.
    pub fn neighbours(&self, v: usize) -> &[usize] {
        self.neighbours.get(v).map_or(&[], Vec::as_slice)
    }

    pub fn faces_of_vertex(&self, v: usize) -> &[usize] {
        self.vertex_faces.get(v).map_or(&[], Vec::as_slice)
    }

    pub fn faces_of_edge(&self, a: usize, b: usize) -> &[usize] {
        self.edge_faces
            .get(&edge_key(a, b))
            .map_or(&[], Vec::as_slice)
    }

    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbours(a).binary_search(&b).is_ok()
    }

    /// degree → number of vertices with that degree
    pub fn degree_histogram(&self) -> BTreeMap<usize, usize> {
        let mut histogram = BTreeMap::new();
        for v in 0..self.vertex_count() {
            *histogram.entry(self.degree(v)).or_insert(0) += 1;
        }
        histogram
    }

    fn edges_share_face(&self, first: Edge, second: Edge) -> bool {
        let a = self.faces_of_edge(first.0, first.1);
        let b = self.faces_of_edge(second.0, second.1);
        a.iter().any(|f| b.contains(f))
    }

    /// Every vertex has two neighbours and they all chain into one closed loop.
    pub fn is_single_cycle(&self, mesh: &Mesh) -> bool {
        let n = self.vertex_count();
        if n < 3 || (0..n).any(|v| self.degree(v) != 2) {
            return false;
        }
        self.walk_loop(mesh, 0, self.neighbours[0][0], None)
            .is_some_and(|ring| ring.len() == n)
    }

    /// Classify `v` as a fan center or an apex. Vertices touching any
    /// non-triangle, or whose fan is open, are neither.
    pub fn fan_kind(&self, mesh: &Mesh, v: usize) -> Option<FanKind> {
        let faces = self.faces_of_vertex(v);
        if faces.len() < 3 || faces.len() != self.degree(v) {
            return None;
        }
        if faces.iter().any(|&f| mesh.faces[f].len() != 3) {
            return None;
        }
        if self
            .neighbours(v)
            .iter()
            .any(|&w| self.faces_of_edge(v, w).len() != 2)
        {
            return None;
        }

        let first = mesh.face_normal(faces[0]);
        let coplanar = faces[1..]
            .iter()
            .all(|&f| first.dot(&mesh.face_normal(f)) > 1.0 - tolerance());
        Some(if coplanar {
            FanKind::Center
        } else {
            FanKind::Apex
        })
    }

    /// Pick the vertex that continues the loop `prev → cur`.
    ///
    /// With an `axis`, only edges perpendicular to it qualify. Remaining ties
    /// are broken by dropping edges that share a face with the incoming edge,
    /// which continues straight across a quad strip. Returns `None` when no
    /// unique continuation exists.
    fn next_in_loop(
        &self,
        mesh: &Mesh,
        prev: usize,
        cur: usize,
        axis: Option<&Vector3<Real>>,
    ) -> Option<usize> {
        let mut candidates: Vec<usize> = self
            .neighbours(cur)
            .iter()
            .copied()
            .filter(|&w| w != prev)
            .collect();

        if let Some(axis) = axis.and_then(|a| a.try_normalize(Real::EPSILON)) {
            let origin = mesh.vertices[cur];
            candidates.retain(|&w| {
                let direction = mesh.vertices[w] - origin;
                direction
                    .try_normalize(Real::EPSILON)
                    .is_some_and(|d| d.dot(&axis).abs() < tolerance())
            });
        }

        if candidates.len() > 1 {
            let incoming = edge_key(prev, cur);
            candidates.retain(|&w| !self.edges_share_face(incoming, edge_key(cur, w)));
        }

        match candidates.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Walk the closed loop through adjacent seeds `a`, `b`. The result starts
    /// with `a, b` and lists each loop vertex once.
    pub fn walk_loop(
        &self,
        mesh: &Mesh,
        a: usize,
        b: usize,
        axis: Option<&Vector3<Real>>,
    ) -> Option<Vec<usize>> {
        if !self.are_adjacent(a, b) {
            return None;
        }
        let mut ring = vec![a, b];
        let mut visited: HashSet<usize> = ring.iter().copied().collect();
        let (mut prev, mut cur) = (a, b);
        loop {
            let next = self.next_in_loop(mesh, prev, cur, axis)?;
            if next == a {
                return Some(ring);
            }
            if !visited.insert(next) {
                return None;
            }
            ring.push(next);
            prev = cur;
            cur = next;
        }
    }

    /// Walk an open path `start → next → …` across quad strips until a vertex
    /// satisfying `stop` is reached. Both ends are included.
    pub fn walk_path<F>(
        &self,
        mesh: &Mesh,
        start: usize,
        next: usize,
        stop: F,
    ) -> Option<Vec<usize>>
    where
        F: Fn(usize) -> bool,
    {
        if !self.are_adjacent(start, next) {
            return None;
        }
        let mut path = vec![start, next];
        let mut visited: HashSet<usize> = path.iter().copied().collect();
        let (mut prev, mut cur) = (start, next);
        while !stop(cur) {
            let step = self.next_in_loop(mesh, prev, cur, None)?;
            if !visited.insert(step) {
                return None;
            }
            path.push(step);
            prev = cur;
            cur = step;
        }
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    /// Open tube of `n` quads between two square rings, no caps.
    fn open_tube(n: usize) -> Mesh {
        let mut vertices = Vec::new();
        for i in 0..n {
            let angle = crate::float_types::TAU * i as Real / n as Real;
            vertices.push(Point3::new(angle.cos(), angle.sin(), -1.0));
            vertices.push(Point3::new(angle.cos(), angle.sin(), 1.0));
        }
        let faces = (0..n)
            .map(|i| {
                let j = (i + 1) % n;
                vec![2 * i, 2 * j, 2 * j + 1, 2 * i + 1]
            })
            .collect();
        Mesh::from_faces(vertices, faces)
    }

    #[test]
    fn histogram_of_open_tube() {
        let topology = Topology::new(&open_tube(6));
        let histogram = topology.degree_histogram();
        assert_eq!(histogram.get(&3), Some(&12));
        assert_eq!(histogram.len(), 1);
    }

    #[test]
    fn ring_walk_stays_on_one_end() {
        let mesh = open_tube(5);
        let topology = Topology::new(&mesh);
        let axis = Vector3::z();
        let ring = topology
            .walk_loop(&mesh, 0, 2, Some(&axis))
            .expect("bottom ring");
        assert_eq!(ring, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn path_walk_crosses_the_strip() {
        let mesh = open_tube(4);
        let topology = Topology::new(&mesh);
        let path = topology
            .walk_path(&mesh, 0, 1, |v| v % 2 == 1)
            .expect("path");
        assert_eq!(path, vec![0, 1]);
    }

    #[test]
    fn fan_center_and_apex() {
        // square pyramid: apex 4 over a square base, base filled with a fan around 5
        let mesh = Mesh::from_faces(
            vec![
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(-1.0, 0.0, 0.0),
                Point3::new(0.0, -1.0, 0.0),
                Point3::new(0.0, 0.0, 2.0),
                Point3::new(0.0, 0.0, 0.0),
            ],
            vec![
                vec![0, 1, 4],
                vec![1, 2, 4],
                vec![2, 3, 4],
                vec![3, 0, 4],
                vec![1, 0, 5],
                vec![2, 1, 5],
                vec![3, 2, 5],
                vec![0, 3, 5],
            ],
        );
        let topology = Topology::new(&mesh);
        assert_eq!(topology.fan_kind(&mesh, 4), Some(FanKind::Apex));
        assert_eq!(topology.fan_kind(&mesh, 5), Some(FanKind::Center));
        assert_eq!(topology.fan_kind(&mesh, 0), Some(FanKind::Apex));
    }

    #[test]
    fn single_cycle_of_loose_edges() {
        let mut mesh = Mesh::new();
        for i in 0..4 {
            let angle = crate::float_types::TAU * i as Real / 4.0;
            mesh.vertices.push(Point3::new(angle.cos(), angle.sin(), 0.0));
        }
        mesh.loose_edges = vec![[0, 1], [1, 2], [2, 3], [3, 0]];
        assert!(Topology::new(&mesh).is_single_cycle(&mesh));
        mesh.loose_edges.pop();
        assert!(!Topology::new(&mesh).is_single_cycle(&mesh));
    }
}
