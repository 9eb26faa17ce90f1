use crate::float_types::{PI, Real, TAU};
use crate::mesh::{Edge, Face, Mesh, edge_key};
use nalgebra::Point3;
use std::collections::HashMap;

/// **Icosphere by midpoint subdivision**
///
/// ## Vertex Layout
/// ```text
/// 0        north pole (+Z)
/// 1        south pole
/// 2..=6    upper ring, azimuth 2πk/5 (vertex 2 on +X)
/// 7..=11   lower ring, azimuth 2πk/5 + π/5
/// 12..     edge midpoints, appended level by level
/// ```
/// Subdivision level 1 is the bare icosahedron (20 faces); each further level
/// splits every triangle in four, so `F = 20·4^(s−1)`. The twelve original
/// vertices keep degree 5, every midpoint has degree 6.
pub fn icosphere(subdivisions: usize, radius: Real) -> Mesh {
    let ring_z = radius / (5.0 as Real).sqrt();
    let ring_rho = 2.0 * ring_z;

    let mut vertices = vec![Point3::new(0.0, 0.0, radius), Point3::new(0.0, 0.0, -radius)];
    for (offset, z) in [(0.0, ring_z), (PI / 5.0, -ring_z)] {
        for k in 0..5 {
            let azimuth = TAU * k as Real / 5.0 + offset;
            vertices.push(Point3::new(ring_rho * azimuth.cos(), ring_rho * azimuth.sin(), z));
        }
    }

    let upper = |k: usize| 2 + k % 5;
    let lower = |k: usize| 7 + k % 5;
    let mut triangles: Vec<[usize; 3]> = Vec::with_capacity(20);
    for k in 0..5 {
        triangles.push([0, upper(k), upper(k + 1)]);
        triangles.push([upper(k), lower(k), upper(k + 1)]);
        triangles.push([upper(k + 1), lower(k), lower(k + 1)]);
        triangles.push([1, lower(k + 1), lower(k)]);
    }

    for _ in 1..subdivisions {
        let mut midpoints: HashMap<Edge, usize> = HashMap::new();
        let mut midpoint = |vertices: &mut Vec<Point3<Real>>, a: usize, b: usize| -> usize {
            *midpoints.entry(edge_key(a, b)).or_insert_with(|| {
                let mid = Point3::from((vertices[a].coords + vertices[b].coords) / 2.0);
                let projected = mid
                    .coords
                    .try_normalize(Real::EPSILON)
                    .map_or(mid, |dir| Point3::from(dir * radius));
                vertices.push(projected);
                vertices.len() - 1
            })
        };

        let mut refined = Vec::with_capacity(triangles.len() * 4);
        for [a, b, c] in triangles {
            let ab = midpoint(&mut vertices, a, b);
            let bc = midpoint(&mut vertices, b, c);
            let ca = midpoint(&mut vertices, c, a);
            refined.push([a, ab, ca]);
            refined.push([ab, b, bc]);
            refined.push([ca, bc, c]);
            refined.push([ab, bc, ca]);
        }
        triangles = refined;
    }

    Mesh {
        vertices,
        faces: triangles
            .into_iter()
            .map(|t| Face::new(t.to_vec()))
            .collect(),
        loose_edges: Vec::new(),
        uvs: None,
    }
}
