use super::ring_point;
use crate::float_types::{PI, Real};
use crate::mesh::{Face, Mesh};
use nalgebra::Point3;

/// UV sphere around local Z.
///
/// ## Vertex Layout
/// `[north pole, south pole, ring 1, …, ring R−1]` where ring `k` sits at polar
/// angle `πk/R` and holds `S` vertices in the shared ring convention.
///
/// ## Face Order
/// Top triangle fan (face 0 is `[north, ring1[0], ring1[1]]`), quads ring by
/// ring, bottom triangle fan. `S·R` faces, `2 + S·(R−1)` vertices.
pub fn uv_sphere(segments: usize, rings: usize, radius: Real) -> Mesh {
    let (s, r) = (segments, rings);
    let mut vertices = Vec::with_capacity(2 + s * (r - 1));
    vertices.push(Point3::new(0.0, 0.0, radius));
    vertices.push(Point3::new(0.0, 0.0, -radius));
    for k in 1..r {
        let polar = PI * k as Real / r as Real;
        let z = radius * polar.cos();
        let rho = radius * polar.sin();
        vertices.extend((0..s).map(|i| ring_point(rho, i, s, z)));
    }

    let ring = |k: usize, i: usize| 2 + (k - 1) * s + i % s;
    let mut faces = Vec::with_capacity(s * r);
    for i in 0..s {
        faces.push(Face::new(vec![0, ring(1, i), ring(1, i + 1)]));
    }
    for k in 1..r - 1 {
        for i in 0..s {
            faces.push(Face::new(vec![
                ring(k, i),
                ring(k + 1, i),
                ring(k + 1, i + 1),
                ring(k, i + 1),
            ]));
        }
    }
    for i in 0..s {
        faces.push(Face::new(vec![1, ring(r - 1, i + 1), ring(r - 1, i)]));
    }

    Mesh {
        vertices,
        faces,
        loose_edges: Vec::new(),
        uvs: None,
    }
}
