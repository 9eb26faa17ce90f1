use super::ring_point;
use crate::float_types::Real;
use crate::mesh::{Face, Mesh};
use crate::params::FillType;
use nalgebra::Point3;

/// Flat circle in the XY plane.
///
/// ## Vertex Layout
/// - `TriangleFan`: center at index 0, ring at `1..=N`
/// - otherwise: ring at `0..N`
///
/// `None` stores the ring as loose edges only. `NGon` is a single face and
/// every fan triangle is wound with a +Z normal.
pub fn circle(vertices: usize, radius: Real, fill: FillType) -> Mesh {
    let mut mesh = Mesh::new();
    if fill == FillType::TriangleFan {
        mesh.vertices.push(Point3::origin());
    }
    let base = mesh.vertices.len();
    mesh.vertices
        .extend((0..vertices).map(|i| ring_point(radius, i, vertices, 0.0)));

    let ring = |i: usize| base + i % vertices;
    match fill {
        FillType::None => {
            mesh.loose_edges = (0..vertices).map(|i| [ring(i), ring(i + 1)]).collect();
        },
        FillType::NGon => {
            mesh.faces.push(Face::new((0..vertices).map(ring).collect()));
        },
        FillType::TriangleFan => {
            mesh.faces = (0..vertices)
                .map(|i| Face::new(vec![0, ring(i), ring(i + 1)]))
                .collect();
        },
    }
    mesh
}
