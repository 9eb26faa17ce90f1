use crate::float_types::{Real, TAU};
use crate::mesh::{Face, Mesh};
use nalgebra::Point3;

/// Torus around local Z.
///
/// Vertex `j·m + i` lies on minor ring `j` (major angle `θ = 2πj/M`) at tube
/// angle `ψ = 2πi/m`, so vertices `0..m` form the first minor ring centered
/// on +X and vertices 0 and 1 are adjacent on it. Every face is a quad.
pub fn torus(
    major_segments: usize,
    minor_segments: usize,
    major_radius: Real,
    minor_radius: Real,
) -> Mesh {
    let (big_m, m) = (major_segments, minor_segments);
    let mut vertices = Vec::with_capacity(big_m * m);
    for j in 0..big_m {
        let theta = TAU * j as Real / big_m as Real;
        for i in 0..m {
            let psi = TAU * i as Real / m as Real;
            let rho = major_radius + minor_radius * psi.cos();
            vertices.push(Point3::new(
                rho * theta.cos(),
                rho * theta.sin(),
                minor_radius * psi.sin(),
            ));
        }
    }

    let index = |j: usize, i: usize| (j % big_m) * m + i % m;
    let mut faces = Vec::with_capacity(big_m * m);
    for j in 0..big_m {
        for i in 0..m {
            faces.push(Face::new(vec![
                index(j, i),
                index(j + 1, i),
                index(j + 1, i + 1),
                index(j, i + 1),
            ]));
        }
    }

    Mesh {
        vertices,
        faces,
        loose_edges: Vec::new(),
        uvs: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Topology;

    #[test]
    fn torus_is_all_degree_four_quads() {
        let mesh = torus(12, 6, 1.0, 0.25);
        assert_eq!(mesh.vertices.len(), 72);
        assert!(mesh.all_faces_have(4));
        let histogram = Topology::new(&mesh).degree_histogram();
        assert_eq!(histogram.into_iter().collect::<Vec<_>>(), vec![(4, 72)]);
        // vertex 0 is the outermost point on +X
        assert!((mesh.vertices[0] - Point3::new(1.25, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn outer_face_points_outward() {
        let mesh = torus(8, 4, 2.0, 0.5);
        assert!(mesh.face_normal(0).x > 0.0);
    }
}
