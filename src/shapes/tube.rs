use super::ring_point;
use crate::float_types::Real;
use crate::mesh::{Face, Mesh};
use crate::params::FillType;
use nalgebra::Point3;

/// **Cylinder / cone / frustum along local Z**
///
/// Bottom ring at `z = −depth/2` with `radius_bottom`, top ring at
/// `z = +depth/2` with `radius_top`. A zero radius collapses that end to a
/// single apex vertex.
///
/// ## Vertex Layout
/// ```text
/// [bottom center]?  [top center]?   (TriangleFan only, non-apex ends only)
/// b0 t0 b1 t1 b2 t2 ...             (both rings)
/// b0 apex b1 b2 ...                 (radius_top = 0)
/// apex t0 t1 t2 ...                 (radius_bottom = 0)
/// ```
/// With `base` leading centers, `(base, base+2)` are adjacent on the bottom
/// ring and `(base+1, base+3)` on the top ring. `base+1` and `base+2` are
/// adjacent only when one end is an apex.
///
/// ## Face Order
/// Side faces (quads, or triangles to an apex), then the bottom cap
/// (normal −Z), then the top cap (normal +Z).
pub fn tube(
    vertices: usize,
    radius_bottom: Real,
    radius_top: Real,
    depth: Real,
    fill: FillType,
) -> Mesh {
    let n = vertices;
    let half = depth / 2.0;
    let trifan = fill == FillType::TriangleFan;
    let mut points: Vec<Point3<Real>> = Vec::with_capacity(2 * n + 2);

    let mut push = |p: Point3<Real>| {
        points.push(p);
        points.len() - 1
    };

    let bottom_center = (trifan && radius_bottom > 0.0).then(|| push(Point3::new(0.0, 0.0, -half)));
    let top_center = (trifan && radius_top > 0.0).then(|| push(Point3::new(0.0, 0.0, half)));

    let mut bottom = Vec::with_capacity(n);
    let mut top = Vec::with_capacity(n);
    for i in 0..n {
        if radius_bottom > 0.0 {
            bottom.push(push(ring_point(radius_bottom, i, n, -half)));
        } else if i == 0 {
            bottom.push(push(Point3::new(0.0, 0.0, -half)));
        }
        if radius_top > 0.0 {
            top.push(push(ring_point(radius_top, i, n, half)));
        } else if i == 0 {
            top.push(push(Point3::new(0.0, 0.0, half)));
        }
    }

    // an apex end has a single entry that every segment shares
    let b = |i: usize| bottom[if bottom.len() == 1 { 0 } else { i % n }];
    let t = |i: usize| top[if top.len() == 1 { 0 } else { i % n }];

    let mut faces = Vec::with_capacity(3 * n);
    for i in 0..n {
        let j = i + 1;
        if radius_top == 0.0 {
            faces.push(Face::new(vec![b(i), b(j), t(0)]));
        } else if radius_bottom == 0.0 {
            faces.push(Face::new(vec![b(0), t(j), t(i)]));
        } else {
            faces.push(Face::new(vec![b(i), b(j), t(j), t(i)]));
        }
    }

    if radius_bottom > 0.0 {
        match (fill, bottom_center) {
            (FillType::NGon, _) => faces.push(Face::new((0..n).rev().map(b).collect())),
            (FillType::TriangleFan, Some(c)) => {
                faces.extend((0..n).map(|i| Face::new(vec![c, b(i + 1), b(i)])));
            },
            _ => {},
        }
    }
    if radius_top > 0.0 {
        match (fill, top_center) {
            (FillType::NGon, _) => faces.push(Face::new((0..n).map(t).collect())),
            (FillType::TriangleFan, Some(c)) => {
                faces.extend((0..n).map(|i| Face::new(vec![c, t(i), t(i + 1)])));
            },
            _ => {},
        }
    }

    Mesh {
        vertices: points,
        faces,
        loose_edges: Vec::new(),
        uvs: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Topology;
    use nalgebra::Vector3;

    #[test]
    fn cylinder_counts_per_fill() {
        let none = tube(8, 1.0, 1.0, 2.0, FillType::None);
        assert_eq!((none.vertices.len(), none.faces.len()), (16, 8));
        let ngon = tube(8, 1.0, 1.0, 2.0, FillType::NGon);
        assert_eq!((ngon.vertices.len(), ngon.faces.len()), (16, 10));
        let fan = tube(8, 1.0, 1.0, 2.0, FillType::TriangleFan);
        assert_eq!((fan.vertices.len(), fan.faces.len()), (18, 24));
        assert_eq!(fan.validate(), Ok(()));
    }

    #[test]
    fn sharp_cone_layout() {
        let cone = tube(5, 1.0, 0.0, 2.0, FillType::TriangleFan);
        // bottom center, b0, apex, b1..b4
        assert_eq!(cone.vertices.len(), 7);
        assert_eq!(cone.faces.len(), 10);
        assert!((cone.vertices[2] - Point3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
        let topology = Topology::new(&cone);
        assert!(topology.are_adjacent(2, 3));
        assert_eq!(topology.degree(2), 5);
    }

    #[test]
    fn caps_face_outward() {
        let cylinder = tube(6, 1.0, 1.0, 2.0, FillType::NGon);
        assert!((cylinder.face_normal(6) + Vector3::z()).norm() < 1e-12);
        assert!((cylinder.face_normal(7) - Vector3::z()).norm() < 1e-12);
        // first side face points at the seam, between vertex 0 and vertex 1
        let side = cylinder.face_normal(0);
        assert!(side.z.abs() < 1e-12);
        assert!(side.y > 0.0);
    }
}
