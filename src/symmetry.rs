//! Rotation recovery from the shape itself, for meshes whose rotation was
//! baked into the vertices.
//!
//! [`axis_frame`] measures the primitive's axis and one reference direction
//! around it. The reference direction sits at a fixed azimuth in the
//! canonical mesh, so the frame alone is off by a turn about local Z;
//! [`z_offset`] supplies that turn, which is only defined up to the
//! primitive's rotational symmetry.

use crate::classify::TubeRings;
use crate::errors::{ReprimitiveError, Result};
use crate::extract::cone::ConeLayout;
use crate::float_types::{FRAC_PI_2, PI, Real, TAU};
use crate::math;
use crate::mesh::{FanKind, Mesh, Topology};
use crate::params::{ConeEnd, PrimitiveParams};
use nalgebra::{Matrix3, Point3, Rotation3, UnitQuaternion, Vector3};

/// Half the interior angle of a regular `n`-gon, negated.
pub fn calculate_z_offset(n: usize) -> Real {
    -(PI - TAU / n as Real) / 2.0
}

fn ring_offset(n: usize) -> Real {
    if n >= 2 && (n - 2) % 4 == 0 {
        0.0
    } else if n % 2 == 1 {
        FRAC_PI_2
    } else {
        calculate_z_offset(n)
    }
}

/// Turn about local Z that takes [`axis_frame`] onto the canonical mesh,
/// up to the family's symmetry.
pub fn z_offset(params: &PrimitiveParams) -> Real {
    match params {
        PrimitiveParams::Circle(p) => ring_offset(p.vertices),
        PrimitiveParams::Cylinder(p) => ring_offset(p.vertices),
        PrimitiveParams::Cone(p) => ring_offset(p.vertices),
        PrimitiveParams::UvSphere(p) => ring_offset(p.segments),
        PrimitiveParams::Torus(p) => {
            let m = p.major_segments;
            if m % 4 == 0 {
                calculate_z_offset(m)
            } else if m % 2 == 0 {
                FRAC_PI_2
            } else {
                PI
            }
        },
        PrimitiveParams::IcoSphere(_) => PI,
    }
}

fn degenerate(detail: &str) -> ReprimitiveError {
    ReprimitiveError::DegenerateGeometry(format!("axis frame: {detail}"))
}

/// Center of a ring and the direction from it to the middle of the ring's
/// first edge.
fn ring_reference(mesh: &Mesh, ring: &[usize]) -> (Point3<Real>, Vector3<Real>) {
    let center = math::centroid(&mesh.points(ring));
    let edge_middle =
        Point3::from((mesh.vertices[ring[0]].coords + mesh.vertices[ring[1]].coords) / 2.0);
    (center, edge_middle - center)
}

/// Measured axis and reference direction of the primitive, in mesh space.
fn frame_vectors(mesh: &Mesh, params: &PrimitiveParams) -> Result<(Vector3<Real>, Vector3<Real>)> {
    let topology = Topology::new(mesh);
    let vertex = |i: usize| {
        mesh.vertices
            .get(i)
            .copied()
            .ok_or_else(|| degenerate("mesh is smaller than its family layout"))
    };

    match params {
        PrimitiveParams::Circle(_) => {
            let has_center =
                !mesh.faces.is_empty() && topology.fan_kind(mesh, 0) == Some(FanKind::Center);
            let start = usize::from(has_center);
            let ring = topology
                .walk_loop(mesh, start, start + 1, None)
                .ok_or_else(|| degenerate("circle ring walk failed"))?;
            let (_, x) = ring_reference(mesh, &ring);
            Ok((math::newell_normal(&mesh.points(&ring)), x))
        },
        PrimitiveParams::Cylinder(_) => tube_frame(mesh, &topology),
        PrimitiveParams::Cone(_) => match ConeLayout::detect(mesh, &topology) {
            Some(ConeLayout::Tube { .. }) => tube_frame(mesh, &topology),
            Some(ConeLayout::Sharp {
                base,
                apex,
                seeds,
                end,
            }) => {
                let axis_hint = math::newell_normal(&mesh.points(&[seeds[0], seeds[1], base + 3]));
                let ring = topology
                    .walk_loop(mesh, seeds[0], seeds[1], Some(&axis_hint))
                    .ok_or_else(|| degenerate("cone ring walk failed"))?;
                let (center, x) = ring_reference(mesh, &ring);
                let tip = vertex(apex)?;
                let z = match end {
                    ConeEnd::Top => tip - center,
                    ConeEnd::Bottom => center - tip,
                };
                Ok((z, x))
            },
            None => Err(degenerate("unrecognized cone layout")),
        },
        PrimitiveParams::UvSphere(p) => {
            let ring: Vec<usize> = (2..2 + p.segments).collect();
            if ring.last().is_none_or(|&last| last >= mesh.vertices.len()) {
                return Err(degenerate("sphere has fewer vertices than its first ring"));
            }
            let (_, x) = ring_reference(mesh, &ring);
            Ok((vertex(0)? - vertex(1)?, x))
        },
        PrimitiveParams::IcoSphere(_) => Ok((vertex(0)? - vertex(1)?, vertex(7)? - mesh.median())),
        PrimitiveParams::Torus(p) => {
            let m = p.minor_segments;
            if mesh.vertices.len() < 3 * m {
                return Err(degenerate("torus has fewer than three minor rings"));
            }
            let minor_center =
                |j: usize| math::centroid(&mesh.vertices[j * m..(j + 1) * m]);
            let centers = [minor_center(0), minor_center(1), minor_center(2)];
            let z = math::newell_normal(&centers);
            let x = Point3::from((centers[0].coords + centers[1].coords) / 2.0) - mesh.median();
            Ok((z, x))
        },
    }
}

fn tube_frame(mesh: &Mesh, topology: &Topology) -> Result<(Vector3<Real>, Vector3<Real>)> {
    let rings = TubeRings::find(mesh, topology).ok_or_else(|| degenerate("tube ring walk failed"))?;
    let (bottom_center, x) = ring_reference(mesh, &rings.bottom);
    let top_center = math::centroid(&mesh.points(&rings.top));
    Ok((top_center - bottom_center, x))
}

/// Orthonormal frame whose Z is the primitive's axis and whose X points at
/// the reference direction.
pub fn axis_frame(mesh: &Mesh, params: &PrimitiveParams) -> Result<UnitQuaternion<Real>> {
    let (z, x) = frame_vectors(mesh, params)?;
    let z = z
        .try_normalize(Real::EPSILON)
        .ok_or_else(|| degenerate("axis has zero length"))?;
    let x = (x - z * x.dot(&z))
        .try_normalize(Real::EPSILON)
        .ok_or_else(|| degenerate("reference direction is parallel to the axis"))?;
    let y = z.cross(&x);
    let basis = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z]));
    Ok(UnitQuaternion::from_rotation_matrix(&basis))
}

/// Rotation that maps the canonical primitive onto `mesh`'s vertex set,
/// reduced to the smallest angle among its symmetric equivalents.
pub fn symmetric_rotation(mesh: &Mesh, params: &PrimitiveParams) -> Result<UnitQuaternion<Real>> {
    let frame = axis_frame(mesh, params)?;
    let offset = z_offset(params);
    let rotation = math::rotate_around_axis_followed_by(&Vector3::z_axis(), offset, &frame);

    let order = params.symmetry_order().max(1);
    let step = TAU / order as Real;
    let smallest = (0..order)
        .map(|k| {
            math::rotate_around_axis_followed_by(&Vector3::z_axis(), step * k as Real, &rotation)
        })
        .min_by(|a, b| a.angle().total_cmp(&b.angle()))
        .unwrap_or(rotation);
    log::debug!(
        "symmetric rotation: frame {:?}, z offset {offset}, reduced angle {}",
        frame.euler_angles(),
        smallest.angle()
    );
    Ok(math::snap_identity(smallest))
}
