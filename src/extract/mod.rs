//! Per-family parameter extractors.
//!
//! Each extractor reads a mesh produced by the matching generator in
//! [`crate::shapes`] and recovers the parameters that produced it. They only
//! look at relative geometry (ring centroids, distances, projections onto the
//! recovered axis), so the object's placement in the scene does not matter.

use crate::classify::{TubeRings, classify};
use crate::errors::{ReprimitiveError, Result};
use crate::float_types::Real;
use crate::math;
use crate::mesh::{Mesh, Topology};
use crate::params::{CylinderParams, FillType, PrimitiveFamily, PrimitiveParams};
use nalgebra::{Point3, Vector3};
use std::collections::HashSet;

pub mod circle;
pub mod cone;
pub mod fill;
pub mod sphere;
pub mod torus;

pub use fill::CapShape;

/// Recover the generator parameters of a mesh of a known family.
pub fn extract(mesh: &Mesh, family: PrimitiveFamily) -> Result<PrimitiveParams> {
    mesh.validate()?;
    measure(mesh, family)
}

/// Classify and extract in one step.
pub fn analyze(mesh: &Mesh) -> Result<PrimitiveParams> {
    mesh.validate()?;
    measure(mesh, classify(mesh))
}

/// [`extract`] for a mesh that already passed [`Mesh::validate`].
pub(crate) fn measure(mesh: &Mesh, family: PrimitiveFamily) -> Result<PrimitiveParams> {
    let topology = Topology::new(mesh);
    let params = match family {
        PrimitiveFamily::Circle => circle::extract_circle(mesh, &topology)?,
        PrimitiveFamily::Cylinder => extract_cylinder(mesh, &topology)?,
        PrimitiveFamily::Cone => cone::extract_cone(mesh, &topology)?,
        PrimitiveFamily::Torus => torus::extract_torus(mesh, &topology)?,
        PrimitiveFamily::UvSphere => sphere::extract_uv_sphere(mesh)?,
        PrimitiveFamily::IcoSphere => sphere::extract_icosphere(mesh)?,
        PrimitiveFamily::Unknown => return Err(ReprimitiveError::Unclassified),
    };
    log::debug!("extracted {params:?}");
    Ok(params)
}

pub(crate) fn degenerate(family: &str, detail: impl std::fmt::Display) -> ReprimitiveError {
    ReprimitiveError::DegenerateGeometry(format!("{family}: {detail}"))
}

/// Heights of the vertices strictly between `start` and the stop set, along
/// `axis` from `origin`, as fractions of `depth`. Sorted ascending.
pub(crate) fn loop_cut_fractions(
    mesh: &Mesh,
    path: &[usize],
    origin: &Point3<Real>,
    axis: &Vector3<Real>,
    depth: Real,
) -> Vec<Real> {
    if path.len() <= 2 || depth <= 0.0 {
        return Vec::new();
    }
    let mut cuts: Vec<Real> = path[1..path.len() - 1]
        .iter()
        .map(|&v| (mesh.vertices[v] - origin).dot(axis) / depth)
        .collect();
    cuts.sort_by(|a, b| a.total_cmp(b));
    cuts
}

/// The one neighbour of `start` that leaves its ring: not on the ring and not
/// one of the leading cap centers.
pub(crate) fn longitudinal_neighbour(
    topology: &Topology,
    start: usize,
    ring: &HashSet<usize>,
    base: usize,
) -> Option<usize> {
    let mut candidates = topology
        .neighbours(start)
        .iter()
        .copied()
        .filter(|&w| w >= base && !ring.contains(&w));
    let up = candidates.next()?;
    candidates.next().is_none().then_some(up)
}

/// Everything measurable on a tube: both ring radii, depth and loop cuts.
pub(crate) struct TubeMeasurement {
    pub sides: usize,
    pub radius_bottom: Real,
    pub radius_top: Real,
    pub depth: Real,
    pub loop_cuts: Vec<Real>,
    pub fill: FillType,
}

pub(crate) fn measure_tube(
    mesh: &Mesh,
    topology: &Topology,
    family: &str,
) -> Result<TubeMeasurement> {
    let rings = TubeRings::find(mesh, topology)
        .ok_or_else(|| degenerate(family, "could not walk both end rings"))?;
    let sides = rings.bottom.len();
    let (radius_bottom, radius_top) = rings.radii(mesh);

    let bottom_center = math::centroid(&mesh.points(&rings.bottom));
    let top_center = math::centroid(&mesh.points(&rings.top));
    let depth = math::distance(&bottom_center, &top_center);
    let axis = (top_center - bottom_center)
        .try_normalize(Real::EPSILON)
        .ok_or_else(|| degenerate(family, "both rings share one center"))?;

    let bottom_set: HashSet<usize> = rings.bottom.iter().copied().collect();
    let top_set: HashSet<usize> = rings.top.iter().copied().collect();
    let start = rings.bottom[0];
    let up = longitudinal_neighbour(topology, start, &bottom_set, rings.base)
        .ok_or_else(|| degenerate(family, "no unique side edge at the first ring vertex"))?;
    let path = topology
        .walk_path(mesh, start, up, |v| top_set.contains(&v))
        .ok_or_else(|| degenerate(family, "side edge path does not reach the top ring"))?;
    let loop_cuts = loop_cut_fractions(mesh, &path, &bottom_center, &axis, depth);

    let fill = fill::solve(
        CapShape::Tube,
        sides,
        loop_cuts.len(),
        mesh.vertices.len(),
        mesh.faces.len(),
    )
    .ok_or_else(|| degenerate(family, "vertex and face counts fit no cap fill"))?;

    Ok(TubeMeasurement {
        sides,
        radius_bottom,
        radius_top,
        depth,
        loop_cuts,
        fill,
    })
}

fn extract_cylinder(mesh: &Mesh, topology: &Topology) -> Result<PrimitiveParams> {
    let tube = measure_tube(mesh, topology, "cylinder")?;
    Ok(PrimitiveParams::Cylinder(CylinderParams {
        vertices: tube.sides,
        radius: tube.radius_bottom,
        depth: tube.depth,
        fill: tube.fill,
        loop_cuts: tube.loop_cuts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{StandardGenerator, generate_with_cuts};

    fn cylinder(fill: FillType, cuts: Vec<Real>) -> PrimitiveParams {
        PrimitiveParams::Cylinder(CylinderParams {
            vertices: 10,
            radius: 0.75,
            depth: 3.0,
            fill,
            loop_cuts: cuts,
        })
    }

    #[test]
    fn cylinder_round_trip() {
        for fill in [FillType::None, FillType::NGon, FillType::TriangleFan] {
            let params = cylinder(fill, vec![]);
            let mesh = generate_with_cuts(&StandardGenerator, &params, false).expect("generate");
            let recovered = analyze(&mesh).expect("extract");
            assert!(recovered.approx_eq(&params), "{recovered:?}");
        }
    }

    #[test]
    fn cylinder_loop_cuts_are_recovered() {
        let params = cylinder(FillType::NGon, vec![0.2, 0.65]);
        let mesh = generate_with_cuts(&StandardGenerator, &params, false).expect("generate");
        let recovered = extract(&mesh, PrimitiveFamily::Cylinder).expect("extract");
        assert!(recovered.approx_eq(&params), "{recovered:?}");
    }

    #[test]
    fn unknown_family_is_unclassified() {
        assert_eq!(
            extract(&Mesh::new(), PrimitiveFamily::Unknown),
            Err(ReprimitiveError::Unclassified)
        );
    }
}
