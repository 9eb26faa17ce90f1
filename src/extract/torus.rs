use super::degenerate;
use crate::errors::Result;
use crate::math;
use crate::mesh::{Mesh, Topology};
use crate::params::{PrimitiveParams, TorusDimensions, TorusParams};

/// The first minor ring holds vertices `0..m`; vertex `j·m` is the outermost
/// point of minor ring `j`, so those vertices trace a circle of radius
/// `major + minor`.
pub fn extract_torus(mesh: &Mesh, topology: &Topology) -> Result<PrimitiveParams> {
    let minor_ring = topology
        .walk_loop(mesh, 0, 1, None)
        .ok_or_else(|| degenerate("torus", "minor ring walk failed"))?;
    let minor_segments = minor_ring.len();
    let total = mesh.vertices.len();
    if minor_segments < 3 || total % minor_segments != 0 {
        return Err(degenerate(
            "torus",
            format!("{total} vertices do not split into minor rings of {minor_segments}"),
        ));
    }
    let major_segments = total / minor_segments;
    if major_segments < 3 {
        return Err(degenerate("torus", format!("{major_segments} major segments")));
    }

    let minor_points = mesh.points(&minor_ring);
    let minor_radius = math::mean_radius(&minor_points, &math::centroid(&minor_points));

    let outer: Vec<usize> = (0..major_segments).map(|j| j * minor_segments).collect();
    let outer_points = mesh.points(&outer);
    let outer_radius = math::mean_radius(&outer_points, &math::centroid(&outer_points));

    Ok(PrimitiveParams::Torus(TorusParams {
        major_segments,
        minor_segments,
        major_radius: outer_radius - minor_radius,
        minor_radius,
        mode: TorusDimensions::MajorMinor,
    }))
}
