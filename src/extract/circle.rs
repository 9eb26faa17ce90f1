use super::{CapShape, degenerate, fill};
use crate::errors::Result;
use crate::math;
use crate::mesh::{FanKind, Mesh, Topology};
use crate::params::{CircleParams, PrimitiveParams};

/// Walk the ring (skipping a fan center at index 0) and measure it.
pub fn extract_circle(mesh: &Mesh, topology: &Topology) -> Result<PrimitiveParams> {
    let has_center = !mesh.faces.is_empty() && topology.fan_kind(mesh, 0) == Some(FanKind::Center);
    let seeds = if has_center { (1, 2) } else { (0, 1) };
    let ring = topology
        .walk_loop(mesh, seeds.0, seeds.1, None)
        .ok_or_else(|| degenerate("circle", "ring walk failed"))?;
    let vertices = ring.len();
    if vertices < 3 {
        return Err(degenerate("circle", format!("ring has {vertices} vertices")));
    }

    let points = mesh.points(&ring);
    let radius = math::mean_radius(&points, &math::centroid(&points));
    let fill = fill::solve(CapShape::Circle, vertices, 0, mesh.vertices.len(), mesh.faces.len())
        .ok_or_else(|| degenerate("circle", "vertex and face counts fit no fill"))?;

    Ok(PrimitiveParams::Circle(CircleParams {
        vertices,
        radius,
        fill,
    }))
}
