//! UV sphere and icosphere extraction. Both are pure counting plus one radius.

use super::degenerate;
use crate::errors::Result;
use crate::math;
use crate::mesh::Mesh;
use crate::params::{IcoSphereParams, MAX_SUBDIVISIONS, PrimitiveParams, UvSphereParams};

fn radius_from_first_vertex(mesh: &Mesh) -> crate::float_types::Real {
    math::distance(&mesh.vertices[0], &mesh.median())
}

/// `V = 2 + S·(R−1)` and `F = S·R`, so `S = F − (V − 2)` and `R = F / S`.
pub fn extract_uv_sphere(mesh: &Mesh) -> Result<PrimitiveParams> {
    let (v, f) = (mesh.vertices.len(), mesh.faces.len());
    let segments = (f + 2)
        .checked_sub(v)
        .filter(|&s| s >= 3)
        .ok_or_else(|| degenerate("uv sphere", format!("{v} vertices and {f} faces")))?;
    if f % segments != 0 || f / segments < 3 {
        return Err(degenerate(
            "uv sphere",
            format!("{f} faces do not split into rings of {segments}"),
        ));
    }
    Ok(PrimitiveParams::UvSphere(UvSphereParams {
        segments,
        rings: f / segments,
        radius: radius_from_first_vertex(mesh),
    }))
}

/// `F = 20·4^(s−1)`.
pub fn extract_icosphere(mesh: &Mesh) -> Result<PrimitiveParams> {
    let f = mesh.faces.len();
    let subdivisions = (1..=MAX_SUBDIVISIONS)
        .find(|&s| 20 * 4usize.pow(s as u32 - 1) == f)
        .ok_or_else(|| degenerate("icosphere", format!("{f} faces is not 20·4^k")))?;
    Ok(PrimitiveParams::IcoSphere(IcoSphereParams {
        subdivisions,
        radius: radius_from_first_vertex(mesh),
    }))
}
