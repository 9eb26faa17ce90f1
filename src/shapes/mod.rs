//! Reference primitive generators.
//!
//! Every extractor in [`crate::extract`] reads fixed index positions out of
//! these meshes, so the vertex ORDER documented on each generator is part of
//! the contract. A substitute [`PrimitiveGenerator`] must reproduce it.
//!
//! Ring vertex `i` of an `N`-sided ring sits at `(−r·sin φ, r·cos φ, z)` with
//! `φ = 2πi/N`: vertex 0 on +Y, counter-clockwise seen from +Z.

use crate::errors::GeneratorError;
use crate::float_types::{Real, TAU};
use crate::mesh::Mesh;
use crate::params::PrimitiveParams;
use nalgebra::{Point3, Vector3};

pub mod circle;
pub mod icosphere;
pub mod sphere;
pub mod torus;
pub mod tube;

/// Builds a primitive mesh from parameters, deterministically.
pub trait PrimitiveGenerator {
    /// Build the canonical mesh: origin at the primitive's center, axis on +Z.
    /// Loop cuts are not applied here; see [`insert_loop_cuts`].
    fn generate(
        &self,
        params: &PrimitiveParams,
        generate_uvs: bool,
    ) -> Result<Mesh, GeneratorError>;
}

/// The generators shipped with this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardGenerator;

impl PrimitiveGenerator for StandardGenerator {
    fn generate(
        &self,
        params: &PrimitiveParams,
        generate_uvs: bool,
    ) -> Result<Mesh, GeneratorError> {
        params.validate()?;
        let mut mesh = match params {
            PrimitiveParams::Circle(p) => circle::circle(p.vertices, p.radius, p.fill),
            PrimitiveParams::Cylinder(p) => {
                tube::tube(p.vertices, p.radius, p.radius, p.depth, p.fill)
            },
            PrimitiveParams::Cone(p) => tube::tube(
                p.vertices,
                p.radius_bottom,
                p.radius_top,
                p.depth,
                p.fill,
            ),
            PrimitiveParams::Torus(p) => torus::torus(
                p.major_segments,
                p.minor_segments,
                p.major_radius,
                p.minor_radius,
            ),
            PrimitiveParams::UvSphere(p) => sphere::uv_sphere(p.segments, p.rings, p.radius),
            PrimitiveParams::IcoSphere(p) => icosphere::icosphere(p.subdivisions, p.radius),
        };
        if generate_uvs {
            mesh.project_uvs();
        }
        Ok(mesh)
    }
}

/// Point `i` of a regular `n`-gon of `radius` at height `z`.
pub(crate) fn ring_point(radius: Real, i: usize, n: usize, z: Real) -> Point3<Real> {
    let phi = TAU * i as Real / n as Real;
    Point3::new(-radius * phi.sin(), radius * phi.cos(), z)
}

/// Insert horizontal edge loops into a canonical cylinder or cone at the
/// given fractions of `depth`. Returns the number of vertices added.
pub fn insert_loop_cuts(mesh: &mut Mesh, depth: Real, cuts: &[Real]) -> usize {
    let half = depth / 2.0;
    cuts.iter()
        .map(|&f| mesh.bisect_at_plane(&Point3::new(0.0, 0.0, -half + f * depth), &Vector3::z()))
        .sum()
}

/// Generate and apply loop cuts in one step.
pub fn generate_with_cuts<G: PrimitiveGenerator + ?Sized>(
    generator: &G,
    params: &PrimitiveParams,
    generate_uvs: bool,
) -> Result<Mesh, GeneratorError> {
    let mut mesh = generator.generate(params, generate_uvs)?;
    if let Some(depth) = params.depth() {
        insert_loop_cuts(&mut mesh, depth, params.loop_cuts());
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{CylinderParams, FillType};

    #[test]
    fn ring_point_zero_is_on_positive_y() {
        let p = ring_point(2.0, 0, 7, 0.5);
        assert!((p - Point3::new(0.0, 2.0, 0.5)).norm() < 1e-12);
        // a quarter turn later the ring is on −X
        let q = ring_point(2.0, 1, 4, 0.0);
        assert!((q - Point3::new(-2.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn generator_rejects_invalid_parameters() {
        let params = PrimitiveParams::Cylinder(CylinderParams {
            vertices: 2,
            radius: 1.0,
            depth: 1.0,
            fill: FillType::NGon,
            loop_cuts: vec![],
        });
        assert!(StandardGenerator.generate(&params, false).is_err());
    }

    #[test]
    fn loop_cuts_add_one_ring_each() {
        let params = PrimitiveParams::Cylinder(CylinderParams {
            vertices: 6,
            radius: 1.0,
            depth: 2.0,
            fill: FillType::NGon,
            loop_cuts: vec![0.25, 0.5],
        });
        let mesh = generate_with_cuts(&StandardGenerator, &params, true).expect("generate");
        assert_eq!(mesh.vertices.len(), 6 * 4);
        assert_eq!(mesh.faces.len(), 6 * 3 + 2);
        assert_eq!(mesh.uvs.as_ref().map(Vec::len), Some(24));
        assert_eq!(mesh.validate(), Ok(()));
    }
}
