//! Cone extraction, for both truncated and sharp-tipped cones.

use super::{CapShape, degenerate, fill, longitudinal_neighbour, loop_cut_fractions, measure_tube};
use crate::classify::leading_centers;
use crate::errors::Result;
use crate::float_types::Real;
use crate::math;
use crate::mesh::{FanKind, Mesh, Topology};
use crate::params::{ConeEnd, ConeParams, PrimitiveParams};
use std::collections::HashSet;

/// Where the rings and the apex of a generated cone sit in the vertex list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConeLayout {
    /// Two rings, measured like a cylinder
    Tube { base: usize },
    /// One ring and an apex vertex at `end`
    Sharp {
        base: usize,
        apex: usize,
        seeds: [usize; 2],
        end: ConeEnd,
    },
}

impl ConeLayout {
    /// Read the layout from the fixed index positions after the leading cap
    /// centers. In a tube `base+1` (first top vertex) and `base+2` (second
    /// bottom vertex) are never joined by an edge; a sharp cone has its apex
    /// at `base` (bottom apex) or `base+1` (top apex).
    ///
    /// An apex candidate must be a non-flat fan whose degree equals the size
    /// of the ring walked from the other seeds, and that ring must not pass
    /// through it. Only a three-sided cone with an n-gon cap passes both
    /// candidates; its single cap is the last face and never touches the apex.
    pub fn detect(mesh: &Mesh, topology: &Topology) -> Option<Self> {
        let base = leading_centers(mesh, topology);
        if base + 3 >= mesh.vertices.len() {
            return None;
        }

        let apex_of_ring = |apex: usize, seeds: [usize; 2]| {
            if topology.fan_kind(mesh, apex) != Some(FanKind::Apex) {
                return false;
            }
            let axis = math::newell_normal(&mesh.points(&[seeds[0], seeds[1], base + 3]));
            topology
                .walk_loop(mesh, seeds[0], seeds[1], Some(&axis))
                .is_some_and(|ring| !ring.contains(&apex) && ring.len() == topology.degree(apex))
        };
        let bottom_apex = apex_of_ring(base, [base + 1, base + 2]);
        let top_apex = apex_of_ring(base + 1, [base, base + 2]);

        let cap_skips = |v: usize| mesh.faces.last().is_some_and(|f| !f.indices.contains(&v));
        let end = match (bottom_apex, top_apex) {
            (true, true) if cap_skips(base) => Some(ConeEnd::Bottom),
            (true, true) | (false, true) => Some(ConeEnd::Top),
            (true, false) => Some(ConeEnd::Bottom),
            (false, false) => None,
        };

        match end {
            Some(ConeEnd::Bottom) => Some(ConeLayout::Sharp {
                base,
                apex: base,
                seeds: [base + 1, base + 2],
                end: ConeEnd::Bottom,
            }),
            Some(ConeEnd::Top) => Some(ConeLayout::Sharp {
                base,
                apex: base + 1,
                seeds: [base, base + 2],
                end: ConeEnd::Top,
            }),
            None if topology.are_adjacent(base + 1, base + 2) => None,
            None => Some(ConeLayout::Tube { base }),
        }
    }
}

pub fn extract_cone(mesh: &Mesh, topology: &Topology) -> Result<PrimitiveParams> {
    let layout = ConeLayout::detect(mesh, topology).ok_or_else(|| {
        degenerate("cone", "neither two rings nor an apex at the expected indices")
    })?;
    log::debug!("cone layout {layout:?}");

    match layout {
        ConeLayout::Tube { .. } => {
            let tube = measure_tube(mesh, topology, "cone")?;
            Ok(PrimitiveParams::Cone(ConeParams {
                vertices: tube.sides,
                radius_bottom: tube.radius_bottom,
                radius_top: tube.radius_top,
                depth: tube.depth,
                fill: tube.fill,
                loop_cuts: tube.loop_cuts,
            }))
        },
        ConeLayout::Sharp {
            base,
            apex,
            seeds,
            end,
        } => extract_sharp(mesh, topology, base, apex, seeds, end),
    }
}

fn extract_sharp(
    mesh: &Mesh,
    topology: &Topology,
    base: usize,
    apex: usize,
    seeds: [usize; 2],
    end: ConeEnd,
) -> Result<PrimitiveParams> {
    // the third ring vertex always directly follows the second seed
    let axis = math::newell_normal(&mesh.points(&[seeds[0], seeds[1], base + 3]));
    let ring = topology
        .walk_loop(mesh, seeds[0], seeds[1], Some(&axis))
        .ok_or_else(|| degenerate("cone", "could not walk the base ring"))?;
    let sides = ring.len();
    if sides < 3 {
        return Err(degenerate("cone", format!("ring has {sides} vertices")));
    }

    let radius = math::polygon_radius(sides, &mesh.vertices[ring[0]], &mesh.vertices[ring[1]]);
    let ring_center = math::centroid(&mesh.points(&ring));
    let tip = mesh.vertices[apex];
    let depth = math::distance(&ring_center, &tip);

    let (bottom, top) = match end {
        ConeEnd::Top => (ring_center, tip),
        ConeEnd::Bottom => (tip, ring_center),
    };
    let up = (top - bottom)
        .try_normalize(Real::EPSILON)
        .ok_or_else(|| degenerate("cone", "apex lies in the ring plane"))?;

    let ring_set: HashSet<usize> = ring.iter().copied().collect();
    let side = longitudinal_neighbour(topology, ring[0], &ring_set, base)
        .ok_or_else(|| degenerate("cone", "no unique side edge at the first ring vertex"))?;
    let path = topology
        .walk_path(mesh, ring[0], side, |v| v == apex)
        .ok_or_else(|| degenerate("cone", "side edge path does not reach the apex"))?;
    let loop_cuts = loop_cut_fractions(mesh, &path, &bottom, &up, depth);

    let fill = fill::solve(
        CapShape::SharpCone,
        sides,
        loop_cuts.len(),
        mesh.vertices.len(),
        mesh.faces.len(),
    )
    .ok_or_else(|| degenerate("cone", "vertex and face counts fit no cap fill"))?;

    let (radius_bottom, radius_top) = match end {
        ConeEnd::Top => (radius, 0.0),
        ConeEnd::Bottom => (0.0, radius),
    };
    Ok(PrimitiveParams::Cone(ConeParams {
        vertices: sides,
        radius_bottom,
        radius_top,
        depth,
        fill,
        loop_cuts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::FillType;
    use crate::shapes::{StandardGenerator, generate_with_cuts, tube::tube};

    #[test]
    fn layout_of_each_cone_kind() {
        let truncated = tube(6, 1.0, 0.5, 2.0, FillType::NGon);
        let topology = Topology::new(&truncated);
        assert_eq!(ConeLayout::detect(&truncated, &topology), Some(ConeLayout::Tube { base: 0 }));

        let pointed_up = tube(6, 1.0, 0.0, 2.0, FillType::TriangleFan);
        let topology = Topology::new(&pointed_up);
        assert!(matches!(
            ConeLayout::detect(&pointed_up, &topology),
            Some(ConeLayout::Sharp { base: 1, apex: 2, end: ConeEnd::Top, .. })
        ));

        let pointed_down = tube(6, 0.0, 1.0, 2.0, FillType::None);
        let topology = Topology::new(&pointed_down);
        assert!(matches!(
            ConeLayout::detect(&pointed_down, &topology),
            Some(ConeLayout::Sharp { base: 0, apex: 0, end: ConeEnd::Bottom, .. })
        ));
    }

    #[test]
    fn sharp_cone_round_trip() {
        for fill in [FillType::None, FillType::NGon, FillType::TriangleFan] {
            for (bottom, top) in [(1.5, 0.0), (0.0, 0.8)] {
                let params = PrimitiveParams::Cone(ConeParams {
                    vertices: 7,
                    radius_bottom: bottom,
                    radius_top: top,
                    depth: 2.5,
                    fill,
                    loop_cuts: vec![],
                });
                let mesh =
                    generate_with_cuts(&StandardGenerator, &params, false).expect("generate");
                let recovered = extract_cone(&mesh, &Topology::new(&mesh)).expect("extract");
                assert!(recovered.approx_eq(&params), "{params:?} → {recovered:?}");
            }
        }
    }

    #[test]
    fn sharp_cone_with_loop_cuts() {
        let params = PrimitiveParams::Cone(ConeParams {
            vertices: 8,
            radius_bottom: 1.0,
            radius_top: 0.0,
            depth: 2.0,
            fill: FillType::NGon,
            loop_cuts: vec![0.3, 0.6],
        });
        let mesh = generate_with_cuts(&StandardGenerator, &params, false).expect("generate");
        let recovered = extract_cone(&mesh, &Topology::new(&mesh)).expect("extract");
        assert!(recovered.approx_eq(&params), "{recovered:?}");
    }
}
