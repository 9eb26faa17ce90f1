//! Topology classifier: decides which primitive family a mesh came from.
//!
//! The decision is driven by the vertex degree histogram (degree → number of
//! vertices with that degree). Where two families share a histogram, a
//! geometric probe settles it:
//!
//! - the **fan probe** looks at the two special vertices of a mesh. Two flat
//!   fan centers mean capped rings, two sphere-like poles mean a UV sphere
//!   (or a double cone if they sit at different distances from the center).
//! - the **ring probe** walks the bottom and top rings of a tube and compares
//!   their radii: equal means cylinder, different means cone.

use crate::float_types::Real;
use crate::math::{self, reals_equal};
use crate::mesh::{FanKind, Mesh, Topology};
use crate::params::PrimitiveFamily;
use crate::scene::Object;
use std::collections::BTreeMap;

/// Classify a mesh into a primitive family. Never fails: anything that does
/// not fit is [`PrimitiveFamily::Unknown`].
pub fn classify(mesh: &Mesh) -> PrimitiveFamily {
    let family = Classifier::new(mesh).run();
    log::debug!(
        "classified mesh ({} vertices, {} faces) as {family:?}",
        mesh.vertices.len(),
        mesh.faces.len()
    );
    family
}

/// Prefer the family tag written by the generator, fall back to the mesh.
pub fn classify_object(object: &Object) -> PrimitiveFamily {
    match (object.family_tag, &object.mesh) {
        (Some(tag), _) if tag != PrimitiveFamily::Unknown => tag,
        (_, Some(mesh)) => classify(mesh),
        (_, None) => PrimitiveFamily::Unknown,
    }
}

/// Number of leading triangle-fan cap centers in a tube layout.
pub(crate) fn leading_centers(mesh: &Mesh, topology: &Topology) -> usize {
    (0..2usize.min(mesh.vertices.len()))
        .take_while(|&v| topology.fan_kind(mesh, v) == Some(FanKind::Center))
        .count()
}

/// The two end rings of a tube, walked perpendicular to the tube axis.
pub(crate) struct TubeRings {
    pub base: usize,
    pub bottom: Vec<usize>,
    pub top: Vec<usize>,
}

impl TubeRings {
    pub fn find(mesh: &Mesh, topology: &Topology) -> Option<Self> {
        let base = leading_centers(mesh, topology);
        if base + 4 >= mesh.vertices.len() {
            return None;
        }
        let axis = math::newell_normal(&mesh.points(&[base, base + 2, base + 4]));
        let bottom = topology.walk_loop(mesh, base, base + 2, Some(&axis))?;
        let top = topology.walk_loop(mesh, base + 1, base + 3, Some(&axis))?;
        (bottom.len() >= 3 && bottom.len() == top.len()).then_some(TubeRings { base, bottom, top })
    }

    /// Mean radius of each ring around its own centroid.
    pub fn radii(&self, mesh: &Mesh) -> (Real, Real) {
        let radius = |ring: &[usize]| {
            let points = mesh.points(ring);
            math::mean_radius(&points, &math::centroid(&points))
        };
        (radius(&self.bottom), radius(&self.top))
    }
}

struct Classifier<'a> {
    mesh: &'a Mesh,
    topology: Topology,
    histogram: BTreeMap<usize, usize>,
}

impl<'a> Classifier<'a> {
    fn new(mesh: &'a Mesh) -> Self {
        let topology = Topology::new(mesh);
        let histogram = topology.degree_histogram();
        Classifier {
            mesh,
            topology,
            histogram,
        }
    }

    fn run(&self) -> PrimitiveFamily {
        if self.mesh.vertices.len() < 3 {
            return PrimitiveFamily::Unknown;
        }
        if self.mesh.faces.is_empty() {
            return if self.topology.is_single_cycle(self.mesh) {
                PrimitiveFamily::Circle
            } else {
                PrimitiveFamily::Unknown
            };
        }
        if self.is_icosphere() {
            return PrimitiveFamily::IcoSphere;
        }

        let buckets: Vec<(usize, usize)> = self.histogram.iter().map(|(&d, &c)| (d, c)).collect();
        match buckets.as_slice() {
            [_, _, _] => PrimitiveFamily::Cone,
            &[low, high] => self.two_buckets(low, high),
            &[(degree, _)] => self.one_bucket(degree),
            _ => PrimitiveFamily::Unknown,
        }
    }

    fn is_icosphere(&self) -> bool {
        if !self.mesh.all_faces_have(3) || self.histogram.get(&5) != Some(&12) {
            return false;
        }
        match self.histogram.len() {
            1 => self.mesh.vertices.len() == 12,
            2 => self.histogram.contains_key(&6),
            _ => false,
        }
    }

    /// Histogram with two degrees, `low.0 < high.0`.
    fn two_buckets(&self, low: (usize, usize), high: (usize, usize)) -> PrimitiveFamily {
        if self.mesh.normals_uniform() {
            return PrimitiveFamily::Circle;
        }
        let (d_low, count_low) = low;
        let (d_high, count_high) = high;

        if d_low == 3 && d_high != 4 {
            return PrimitiveFamily::Cone;
        }

        // one of the degrees is 4 and the other holds exactly two special vertices
        let pair = match (d_low, d_high) {
            (4, k) if count_high == 2 => Some(k),
            (k, 4) if count_low == 2 => Some(k),
            _ => None,
        };
        if let Some(special_degree) = pair {
            if self.mesh.all_faces_have(3) {
                return PrimitiveFamily::Cone;
            }
            let special: Vec<usize> = (0..self.topology.vertex_count())
                .filter(|&v| self.topology.degree(v) == special_degree)
                .collect();
            return self.fan_probe(&special);
        }

        if (d_low, d_high) == (3, 4) {
            let has_apex = (0..self.topology.vertex_count())
                .any(|v| self.topology.fan_kind(self.mesh, v) == Some(FanKind::Apex));
            return if has_apex {
                PrimitiveFamily::Cone
            } else {
                self.ring_probe()
            };
        }

        PrimitiveFamily::Unknown
    }

    fn one_bucket(&self, degree: usize) -> PrimitiveFamily {
        match degree {
            2 => PrimitiveFamily::Circle,
            5 => PrimitiveFamily::IcoSphere,
            3 if self.mesh.vertices.len() == 4 => {
                if self.mesh.normals_uniform() {
                    PrimitiveFamily::Circle
                } else {
                    PrimitiveFamily::Cone
                }
            },
            3 => self.ring_probe(),
            4 if self.mesh.all_faces_have(4) => PrimitiveFamily::Torus,
            4 if self.mesh.all_faces_have(3) => PrimitiveFamily::Cone,
            4 => {
                let special: Vec<usize> = (0..self.topology.vertex_count())
                    .filter(|&v| {
                        self.topology
                            .faces_of_vertex(v)
                            .iter()
                            .all(|&f| self.mesh.faces[f].len() == 3)
                    })
                    .collect();
                self.fan_probe(&special)
            },
            _ => PrimitiveFamily::Unknown,
        }
    }

    fn fan_probe(&self, special: &[usize]) -> PrimitiveFamily {
        let &[a, b] = special else {
            return PrimitiveFamily::Unknown;
        };
        let kinds = (
            self.topology.fan_kind(self.mesh, a),
            self.topology.fan_kind(self.mesh, b),
        );
        log::debug!("fan probe on vertices {a}, {b}: {kinds:?}");
        match kinds {
            (Some(FanKind::Center), Some(FanKind::Center)) => self.ring_probe(),
            (Some(FanKind::Apex), Some(FanKind::Apex)) => {
                let center = self.mesh.median();
                let to_a = math::distance(&self.mesh.vertices[a], &center);
                let to_b = math::distance(&self.mesh.vertices[b], &center);
                if reals_equal(to_a, to_b) {
                    PrimitiveFamily::UvSphere
                } else {
                    PrimitiveFamily::Cone
                }
            },
            (Some(_), Some(_)) => PrimitiveFamily::Cone,
            _ => PrimitiveFamily::Unknown,
        }
    }

    fn ring_probe(&self) -> PrimitiveFamily {
        let Some(rings) = TubeRings::find(self.mesh, &self.topology) else {
            log::debug!("ring probe could not walk both end rings");
            return PrimitiveFamily::Unknown;
        };
        let (bottom, top) = rings.radii(self.mesh);
        log::debug!("ring probe radii: bottom {bottom}, top {top}");
        if reals_equal(bottom, top) {
            PrimitiveFamily::Cylinder
        } else {
            PrimitiveFamily::Cone
        }
    }
}
