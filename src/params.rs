//! Primitive families and their generator parameters.
//!
//! Parameter structs are plain immutable values built fresh for every
//! analysis or edit. [`PrimitiveParams::validate`] is the rule set a
//! generator enforces before it builds anything.

use crate::errors::GeneratorError;
use crate::float_types::Real;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest icosphere subdivision level the generators accept.
pub const MAX_SUBDIVISIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrimitiveFamily {
    Circle,
    Cylinder,
    Cone,
    Torus,
    UvSphere,
    IcoSphere,
    Unknown,
}

/// How a circular boundary is capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FillType {
    /// Open boundary
    None,
    /// One face spanning the whole ring
    NGon,
    /// Triangles around one extra center vertex
    TriangleFan,
}

/// Which end of a cone collapses to a single apex vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConeEnd {
    Bottom,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TorusDimensions {
    /// Major radius to the tube center, minor radius of the tube
    MajorMinor,
    /// Outer and inner extent of the ring
    ExteriorInterior,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CircleParams {
    pub vertices: usize,
    pub radius: Real,
    pub fill: FillType,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CylinderParams {
    pub vertices: usize,
    pub radius: Real,
    pub depth: Real,
    pub fill: FillType,
    /// Heights of inserted edge loops as fractions of `depth`, ascending
    pub loop_cuts: Vec<Real>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConeParams {
    pub vertices: usize,
    pub radius_bottom: Real,
    pub radius_top: Real,
    pub depth: Real,
    pub fill: FillType,
    /// Heights of inserted edge loops as fractions of `depth`, ascending
    pub loop_cuts: Vec<Real>,
}

impl ConeParams {
    /// The end that is a single apex vertex, if the cone is sharp-tipped.
    pub fn sharp_end(&self) -> Option<ConeEnd> {
        if self.radius_top == 0.0 {
            Some(ConeEnd::Top)
        } else if self.radius_bottom == 0.0 {
            Some(ConeEnd::Bottom)
        } else {
            None
        }
    }

    pub fn is_sharp(&self) -> bool {
        self.sharp_end().is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TorusParams {
    pub major_segments: usize,
    pub minor_segments: usize,
    pub major_radius: Real,
    pub minor_radius: Real,
    /// How the radii are presented for editing; storage is always major/minor
    pub mode: TorusDimensions,
}

impl TorusParams {
    pub fn exterior_radius(&self) -> Real {
        self.major_radius + self.minor_radius
    }

    pub fn interior_radius(&self) -> Real {
        self.major_radius - self.minor_radius
    }

    /// Build from the outer and inner extent of the ring.
    pub fn from_exterior_interior(
        major_segments: usize,
        minor_segments: usize,
        exterior: Real,
        interior: Real,
    ) -> Self {
        TorusParams {
            major_segments,
            minor_segments,
            major_radius: (exterior + interior) / 2.0,
            minor_radius: (exterior - interior) / 2.0,
            mode: TorusDimensions::ExteriorInterior,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UvSphereParams {
    pub segments: usize,
    pub rings: usize,
    pub radius: Real,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IcoSphereParams {
    pub subdivisions: usize,
    pub radius: Real,
}

/// Generator parameters tagged by family.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrimitiveParams {
    Circle(CircleParams),
    Cylinder(CylinderParams),
    Cone(ConeParams),
    Torus(TorusParams),
    UvSphere(UvSphereParams),
    IcoSphere(IcoSphereParams),
}

fn at_least(field: &'static str, value: usize, min: usize) -> Result<(), GeneratorError> {
    if value < min {
        return Err(GeneratorError::TooFewSegments { field, min, value });
    }
    Ok(())
}

fn dimension(field: &'static str, value: Real) -> Result<(), GeneratorError> {
    if !value.is_finite() || value < 0.0 {
        return Err(GeneratorError::InvalidDimension { field, value });
    }
    Ok(())
}

fn loop_cuts(cuts: &[Real]) -> Result<(), GeneratorError> {
    match cuts.iter().find(|&&f| !(f > 0.0 && f < 1.0)) {
        Some(&bad) => Err(GeneratorError::LoopCutOutOfRange(bad)),
        None => Ok(()),
    }
}

impl PrimitiveParams {
    pub const fn family(&self) -> PrimitiveFamily {
        match self {
            PrimitiveParams::Circle(_) => PrimitiveFamily::Circle,
            PrimitiveParams::Cylinder(_) => PrimitiveFamily::Cylinder,
            PrimitiveParams::Cone(_) => PrimitiveFamily::Cone,
            PrimitiveParams::Torus(_) => PrimitiveFamily::Torus,
            PrimitiveParams::UvSphere(_) => PrimitiveFamily::UvSphere,
            PrimitiveParams::IcoSphere(_) => PrimitiveFamily::IcoSphere,
        }
    }

    /// Reject parameter sets no generator can build.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        match self {
            PrimitiveParams::Circle(p) => {
                at_least("vertices", p.vertices, 3)?;
                dimension("radius", p.radius)
            },
            PrimitiveParams::Cylinder(p) => {
                at_least("vertices", p.vertices, 3)?;
                dimension("radius", p.radius)?;
                dimension("depth", p.depth)?;
                loop_cuts(&p.loop_cuts)
            },
            PrimitiveParams::Cone(p) => {
                at_least("vertices", p.vertices, 3)?;
                dimension("radius_bottom", p.radius_bottom)?;
                dimension("radius_top", p.radius_top)?;
                dimension("depth", p.depth)?;
                if p.radius_bottom == 0.0 && p.radius_top == 0.0 {
                    return Err(GeneratorError::DoubleApex);
                }
                loop_cuts(&p.loop_cuts)
            },
            PrimitiveParams::Torus(p) => {
                at_least("major_segments", p.major_segments, 3)?;
                at_least("minor_segments", p.minor_segments, 3)?;
                dimension("major_radius", p.major_radius)?;
                dimension("minor_radius", p.minor_radius)
            },
            PrimitiveParams::UvSphere(p) => {
                at_least("segments", p.segments, 3)?;
                at_least("rings", p.rings, 3)?;
                dimension("radius", p.radius)
            },
            PrimitiveParams::IcoSphere(p) => {
                if p.subdivisions < 1 || p.subdivisions > MAX_SUBDIVISIONS {
                    return Err(GeneratorError::Subdivisions {
                        max: MAX_SUBDIVISIONS,
                        value: p.subdivisions,
                    });
                }
                dimension("radius", p.radius)
            },
        }
    }

    /// Loop-cut fractions, empty for families that cannot carry them.
    pub fn loop_cuts(&self) -> &[Real] {
        match self {
            PrimitiveParams::Cylinder(p) => &p.loop_cuts,
            PrimitiveParams::Cone(p) => &p.loop_cuts,
            _ => &[],
        }
    }

    /// Copy with loop cuts removed.
    pub fn without_loop_cuts(&self) -> Self {
        let mut copy = self.clone();
        match &mut copy {
            PrimitiveParams::Cylinder(p) => p.loop_cuts.clear(),
            PrimitiveParams::Cone(p) => p.loop_cuts.clear(),
            _ => {},
        }
        copy
    }

    /// Extent along local Z, for families that have one.
    pub fn depth(&self) -> Option<Real> {
        match self {
            PrimitiveParams::Cylinder(p) => Some(p.depth),
            PrimitiveParams::Cone(p) => Some(p.depth),
            _ => None,
        }
    }

    /// Order of the discrete rotational symmetry about local Z.
    pub const fn symmetry_order(&self) -> usize {
        match self {
            PrimitiveParams::Circle(p) => p.vertices,
            PrimitiveParams::Cylinder(p) => p.vertices,
            PrimitiveParams::Cone(p) => p.vertices,
            PrimitiveParams::Torus(p) => p.major_segments,
            PrimitiveParams::UvSphere(p) => p.segments,
            PrimitiveParams::IcoSphere(_) => 5,
        }
    }

    /// Equal within the shared tolerance: counts and fill exactly, lengths
    /// and loop cuts approximately.
    pub fn approx_eq(&self, other: &PrimitiveParams) -> bool {
        use crate::math::reals_equal as eq;
        let cuts_eq = |a: &[Real], b: &[Real]| {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| eq(*x, *y))
        };
        match (self, other) {
            (PrimitiveParams::Circle(a), PrimitiveParams::Circle(b)) => {
                a.vertices == b.vertices && a.fill == b.fill && eq(a.radius, b.radius)
            },
            (PrimitiveParams::Cylinder(a), PrimitiveParams::Cylinder(b)) => {
                a.vertices == b.vertices
                    && a.fill == b.fill
                    && eq(a.radius, b.radius)
                    && eq(a.depth, b.depth)
                    && cuts_eq(&a.loop_cuts, &b.loop_cuts)
            },
            (PrimitiveParams::Cone(a), PrimitiveParams::Cone(b)) => {
                a.vertices == b.vertices
                    && a.fill == b.fill
                    && eq(a.radius_bottom, b.radius_bottom)
                    && eq(a.radius_top, b.radius_top)
                    && eq(a.depth, b.depth)
                    && cuts_eq(&a.loop_cuts, &b.loop_cuts)
            },
            (PrimitiveParams::Torus(a), PrimitiveParams::Torus(b)) => {
                a.major_segments == b.major_segments
                    && a.minor_segments == b.minor_segments
                    && eq(a.major_radius, b.major_radius)
                    && eq(a.minor_radius, b.minor_radius)
            },
            (PrimitiveParams::UvSphere(a), PrimitiveParams::UvSphere(b)) => {
                a.segments == b.segments && a.rings == b.rings && eq(a.radius, b.radius)
            },
            (PrimitiveParams::IcoSphere(a), PrimitiveParams::IcoSphere(b)) => {
                a.subdivisions == b.subdivisions && eq(a.radius, b.radius)
            },
            _ => false,
        }
    }
}
