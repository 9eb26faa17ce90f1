//! Cap fill recovery from vertex and face counts alone.
//!
//! Every cap style adds a fixed number of vertices and faces on top of the
//! side wall, so the counts of a pristine primitive pin down the fill.

use crate::params::FillType;

const FILLS: [FillType; 3] = [FillType::None, FillType::NGon, FillType::TriangleFan];

/// Outline of the boundary that gets capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapShape {
    /// One flat ring
    Circle,
    /// Two rings joined by a side wall (cylinder, truncated cone)
    Tube,
    /// One ring joined to an apex vertex
    SharpCone,
}

impl CapShape {
    /// `(vertices, faces)` of a primitive with `sides` ring vertices and
    /// `cuts` inserted edge loops.
    pub const fn counts(self, fill: FillType, sides: usize, cuts: usize) -> (usize, usize) {
        let fan = matches!(fill, FillType::TriangleFan);
        match self {
            CapShape::Circle => {
                let faces = match fill {
                    FillType::None => 0,
                    FillType::NGon => 1,
                    FillType::TriangleFan => sides,
                };
                (sides + fan as usize, faces)
            },
            CapShape::Tube => {
                let wall = sides * (1 + cuts);
                let caps = match fill {
                    FillType::None => 0,
                    FillType::NGon => 2,
                    FillType::TriangleFan => 2 * sides,
                };
                (sides * (2 + cuts) + 2 * fan as usize, wall + caps)
            },
            CapShape::SharpCone => {
                let wall = sides * (1 + cuts);
                let caps = match fill {
                    FillType::None => 0,
                    FillType::NGon => 1,
                    FillType::TriangleFan => sides,
                };
                (1 + sides * (1 + cuts) + fan as usize, wall + caps)
            },
        }
    }

    /// Ring size implied by a vertex count, if the count fits this fill.
    fn sides_from_vertices(self, fill: FillType, vertices: usize) -> Option<usize> {
        let fan = matches!(fill, FillType::TriangleFan) as usize;
        let sides = match self {
            CapShape::Circle => vertices.checked_sub(fan)?,
            CapShape::Tube => {
                let ring_vertices = vertices.checked_sub(2 * fan)?;
                if ring_vertices % 2 != 0 {
                    return None;
                }
                ring_vertices / 2
            },
            CapShape::SharpCone => vertices.checked_sub(1 + fan)?,
        };
        (sides >= 3).then_some(sides)
    }
}

/// The fill whose counts match `(vertices, faces)` for a known ring size and
/// number of loop cuts.
pub fn solve(
    shape: CapShape,
    sides: usize,
    cuts: usize,
    vertices: usize,
    faces: usize,
) -> Option<FillType> {
    let mut matches = FILLS
        .into_iter()
        .filter(|&fill| shape.counts(fill, sides, cuts) == (vertices, faces));
    let fill = matches.next()?;
    matches.next().is_none().then_some(fill)
}

/// Recover both the fill and the ring size of an uncut primitive.
pub fn solve_uncut(shape: CapShape, vertices: usize, faces: usize) -> Option<(FillType, usize)> {
    let mut matches = FILLS.into_iter().filter_map(|fill| {
        let sides = shape.sides_from_vertices(fill, vertices)?;
        (shape.counts(fill, sides, 0) == (vertices, faces)).then_some((fill, sides))
    });
    let found = matches.next()?;
    matches.next().is_none().then_some(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_the_generators() {
        use crate::shapes::{circle::circle, tube::tube};
        let fills = FILLS;
        for fill in fills {
            let c = circle(7, 1.0, fill);
            assert_eq!(CapShape::Circle.counts(fill, 7, 0), (c.vertices.len(), c.faces.len()));
            let t = tube(7, 1.0, 0.5, 1.0, fill);
            assert_eq!(CapShape::Tube.counts(fill, 7, 0), (t.vertices.len(), t.faces.len()));
            let s = tube(7, 0.0, 0.5, 1.0, fill);
            assert_eq!(
                CapShape::SharpCone.counts(fill, 7, 0),
                (s.vertices.len(), s.faces.len())
            );
        }
    }

    #[test]
    fn no_collisions_up_to_five_hundred_sides() {
        for shape in [CapShape::Circle, CapShape::Tube, CapShape::SharpCone] {
            for sides in 3..=500 {
                for fill in FILLS {
                    let (v, f) = shape.counts(fill, sides, 0);
                    assert_eq!(solve(shape, sides, 0, v, f), Some(fill), "{shape:?} {sides}");
                    assert_eq!(
                        solve_uncut(shape, v, f),
                        Some((fill, sides)),
                        "{shape:?} {sides} {fill:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn cuts_are_accounted_for() {
        let (v, f) = CapShape::Tube.counts(FillType::NGon, 8, 3);
        assert_eq!((v, f), (40, 34));
        assert_eq!(solve(CapShape::Tube, 8, 3, v, f), Some(FillType::NGon));
        assert_eq!(solve(CapShape::Tube, 8, 2, v, f), None);
    }
}
