mod support;

use reprimitive::{
    FillType, PrimitiveFamily, PrimitiveGenerator, PrimitiveParams, ReprimitiveError,
    StandardGenerator, analyze,
    extract::{CapShape, extract, fill},
    float_types::Real,
    shapes::generate_with_cuts,
};
use support::*;

const FILLS: [FillType; 3] = [FillType::None, FillType::NGon, FillType::TriangleFan];

fn assert_round_trip(params: &PrimitiveParams) {
    let mesh = generate_with_cuts(&StandardGenerator, params, false).expect("generate");
    let recovered = analyze(&mesh).unwrap_or_else(|e| panic!("{params:?}: {e}"));
    assert!(recovered.approx_eq(params), "expected {params:?}, got {recovered:?}");
}

#[test]
fn cylinder_grid_round_trips() {
    for vertices in [3, 4, 6, 8, 32] {
        for depth in [0.5, 2.0, 10.0] {
            for radius in [0.1, 1.0, 5.0] {
                for fill in FILLS {
                    assert_round_trip(&cylinder(vertices, radius, depth, fill));
                }
            }
        }
    }
}

#[test]
fn cone_grid_round_trips() {
    let radii: [(Real, Real); 4] = [(1.0, 0.5), (0.25, 2.0), (1.0, 0.0), (0.0, 1.5)];
    for vertices in [3, 5, 8, 32] {
        for (bottom, top) in radii {
            for depth in [0.5, 3.0] {
                for fill in FILLS {
                    assert_round_trip(&cone(vertices, bottom, top, depth, fill));
                }
            }
        }
    }
}

#[test]
fn circle_grid_round_trips() {
    for vertices in [3, 4, 7, 32, 100] {
        for radius in [0.1, 1.0, 5.0] {
            for fill in FILLS {
                assert_round_trip(&circle(vertices, radius, fill));
            }
        }
    }
}

#[test]
fn closed_surface_grid_round_trips() {
    for (major, minor) in [(3, 3), (6, 4), (48, 12), (7, 5)] {
        for (major_radius, minor_radius) in [(1.0, 0.25), (3.0, 1.0)] {
            assert_round_trip(&torus(major, minor, major_radius, minor_radius));
        }
    }
    for (segments, rings) in [(3, 3), (8, 4), (32, 16), (5, 11)] {
        for radius in [0.5, 2.0] {
            assert_round_trip(&uv_sphere(segments, rings, radius));
        }
    }
    for subdivisions in 1..=5 {
        assert_round_trip(&icosphere(subdivisions, 1.5));
    }
}

#[test]
fn loop_cuts_round_trip() {
    let cuts: [&[Real]; 3] = [&[0.5], &[0.1, 0.2], &[0.25, 0.5, 0.75]];
    for fractions in cuts {
        for fill in FILLS {
            assert_round_trip(&with_cuts(cylinder(12, 1.0, 4.0, fill), fractions));
            assert_round_trip(&with_cuts(cone(12, 1.0, 0.5, 4.0, fill), fractions));
            assert_round_trip(&with_cuts(cone(12, 1.0, 0.0, 4.0, fill), fractions));
        }
    }
}

#[test]
fn concrete_cylinder_is_measured_exactly() {
    let mesh = StandardGenerator
        .generate(&cylinder(8, 1.0, 2.0, FillType::NGon), false)
        .expect("generate");
    match extract(&mesh, PrimitiveFamily::Cylinder).expect("extract") {
        PrimitiveParams::Cylinder(p) => {
            assert_eq!(p.vertices, 8);
            assert_eq!(p.fill, FillType::NGon);
            assert!(approx_eq(p.radius, 1.0, 1e-9));
            assert!(approx_eq(p.depth, 2.0, 1e-9));
            assert!(p.loop_cuts.is_empty());
        },
        other => panic!("expected a cylinder, got {other:?}"),
    }
}

#[test]
fn wrong_family_is_degenerate() {
    let sphere = StandardGenerator
        .generate(&uv_sphere(8, 4, 1.0), false)
        .expect("generate");
    assert!(matches!(
        extract(&sphere, PrimitiveFamily::IcoSphere),
        Err(ReprimitiveError::DegenerateGeometry(_))
    ));
    assert_eq!(extract(&sphere, PrimitiveFamily::Unknown), Err(ReprimitiveError::Unclassified));
}

#[test]
fn fill_arithmetic_never_collides() {
    for shape in [CapShape::Circle, CapShape::Tube, CapShape::SharpCone] {
        let mut seen = std::collections::HashMap::new();
        for sides in 3..=500 {
            for fill_type in FILLS {
                let counts = shape.counts(fill_type, sides, 0);
                if let Some(previous) = seen.insert(counts, (fill_type, sides)) {
                    panic!(
                        "{shape:?}: {previous:?} and {:?} both give {counts:?}",
                        (fill_type, sides)
                    );
                }
                assert_eq!(
                    fill::solve_uncut(shape, counts.0, counts.1),
                    Some((fill_type, sides)),
                    "{shape:?} {fill_type:?} {sides}"
                );
            }
        }
    }
}
