//! Test support library
//! Parameter builders and geometric comparisons shared by the integration tests.

#![allow(dead_code)]

use nalgebra::{Point3, UnitQuaternion};
use reprimitive::{
    FillType, PrimitiveParams,
    float_types::Real,
    params::{
        CircleParams, ConeParams, CylinderParams, IcoSphereParams, TorusDimensions, TorusParams,
        UvSphereParams,
    },
    scene::Transform,
};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

pub fn circle(vertices: usize, radius: Real, fill: FillType) -> PrimitiveParams {
    PrimitiveParams::Circle(CircleParams {
        vertices,
        radius,
        fill,
    })
}

pub fn cylinder(vertices: usize, radius: Real, depth: Real, fill: FillType) -> PrimitiveParams {
    PrimitiveParams::Cylinder(CylinderParams {
        vertices,
        radius,
        depth,
        fill,
        loop_cuts: vec![],
    })
}

pub fn cone(
    vertices: usize,
    radius_bottom: Real,
    radius_top: Real,
    depth: Real,
    fill: FillType,
) -> PrimitiveParams {
    PrimitiveParams::Cone(ConeParams {
        vertices,
        radius_bottom,
        radius_top,
        depth,
        fill,
        loop_cuts: vec![],
    })
}

pub fn torus(
    major_segments: usize,
    minor_segments: usize,
    major_radius: Real,
    minor_radius: Real,
) -> PrimitiveParams {
    PrimitiveParams::Torus(TorusParams {
        major_segments,
        minor_segments,
        major_radius,
        minor_radius,
        mode: TorusDimensions::MajorMinor,
    })
}

pub fn uv_sphere(segments: usize, rings: usize, radius: Real) -> PrimitiveParams {
    PrimitiveParams::UvSphere(UvSphereParams {
        segments,
        rings,
        radius,
    })
}

pub fn icosphere(subdivisions: usize, radius: Real) -> PrimitiveParams {
    PrimitiveParams::IcoSphere(IcoSphereParams {
        subdivisions,
        radius,
    })
}

/// Same parameters with the given loop cuts; families without cuts are returned unchanged.
pub fn with_cuts(params: PrimitiveParams, cuts: &[Real]) -> PrimitiveParams {
    match params {
        PrimitiveParams::Cylinder(mut p) => {
            p.loop_cuts = cuts.to_vec();
            PrimitiveParams::Cylinder(p)
        },
        PrimitiveParams::Cone(mut p) => {
            p.loop_cuts = cuts.to_vec();
            PrimitiveParams::Cone(p)
        },
        other => other,
    }
}

/// An arbitrary placement away from the origin.
pub fn placed(x: Real, y: Real, z: Real, roll: Real, pitch: Real, yaw: Real) -> Transform {
    Transform::from_location_rotation(
        Point3::new(x, y, z),
        UnitQuaternion::from_euler_angles(roll, pitch, yaw),
    )
}

/// Every point of `a` has a match in `b` within `eps`, and the sets have equal size.
pub fn same_point_set(a: &[Point3<Real>], b: &[Point3<Real>], eps: Real) -> bool {
    a.len() == b.len()
        && a.iter().all(|p| b.iter().any(|q| (p - q).norm() < eps))
        && b.iter().all(|q| a.iter().any(|p| (p - q).norm() < eps))
}
