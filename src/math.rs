//! Small geometric helpers shared by the classifier, the extractors and
//! transform recovery. Every comparison goes through [`tolerance`].

use crate::errors::{ReprimitiveError, Result};
use crate::float_types::{PI, Real, TAU, tolerance};
use nalgebra::{Matrix3, Point3, Rotation3, Unit, UnitQuaternion, Vector3};

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Point3<Real>, b: &Point3<Real>) -> Real {
    (a - b).norm()
}

/// Two points closer than the tolerance are the same point.
#[inline]
pub fn points_equal(a: &Point3<Real>, b: &Point3<Real>) -> bool {
    distance(a, b) < tolerance()
}

#[inline]
pub fn reals_equal(a: Real, b: Real) -> bool {
    (a - b).abs() < tolerance()
}

/// Arithmetic mean of a point set. Empty input yields the origin.
pub fn centroid<'a, I>(points: I) -> Point3<Real>
where
    I: IntoIterator<Item = &'a Point3<Real>>,
{
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    if count == 0 {
        return Point3::origin();
    }
    Point3::from(sum / count as Real)
}

/// Mean distance of `points` to `center`.
pub fn mean_radius(points: &[Point3<Real>], center: &Point3<Real>) -> Real {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| distance(p, center)).sum::<Real>() / points.len() as Real
}

/// **Circumradius of a regular polygon from one edge**
///
/// `tip` and `neighbour` are two adjacent corners of a regular `sides`-gon.
/// The center, `tip` and the edge midpoint form a right triangle whose angle
/// at `tip` is half the interior angle:
///
/// ```text
///   a = (π − 2π/N) / 2
///   R = (e / 2) / cos(a)
/// ```
///
/// which reduces to `e / (2·sin(π/N))`.
pub fn polygon_radius(sides: usize, tip: &Point3<Real>, neighbour: &Point3<Real>) -> Real {
    let n = sides.max(3) as Real;
    let half_interior = (PI - TAU / n) / 2.0;
    let edge = distance(tip, neighbour);
    (edge / 2.0) / half_interior.cos()
}

/// Rotate by `angle` around the local `axis` first, then apply `rotation`.
pub fn rotate_around_axis_followed_by(
    axis: &Unit<Vector3<Real>>,
    angle: Real,
    rotation: &UnitQuaternion<Real>,
) -> UnitQuaternion<Real> {
    rotation * UnitQuaternion::from_axis_angle(axis, angle)
}

/// Snap a rotation that is within tolerance of identity to exactly identity.
pub fn snap_identity(rotation: UnitQuaternion<Real>) -> UnitQuaternion<Real> {
    if rotation.angle() < tolerance() {
        UnitQuaternion::identity()
    } else {
        rotation
    }
}

/// **Orthogonal Procrustes / Kabsch alignment**
///
/// Finds the proper rotation `R` and translation `t` minimizing
/// `Σ |R·sᵢ + t − tᵢ|²` for corresponding point sets.
///
/// ## Algorithm
/// 1. Center both sets on their centroids.
/// 2. Cross-covariance `H = Σ sᵢ · tᵢᵀ`.
/// 3. `H = U·Σ·Vᵀ`, `R = V·Uᵀ`.
/// 4. If `det(R) < 0` the last column of `V` is negated so the result is a
///    rotation, never a mirror.
/// 5. `t = c_target − R·c_source`.
///
/// Coplanar input (a single face) is fine: the reflection fix picks the
/// proper solution along the degenerate direction.
pub fn procrustes(
    source: &[Point3<Real>],
    target: &[Point3<Real>],
) -> Result<(Rotation3<Real>, Vector3<Real>)> {
    if source.len() != target.len() {
        return Err(ReprimitiveError::DegenerateGeometry(format!(
            "point sets must have equal length: {} vs {}",
            source.len(),
            target.len()
        )));
    }
    if source.len() < 3 {
        return Err(ReprimitiveError::DegenerateGeometry(format!(
            "rotation fit needs at least 3 points, got {}",
            source.len()
        )));
    }

    let source_centroid = centroid(source);
    let target_centroid = centroid(target);

    let mut h = Matrix3::zeros();
    for (s, t) in source.iter().zip(target) {
        h += (s - source_centroid) * (t - target_centroid).transpose();
    }

    let svd = h.svd(true, true);
    let u = svd
        .u
        .ok_or_else(|| ReprimitiveError::Svd("missing U".to_string()))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| ReprimitiveError::Svd("missing Vᵀ".to_string()))?;

    let mut v = v_t.transpose();
    let mut rotation_matrix = v * u.transpose();
    if rotation_matrix.determinant() < 0.0 {
        for i in 0..3 {
            v[(i, 2)] = -v[(i, 2)];
        }
        rotation_matrix = v * u.transpose();
    }

    let rotation = Rotation3::from_matrix_unchecked(rotation_matrix);
    let translation = target_centroid.coords - rotation * source_centroid.coords;
    Ok((rotation, translation))
}

/// Newell normal of a closed polygon, normalized. Zero-area input yields +Z.
pub fn newell_normal(points: &[Point3<Real>]) -> Vector3<Real> {
    let n = points.len();
    if n < 3 {
        return Vector3::z();
    }
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let current = points[i];
        let next = points[(i + 1) % n];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal.try_normalize(Real::EPSILON).unwrap_or_else(Vector3::z)
}

/// Two unit vectors point along the same line (either sense).
#[inline]
pub fn parallel(a: &Vector3<Real>, b: &Vector3<Real>) -> bool {
    a.dot(b).abs() > 1.0 - tolerance()
}
