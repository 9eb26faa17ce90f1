//! Scalar type and the one comparison tolerance every probe and extractor reads.

#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

#[cfg(feature = "f32")]
pub use core::f32::consts::{FRAC_PI_2, PI, TAU};
#[cfg(feature = "f64")]
pub use core::f64::consts::{FRAC_PI_2, PI, TAU};

use std::sync::OnceLock;

/// Used when neither `REPRIMITIVE_TOLERANCE` nor [`set_tolerance`] provides one.
#[cfg(feature = "f32")]
pub const DEFAULT_TOLERANCE: Real = 1e-4;
#[cfg(feature = "f64")]
pub const DEFAULT_TOLERANCE: Real = 1e-5;

static TOLERANCE: OnceLock<Real> = OnceLock::new();

/// Threshold for equal distances, equal radii and coplanar normals.
///
/// Fixed on first use: a value set with [`set_tolerance`] wins, then the
/// build-time `REPRIMITIVE_TOLERANCE` variable, then [`DEFAULT_TOLERANCE`].
pub fn tolerance() -> Real {
    *TOLERANCE.get_or_init(|| {
        option_env!("REPRIMITIVE_TOLERANCE")
            .and_then(|raw| raw.parse::<Real>().ok())
            .map_or(DEFAULT_TOLERANCE, |value| value.max(Real::EPSILON))
    })
}

/// Override the tolerance before the first comparison. Returns `false` when
/// it was already fixed.
pub fn set_tolerance(value: Real) -> bool {
    TOLERANCE.set(value.max(Real::EPSILON)).is_ok()
}
