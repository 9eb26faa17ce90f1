//! Recover the generator parameters of **primitive meshes** (circles,
//! cylinders, cones, tori, UV spheres and icospheres) from their topology
//! and geometry alone, then rebuild them with edited parameters while
//! keeping the object's placement and scene linkage.
//!
//! The pipeline is
//! [`classify`] → [`extract`] → [`transform::recover_transform`] →
//! [`replace::replace`], wrapped by [`session::EditSession`] for interactive
//! edits and by the one-shot [`commands`].
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **serde**: `Serialize`/`Deserialize` for parameters and scene values
//!
//! The comparison tolerance defaults to `1e-5` and can be overridden at
//! build time with the `REPRIMITIVE_TOLERANCE` environment variable, or at
//! runtime with [`float_types::set_tolerance`].

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod classify;
pub mod commands;
pub mod errors;
pub mod extract;
pub mod float_types;
pub mod math;
pub mod mesh;
pub mod params;
pub mod replace;
pub mod scene;
pub mod session;
pub mod shapes;
pub mod symmetry;
pub mod transform;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use classify::classify;
pub use commands::{fix_applied_rotation, tweak_primitive};
pub use errors::{GeneratorError, ReprimitiveError, ValidationError};
pub use extract::{analyze, extract};
pub use mesh::Mesh;
pub use params::{FillType, PrimitiveFamily, PrimitiveParams};
pub use scene::{ObjectId, Scene};
pub use session::{EditSession, SessionState};
pub use shapes::{PrimitiveGenerator, StandardGenerator};
