//! Error types

use crate::float_types::Real;
use crate::scene::ObjectId;
use crate::session::SessionState;
use nalgebra::Point3;

/// Structural problems found by [`Mesh::validate`](crate::mesh::Mesh::validate).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A face or edge points past the end of the vertex list
    #[error("(IndexOutOfRange) element {element} uses vertex {index} of {count}")]
    IndexOutOfRange {
        element: usize,
        index: usize,
        count: usize,
    },
    /// A face has fewer than three corners
    #[error("(TooFewPoints) face {0} has fewer than 3 vertices")]
    TooFewPoints(usize),
    /// A face visits the same vertex twice
    #[error("(RepeatedPoint) face {face} repeats vertex {index}")]
    RepeatedPoint { face: usize, index: usize },
    /// Two faces use the same vertex set
    #[error("(DuplicateFace) face {0} duplicates face {1}")]
    DuplicateFace(usize, usize),
    /// The coordinate has a NaN or infinite
    #[error("(InvalidCoordinate) the coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point3<Real>),
}

/// Parameter sets a generator refuses to build.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    #[error("{field} must be at least {min}, got {value}")]
    TooFewSegments {
        field: &'static str,
        min: usize,
        value: usize,
    },
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidDimension { field: &'static str, value: Real },
    #[error("a cone needs at least one non-zero radius")]
    DoubleApex,
    #[error("loop cut at {0} lies outside the open interval (0, 1)")]
    LoopCutOutOfRange(Real),
    #[error("icosphere subdivisions must be within 1..={max}, got {value}")]
    Subdivisions { max: usize, value: usize },
}

/// Everything a reprimitive operation can fail with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReprimitiveError {
    /// The mesh matches no known primitive family. Commands treat this as a no-op.
    #[error("mesh does not match any known primitive family")]
    Unclassified,
    /// The mesh claims a family but is too small or too irregular to measure.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
    #[error("generator rejected the parameters: {0}")]
    GeneratorRejection(#[from] GeneratorError),
    #[error("invalid mesh: {0}")]
    InvalidMesh(#[from] ValidationError),
    #[error("object {0} does not exist")]
    MissingObject(ObjectId),
    #[error("object {0} carries no mesh data")]
    NotAMesh(ObjectId),
    /// A temporary twin object survived its deletion retry.
    #[error("temporary object {0} could not be removed from the scene")]
    TwinLeak(ObjectId),
    #[error("edit session is {0:?}, expected Previewing")]
    SessionClosed(SessionState),
    /// Singular value decomposition did not converge.
    #[error("rotation fit failed: {0}")]
    Svd(String),
}

pub type Result<T> = std::result::Result<T, ReprimitiveError>;
