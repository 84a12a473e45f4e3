//! Errors raised by the geometry oracle and the movement model.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Fewer than 3 vertices, all vertices coincident, or all collinear.
    #[error("invalid polygon '{name}': {reason}")]
    InvalidPolygon { name: String, reason: String },

    /// A containment query was issued against an empty vertex list.
    #[error("polygon has no vertices")]
    EmptyPolygon,

    #[error("no compass heading has angle {0}")]
    NoMatchingHeading(f64),

    #[error("angle {0} is outside [0, 360]")]
    AngleOutOfRange(f64),
}
