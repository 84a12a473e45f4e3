//! Planar distance and step primitives.
//!
//! Coordinates are treated as a flat plane (degrees on both axes); this is
//! the metric the route engine scores moves with, not a geodesic one.

use crate::error::GeometryError;
use crate::heading::Heading;
use crate::models::LngLat;

/// Euclidean distance in degrees.
pub fn distance(a: LngLat, b: LngLat) -> f64 {
    let d_lng = a.lng - b.lng;
    let d_lat = a.lat - b.lat;
    (d_lng * d_lng + d_lat * d_lat).sqrt()
}

/// Strictly closer than `threshold`.
pub fn is_close(a: LngLat, b: LngLat, threshold: f64) -> bool {
    distance(a, b) < threshold
}

/// Position after one move at an externally supplied angle.
///
/// The angle must be one of the defined heading angles (999 hovers).
pub fn next_position(start: LngLat, angle: f64, step_length: f64) -> Result<LngLat, GeometryError> {
    let heading = Heading::from_exact_angle(angle)?;
    Ok(heading.step(start, step_length))
}
