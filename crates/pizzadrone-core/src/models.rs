//! Core data models for the delivery route planner.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::region;

/// A planar position: longitude on the x axis, latitude on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// True when both coordinates are inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self { lng, lat }
    }
}

/// A named polygonal area (central area or no-fly zone).
///
/// The vertex ring is treated as closed whether or not the first vertex is
/// repeated at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRegion {
    pub name: String,
    pub vertices: Vec<LngLat>,
}

impl NamedRegion {
    pub fn new(name: impl Into<String>, vertices: Vec<LngLat>) -> Self {
        Self {
            name: name.into(),
            vertices,
        }
    }

    /// Reject degenerate boundaries. Called once when a region is acquired.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.vertices.len() < 3 {
            return Err(GeometryError::InvalidPolygon {
                name: self.name.clone(),
                reason: format!("needs at least 3 vertices, got {}", self.vertices.len()),
            });
        }
        if !region::is_closed_polygon(&self.vertices) {
            return Err(GeometryError::InvalidPolygon {
                name: self.name.clone(),
                reason: "vertices are coincident or collinear".to_string(),
            });
        }
        Ok(())
    }

    /// Point-in-polygon with edges counted as inside.
    pub fn contains(&self, point: LngLat) -> Result<bool, GeometryError> {
        region::in_region_or_on_boundary(&self.vertices, point)
    }
}
