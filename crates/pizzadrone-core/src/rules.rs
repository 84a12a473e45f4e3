//! Movement constants and planning limits.

use serde::{Deserialize, Serialize};

use crate::models::LngLat;

/// Appleton Tower, the default delivery point.
pub const APPLETON_TOWER: LngLat = LngLat::new(-3.186874, 55.944494);

/// Configuration threaded into every planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRules {
    /// Distance covered by one compass move (degrees)
    pub step_length: f64,
    /// Two points closer than this are considered the same position
    pub proximity_threshold: f64,
    /// Longest acceptable route in moves; checked by callers, not the engine
    pub max_moves: usize,
    /// Name of the region the drone may not leave once entered
    pub central_region_name: String,
    /// Optional cap on node expansions; `None` searches until the frontier empties
    #[serde(default)]
    pub max_expansions: Option<usize>,
}

impl Default for FlightRules {
    fn default() -> Self {
        Self {
            step_length: 0.00015,
            proximity_threshold: 0.00015,
            max_moves: 2000,
            central_region_name: "central".into(),
            max_expansions: None,
        }
    }
}

impl FlightRules {
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }
}
