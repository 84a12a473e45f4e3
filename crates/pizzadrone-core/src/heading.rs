//! Discrete movement model: sixteen compass headings plus hover.
//!
//! Angles are degrees counter-clockwise from due east, so 0 is east, 90 is
//! north, 180 is west and 270 is south. Hover uses the sentinel angle 999 and
//! never moves the drone.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::models::LngLat;

pub const HOVER_ANGLE: f64 = 999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Heading {
    East,
    EastNorthEast,
    NorthEast,
    NorthNorthEast,
    North,
    NorthNorthWest,
    NorthWest,
    WestNorthWest,
    West,
    WestSouthWest,
    SouthWest,
    SouthSouthWest,
    South,
    SouthSouthEast,
    SouthEast,
    EastSouthEast,
    Hover,
}

impl Heading {
    /// The sixteen moving headings in enumeration order.
    pub const COMPASS: [Heading; 16] = [
        Heading::East,
        Heading::EastNorthEast,
        Heading::NorthEast,
        Heading::NorthNorthEast,
        Heading::North,
        Heading::NorthNorthWest,
        Heading::NorthWest,
        Heading::WestNorthWest,
        Heading::West,
        Heading::WestSouthWest,
        Heading::SouthWest,
        Heading::SouthSouthWest,
        Heading::South,
        Heading::SouthSouthEast,
        Heading::SouthEast,
        Heading::EastSouthEast,
    ];

    /// Every heading, hover last.
    pub const ALL: [Heading; 17] = [
        Heading::East,
        Heading::EastNorthEast,
        Heading::NorthEast,
        Heading::NorthNorthEast,
        Heading::North,
        Heading::NorthNorthWest,
        Heading::NorthWest,
        Heading::WestNorthWest,
        Heading::West,
        Heading::WestSouthWest,
        Heading::SouthWest,
        Heading::SouthSouthWest,
        Heading::South,
        Heading::SouthSouthEast,
        Heading::SouthEast,
        Heading::EastSouthEast,
        Heading::Hover,
    ];

    pub fn angle(self) -> f64 {
        match self {
            Heading::East => 0.0,
            Heading::EastNorthEast => 22.5,
            Heading::NorthEast => 45.0,
            Heading::NorthNorthEast => 67.5,
            Heading::North => 90.0,
            Heading::NorthNorthWest => 112.5,
            Heading::NorthWest => 135.0,
            Heading::WestNorthWest => 157.5,
            Heading::West => 180.0,
            Heading::WestSouthWest => 202.5,
            Heading::SouthWest => 225.0,
            Heading::SouthSouthWest => 247.5,
            Heading::South => 270.0,
            Heading::SouthSouthEast => 292.5,
            Heading::SouthEast => 315.0,
            Heading::EastSouthEast => 337.5,
            Heading::Hover => HOVER_ANGLE,
        }
    }

    pub fn is_hover(self) -> bool {
        self == Heading::Hover
    }

    /// Look up the heading whose angle equals `degrees` exactly.
    ///
    /// Used to validate externally supplied angles, so 999 maps to hover.
    pub fn from_exact_angle(degrees: f64) -> Result<Heading, GeometryError> {
        Heading::ALL
            .into_iter()
            .find(|heading| heading.angle() == degrees)
            .ok_or(GeometryError::NoMatchingHeading(degrees))
    }

    /// Closest compass heading by circular distance. Hover is never returned.
    ///
    /// At an exact midpoint between two headings the one enumerated first wins.
    pub fn nearest(degrees: f64) -> Result<Heading, GeometryError> {
        if !(0.0..=360.0).contains(&degrees) {
            return Err(GeometryError::AngleOutOfRange(degrees));
        }

        let mut best = Heading::East;
        let mut best_diff = f64::INFINITY;
        for heading in Heading::COMPASS {
            let diff = circular_difference(heading.angle(), degrees);
            if diff < best_diff {
                best = heading;
                best_diff = diff;
            }
        }
        Ok(best)
    }

    /// The heading rotated by 180 degrees. Hover is its own opposite.
    pub fn opposite(self) -> Heading {
        match self {
            Heading::Hover => Heading::Hover,
            heading => {
                let idx = Heading::COMPASS
                    .iter()
                    .position(|candidate| *candidate == heading)
                    .unwrap_or(0);
                Heading::COMPASS[(idx + 8) % 16]
            }
        }
    }

    /// Displace `point` by `step_length` along this heading.
    pub fn step(self, point: LngLat, step_length: f64) -> LngLat {
        if self.is_hover() {
            return point;
        }
        let radians = self.angle().to_radians();
        LngLat {
            lng: point.lng + step_length * radians.cos(),
            lat: point.lat + step_length * radians.sin(),
        }
    }
}

fn circular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(360.0 - diff)
}
