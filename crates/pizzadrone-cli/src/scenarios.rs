//! Delivery scenarios: an origin, a destination and the regions to plan around.

use anyhow::{Context, Result};
use pizzadrone_core::rules::APPLETON_TOWER;
use pizzadrone_core::{
    plan_route_detailed, route_feature_collection, FlightRules, GeometryError, LngLat,
    NamedRegion, RoutePlan,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

fn default_destination() -> LngLat {
    APPLETON_TOWER
}

fn default_destination_name() -> String {
    "Appleton Tower".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub origin: LngLat,
    #[serde(default = "default_destination")]
    pub destination: LngLat,
    #[serde(default = "default_destination_name")]
    pub destination_name: String,
    pub central_area: NamedRegion,
    #[serde(default)]
    pub no_fly_zones: Vec<NamedRegion>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(json).context("parse scenario")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.origin.is_valid(), "origin is out of range");
        anyhow::ensure!(self.destination.is_valid(), "destination is out of range");
        for region in std::iter::once(&self.central_area).chain(&self.no_fly_zones) {
            if let Some(vertex) = region.vertices.iter().find(|vertex| !vertex.is_valid()) {
                anyhow::bail!(
                    "region '{}' has vertex ({}, {}) out of range",
                    region.name,
                    vertex.lng,
                    vertex.lat
                );
            }
            region.validate()?;
        }
        Ok(())
    }

    pub fn plan(&self, rules: &FlightRules) -> Result<RoutePlan, GeometryError> {
        plan_route_detailed(
            self.origin,
            self.destination,
            &self.no_fly_zones,
            &self.central_area,
            rules,
        )
    }

    pub fn geojson(&self, path: &[LngLat]) -> Value {
        route_feature_collection(
            path,
            &self.destination_name,
            self.destination,
            &self.central_area,
            &self.no_fly_zones,
        )
    }

    /// Request body for the server's `/v1/routes/plan` and `/v1/routes/geojson`.
    pub fn plan_request(&self) -> Value {
        serde_json::json!({
            "origin": self.origin,
            "destination": self.destination,
            "central_area": self.central_area,
            "no_fly_zones": self.no_fly_zones,
        })
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read scenario {}", path.display()))?;
    Scenario::from_json(&json).with_context(|| format!("load scenario {}", path.display()))
}

/// Delivery from a restaurant west of the central area to Appleton Tower,
/// routed around George Square.
pub fn edinburgh_demo() -> Scenario {
    let central_area = NamedRegion::new(
        "central",
        vec![
            LngLat::new(-3.192473, 55.946233),
            LngLat::new(-3.192473, 55.942617),
            LngLat::new(-3.184319, 55.942617),
            LngLat::new(-3.184319, 55.946233),
            LngLat::new(-3.192473, 55.946233),
        ],
    );
    let george_square = NamedRegion::new(
        "George Square Area",
        vec![
            LngLat::new(-3.19057881832123, 55.9440241257753),
            LngLat::new(-3.18998873233795, 55.9428465054091),
            LngLat::new(-3.1870973110199, 55.9432881172426),
            LngLat::new(-3.18768203258514, 55.9444777403937),
            LngLat::new(-3.19057881832123, 55.9440241257753),
        ],
    );

    Scenario {
        name: "edinburgh".to_string(),
        origin: LngLat::new(-3.20254147052765, 55.9432847375794),
        destination: APPLETON_TOWER,
        destination_name: default_destination_name(),
        central_area,
        no_fly_zones: vec![george_square],
    }
}
