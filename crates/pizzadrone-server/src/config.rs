//! Server configuration from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use pizzadrone_core::rules::APPLETON_TOWER;
use pizzadrone_core::{FlightRules, LngLat};

pub const DEFAULT_DATA_URL: &str = "https://ilp-rest-2024.azurewebsites.net";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Base URL of the region data service (`/centralArea`, `/noFlyZones`)
    pub data_url: String,
    pub step_length: f64,
    pub close_distance: f64,
    pub max_moves: usize,
    /// Node expansion cap per planning request; 0 disables the cap
    pub max_expansions: usize,
    pub region_ttl_s: u64,
    pub fetch_retries: u32,
    pub fetch_timeout_s: u64,
    pub destination: LngLat,
    pub destination_name: String,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = FlightRules::default();
        Self {
            server_port: parse_env("PIZZADRONE_PORT", 8080),
            data_url: env::var("PIZZADRONE_DATA_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_DATA_URL.to_string()),
            step_length: parse_env("PIZZADRONE_STEP_LENGTH", defaults.step_length),
            close_distance: parse_env("PIZZADRONE_CLOSE_DISTANCE", defaults.proximity_threshold),
            max_moves: parse_env("PIZZADRONE_MAX_MOVES", defaults.max_moves),
            max_expansions: parse_env("PIZZADRONE_MAX_EXPANSIONS", 2_000_000),
            region_ttl_s: parse_env("PIZZADRONE_REGION_TTL_S", 300),
            fetch_retries: parse_env("PIZZADRONE_FETCH_RETRIES", 3),
            fetch_timeout_s: parse_env("PIZZADRONE_FETCH_TIMEOUT_S", 10),
            destination: LngLat::new(
                parse_env("PIZZADRONE_DESTINATION_LNG", APPLETON_TOWER.lng),
                parse_env("PIZZADRONE_DESTINATION_LAT", APPLETON_TOWER.lat),
            ),
            destination_name: env::var("PIZZADRONE_DESTINATION_NAME")
                .unwrap_or_else(|_| "Appleton Tower".to_string()),
        }
    }

    pub fn flight_rules(&self) -> FlightRules {
        let rules = FlightRules {
            step_length: self.step_length,
            proximity_threshold: self.close_distance,
            max_moves: self.max_moves,
            ..FlightRules::default()
        };
        if self.max_expansions == 0 {
            rules
        } else {
            rules.with_max_expansions(self.max_expansions)
        }
    }

    pub fn region_ttl(&self) -> Duration {
        Duration::from_secs(self.region_ttl_s.max(1))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_s.max(1))
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
