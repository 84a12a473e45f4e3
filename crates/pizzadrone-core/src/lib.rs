pub mod error;
pub mod geojson;
pub mod heading;
pub mod models;
pub mod region;
pub mod route_engine;
pub mod rules;
pub mod spatial;

pub use error::GeometryError;
pub use geojson::route_feature_collection;
pub use heading::Heading;
pub use models::{LngLat, NamedRegion};
pub use region::{contains_point, in_region_or_on_boundary, is_closed_polygon, on_boundary};
pub use route_engine::{plan_route, plan_route_detailed, RoutePlan};
pub use rules::FlightRules;
pub use spatial::{distance, is_close, next_position};
