//! REST API routes.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{geometry, request_id, routing};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    let geometry_routes = Router::new()
        .route("/v1/distanceTo", post(geometry::distance_to))
        .route("/v1/isCloseTo", post(geometry::is_close_to))
        .route("/v1/nextPosition", post(geometry::next_position))
        .route("/v1/isInRegion", post(geometry::is_in_region));

    let route_planning = Router::new()
        .route("/v1/routes/plan", post(routing::plan_route_handler))
        .route("/v1/routes/geojson", post(routing::plan_route_geojson))
        .route("/v1/regions", get(routing::list_regions));

    geometry_routes
        .merge(route_planning)
        .route("/health", get(|| async { "OK" }))
        .layer(middleware::from_fn(request_id::ensure_request_id))
}
