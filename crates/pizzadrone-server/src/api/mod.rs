//! HTTP API for the route planner.

pub mod geometry;
pub mod request_id;
mod routes;
pub mod routing;
pub mod validation;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    routes::create_router()
}
