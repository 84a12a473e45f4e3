//! Geometry query endpoints.
//!
//! Thin wrappers over the core primitives, using the server's configured step
//! length and proximity threshold.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use pizzadrone_core::{spatial, LngLat, NamedRegion};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::validation::{
    bad_request, request_body, validate_angle, validate_position, validate_region, ApiError,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PositionPairRequest {
    pub position1: Option<LngLat>,
    pub position2: Option<LngLat>,
}

#[derive(Debug, Deserialize)]
pub struct NextPositionRequest {
    pub start: Option<LngLat>,
    pub angle: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RegionQueryRequest {
    pub position: Option<LngLat>,
    pub region: Option<NamedRegion>,
}

fn validate_pair(req: PositionPairRequest) -> Result<(LngLat, LngLat), ApiError> {
    Ok((
        validate_position("position1", req.position1)?,
        validate_position("position2", req.position2)?,
    ))
}

/// Euclidean distance between two positions.
pub async fn distance_to(
    payload: Result<Json<PositionPairRequest>, JsonRejection>,
) -> Result<Json<f64>, ApiError> {
    let (a, b) = validate_pair(request_body(payload)?)?;
    Ok(Json(spatial::distance(a, b)))
}

/// Whether two positions are closer than the proximity threshold.
pub async fn is_close_to(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PositionPairRequest>, JsonRejection>,
) -> Result<Json<bool>, ApiError> {
    let (a, b) = validate_pair(request_body(payload)?)?;
    Ok(Json(spatial::is_close(a, b, state.rules().proximity_threshold)))
}

pub async fn next_position(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NextPositionRequest>, JsonRejection>,
) -> Result<Json<LngLat>, ApiError> {
    let req = request_body(payload)?;
    let start = validate_position("start", req.start)?;
    let angle = validate_angle(req.angle)?;
    spatial::next_position(start, angle, state.rules().step_length)
        .map(Json)
        .map_err(|err| bad_request("Invalid angle", err.to_string()))
}

/// Point-in-region with edges counted as inside.
pub async fn is_in_region(
    payload: Result<Json<RegionQueryRequest>, JsonRejection>,
) -> Result<Json<bool>, ApiError> {
    let req = request_body(payload)?;
    let position = validate_position("position", req.position)?;
    let region = validate_region("region", req.region)?;
    region
        .contains(position)
        .map(Json)
        .map_err(|err| bad_request("Invalid region", err.to_string()))
}
