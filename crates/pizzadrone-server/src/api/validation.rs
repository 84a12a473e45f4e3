//! Request validation shared by the geometry and routing endpoints.

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use pizzadrone_core::region::is_closed_polygon;
use pizzadrone_core::{Heading, LngLat, NamedRegion};
use serde_json::{json, Value};

pub type ApiError = (StatusCode, Json<Value>);

pub fn api_error(status: StatusCode, error: &str, details: impl Into<String>) -> ApiError {
    (
        status,
        Json(json!({
            "error": error,
            "details": details.into()
        })),
    )
}

pub fn bad_request(error: &str, details: impl Into<String>) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, error, details)
}

/// Unwrap a JSON body, turning missing fields, wrong types and malformed JSON
/// into a 400 rather than axum's plain-text rejection.
pub fn request_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| bad_request("Invalid request body", rejection.body_text()))
}

pub fn validate_position(field: &str, position: Option<LngLat>) -> Result<LngLat, ApiError> {
    let position = position
        .ok_or_else(|| bad_request("Invalid position", format!("{field} is missing")))?;
    if !position.is_valid() {
        return Err(bad_request(
            "Invalid position",
            format!("{field} must have lng in [-180, 180] and lat in [-90, 90]"),
        ));
    }
    Ok(position)
}

pub fn validate_angle(angle: Option<f64>) -> Result<f64, ApiError> {
    let angle = angle.ok_or_else(|| bad_request("Invalid angle", "angle is missing"))?;
    Heading::from_exact_angle(angle).map_err(|_| {
        bad_request(
            "Invalid angle",
            "must be a compass direction in 22.5 degree steps or 999 for hovering",
        )
    })?;
    Ok(angle)
}

pub fn validate_region(field: &str, region: Option<NamedRegion>) -> Result<NamedRegion, ApiError> {
    let region =
        region.ok_or_else(|| bad_request("Invalid region", format!("{field} is missing")))?;

    if region.name.trim().is_empty() {
        return Err(bad_request("Invalid region", format!("{field} name is missing")));
    }
    if region.vertices.is_empty() {
        return Err(bad_request(
            "Invalid region",
            format!("{} boundary vertices are missing", region.name),
        ));
    }
    if let Some(vertex) = region.vertices.iter().find(|vertex| !vertex.is_valid()) {
        return Err(bad_request(
            "Invalid region",
            format!(
                "{} has vertex ({}, {}) outside lng [-180, 180] / lat [-90, 90]",
                region.name, vertex.lng, vertex.lat
            ),
        ));
    }
    if !is_closed_polygon(&region.vertices) {
        return Err(bad_request(
            "Invalid region",
            format!(
                "{} has insufficient distinct vertices to form a closed region",
                region.name
            ),
        ));
    }
    Ok(region)
}
