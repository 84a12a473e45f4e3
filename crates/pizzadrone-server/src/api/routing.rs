//! Route planning endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use pizzadrone_core::{plan_route_detailed, route_feature_collection, LngLat, NamedRegion, RoutePlan};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::api::validation::{
    api_error, bad_request, request_body, validate_position, validate_region, ApiError,
};
use crate::regions::RegionSnapshot;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RoutePlanRequest {
    pub origin: Option<LngLat>,
    /// Defaults to the configured delivery point
    pub destination: Option<LngLat>,
    /// Taken from the region data service when omitted
    pub no_fly_zones: Option<Vec<NamedRegion>>,
    pub central_area: Option<NamedRegion>,
}

#[derive(Debug, Serialize)]
pub struct RoutePlanResponse {
    pub path: Vec<LngLat>,
    pub moves: usize,
    pub nodes_visited: usize,
    pub within_move_budget: bool,
    pub budget_exhausted: bool,
    pub destination: LngLat,
}

struct PlanInputs {
    origin: LngLat,
    destination: LngLat,
    destination_name: String,
    central_area: NamedRegion,
    no_fly_zones: Vec<NamedRegion>,
}

async fn resolve_inputs(state: &AppState, req: RoutePlanRequest) -> Result<PlanInputs, ApiError> {
    let origin = validate_position("origin", req.origin)?;
    let (destination, destination_name) = match req.destination {
        Some(destination) => (
            validate_position("destination", Some(destination))?,
            "Destination".to_string(),
        ),
        None => (
            state.config().destination,
            state.config().destination_name.clone(),
        ),
    };

    let (central_area, no_fly_zones) = match (req.central_area, req.no_fly_zones) {
        (Some(central), Some(zones)) => (
            validate_region("central_area", Some(central))?,
            validate_zones(zones)?,
        ),
        (central, zones) => {
            let snapshot = fetch_regions(state).await?;
            let central = match central {
                Some(central) => validate_region("central_area", Some(central))?,
                None => snapshot.central_area,
            };
            let zones = match zones {
                Some(zones) => validate_zones(zones)?,
                None => snapshot.no_fly_zones,
            };
            (central, zones)
        }
    };

    Ok(PlanInputs {
        origin,
        destination,
        destination_name,
        central_area,
        no_fly_zones,
    })
}

fn validate_zones(zones: Vec<NamedRegion>) -> Result<Vec<NamedRegion>, ApiError> {
    zones
        .into_iter()
        .map(|zone| validate_region("no_fly_zones", Some(zone)))
        .collect()
}

async fn fetch_regions(state: &AppState) -> Result<RegionSnapshot, ApiError> {
    state.current_regions().await.map_err(|err| {
        tracing::warn!("Region data unavailable: {}", err);
        api_error(StatusCode::BAD_GATEWAY, "Region data unavailable", err.to_string())
    })
}

/// Run the search off the async runtime; it is CPU bound.
async fn run_planner(state: &AppState, inputs: PlanInputs) -> Result<(PlanInputs, RoutePlan), ApiError> {
    let rules = state.rules().clone();
    let joined = tokio::task::spawn_blocking(move || {
        let plan = plan_route_detailed(
            inputs.origin,
            inputs.destination,
            &inputs.no_fly_zones,
            &inputs.central_area,
            &rules,
        );
        (inputs, plan)
    })
    .await
    .map_err(|err| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Route planning failed",
            err.to_string(),
        )
    })?;

    let (inputs, plan) = joined;
    let plan = plan.map_err(|err| bad_request("Invalid region", err.to_string()))?;
    tracing::info!(
        moves = plan.moves(),
        nodes_visited = plan.nodes_visited,
        found = plan.found(),
        "Planned route to {}",
        inputs.destination_name
    );
    Ok((inputs, plan))
}

pub async fn plan_route_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RoutePlanRequest>, JsonRejection>,
) -> Result<Json<RoutePlanResponse>, ApiError> {
    let inputs = resolve_inputs(&state, request_body(payload)?).await?;
    let (inputs, plan) = run_planner(&state, inputs).await?;

    let within_move_budget = plan.found() && plan.path.len() <= state.rules().max_moves;
    Ok(Json(RoutePlanResponse {
        moves: plan.moves(),
        nodes_visited: plan.nodes_visited,
        within_move_budget,
        budget_exhausted: plan.budget_exhausted,
        destination: inputs.destination,
        path: plan.path,
    }))
}

/// Same inputs as [`plan_route_handler`], rendered as a GeoJSON FeatureCollection.
pub async fn plan_route_geojson(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RoutePlanRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let inputs = resolve_inputs(&state, request_body(payload)?).await?;
    let (inputs, plan) = run_planner(&state, inputs).await?;

    Ok(Json(route_feature_collection(
        &plan.path,
        &inputs.destination_name,
        inputs.destination,
        &inputs.central_area,
        &inputs.no_fly_zones,
    )))
}

/// Current validated region snapshot.
pub async fn list_regions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RegionSnapshot>, ApiError> {
    fetch_regions(&state).await.map(Json)
}
