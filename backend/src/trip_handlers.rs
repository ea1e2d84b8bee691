use axum::{
    Json,
    body::Bytes,
    extract::{
        State,
        rejection::{BytesRejection, JsonRejection},
    },
    http::StatusCode,
};

use crate::AppState;
use crate::directions::hiking_route as fetch_hiking_route;
use crate::error::{AppError, api_error};
use crate::geo::validate_coordinate;
use crate::gpx_export::encode_trip_as_gpx;
use crate::gpx_import::summarize_gpx;
use crate::models::{
    ApiError, GpxTrackSummary, Route, RouteRequest, TripGpxResponse, TripPlanRequest,
    TripPlanResponse,
};
use crate::trip::{TripPlan, plan_trip};

/// Minimum number of shelters that make a trip.
const MIN_TRIP_SHELTERS: usize = 2;

async fn build_plan(
    state: &AppState,
    req: &TripPlanRequest,
) -> Result<TripPlan, (StatusCode, Json<ApiError>)> {
    if req.shelter_ids.len() < MIN_TRIP_SHELTERS {
        return Err(api_error(AppError::BadRequest(format!(
            "a trip needs at least {MIN_TRIP_SHELTERS} shelters, got {}",
            req.shelter_ids.len()
        ))));
    }

    let shelters = state
        .shelters
        .resolve_ordered(&req.shelter_ids)
        .await
        .map_err(api_error)?;
    let max_daily_hours = req.max_daily_hours.unwrap_or(state.max_daily_hours);

    plan_trip(&shelters, max_daily_hours).map_err(api_error)
}

/// POST /api/trips/plan - Split an ordered shelter list into daily stages
pub async fn plan_trip_handler(
    State(state): State<AppState>,
    req: Result<Json<TripPlanRequest>, JsonRejection>,
) -> Result<Json<TripPlanResponse>, (StatusCode, Json<ApiError>)> {
    let Json(req) = req.map_err(api_error)?;
    let plan = build_plan(&state, &req).await?;
    tracing::info!(
        "trip over {} shelters: {} stages in {} days",
        req.shelter_ids.len(),
        plan.summary.stage_count,
        plan.summary.total_days
    );

    Ok(Json(TripPlanResponse {
        stages: plan.stages,
        days: plan.days,
        summary: plan.summary,
    }))
}

/// POST /api/trips/gpx - Same plan, exported as base64 GPX
pub async fn export_trip_gpx(
    State(state): State<AppState>,
    req: Result<Json<TripPlanRequest>, JsonRejection>,
) -> Result<Json<TripGpxResponse>, (StatusCode, Json<ApiError>)> {
    let Json(req) = req.map_err(api_error)?;
    let plan = build_plan(&state, &req).await?;
    let gpx_base64 = encode_trip_as_gpx(&plan.stages).map_err(api_error)?;
    Ok(Json(TripGpxResponse { gpx_base64 }))
}

/// POST /api/trip/hiking-route - Trail route between two points
pub async fn hiking_route(
    State(state): State<AppState>,
    req: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<Route>, (StatusCode, Json<ApiError>)> {
    let Json(req) = req.map_err(api_error)?;
    let start = validate_coordinate(req.start.latitude, req.start.longitude).map_err(api_error)?;
    let end = validate_coordinate(req.end.latitude, req.end.longitude).map_err(api_error)?;
    let provider = state
        .directions
        .as_ref()
        .ok_or_else(|| api_error(AppError::RoutingUnavailable))?;

    fetch_hiking_route(provider.as_ref(), start, end)
        .await
        .map(Json)
        .map_err(api_error)
}

/// POST /api/gpx/summary - Summarize an uploaded GPX document
pub async fn gpx_summary(
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<GpxTrackSummary>, (StatusCode, Json<ApiError>)> {
    let body = body.map_err(api_error)?;
    summarize_gpx(body.as_ref()).map(Json).map_err(api_error)
}
