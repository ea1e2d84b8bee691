use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;

use crate::AppState;
use crate::emergency::{EmergencyGuidance, nearest_shelter as find_nearest};
use crate::error::{AppError, api_error};
use crate::geo::validate_coordinate;
use crate::models::{
    ApiError, Coordinate, NearestShelterResponse, Route, RouteRequest, RoutingProfile,
};

/// Raw `lat`/`lng` query values, validated by the handler so that missing
/// and malformed numbers get the same JSON error as out-of-range ones.
#[derive(Debug, Deserialize)]
pub struct LocationParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl LocationParams {
    fn coordinate(&self) -> Result<Coordinate, AppError> {
        let (Some(lat), Some(lng)) = (self.lat.as_deref(), self.lng.as_deref()) else {
            return Err(AppError::BadRequest(
                "lat and lng query parameters are required".into(),
            ));
        };
        let parse = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| AppError::BadRequest(format!("{value:?} is not a number")))
        };
        Ok(validate_coordinate(parse(lat)?, parse(lng)?)?)
    }
}

/// GET /api/emergency/nearest-shelter - Closest shelter with bearing and walking time
pub async fn nearest_shelter(
    State(state): State<AppState>,
    params: Result<Query<LocationParams>, QueryRejection>,
) -> Result<Json<NearestShelterResponse>, (StatusCode, Json<ApiError>)> {
    let Query(params) = params.map_err(api_error)?;
    let user = params.coordinate().map_err(api_error)?;
    let shelters = state
        .shelters
        .shelters_with_coordinates()
        .await
        .map_err(api_error)?;
    let nearest = find_nearest(user, &shelters).map_err(api_error)?;

    tracing::info!(
        "nearest shelter to ({:.4}, {:.4}) is {} at {:.2} km",
        user.latitude,
        user.longitude,
        nearest.shelter.id,
        nearest.distance_km
    );

    Ok(Json(EmergencyGuidance::new(user, nearest).into_response()))
}

/// POST /api/emergency/route - Shortest walking route to safety
pub async fn emergency_route(
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

    provider
        .directions(RoutingProfile::FootWalking, start, end)
        .await
        .map(Json)
        .map_err(api_error)
}
