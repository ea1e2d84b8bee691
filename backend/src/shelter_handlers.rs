use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};

use crate::AppState;
use crate::error::api_error;
use crate::models::{ApiError, Shelter, ShelterSearchResponse};
use crate::repository::{RepositoryError, ShelterSearchParams};

/// GET /api/shelters - Every shelter, ordered by name
pub async fn list_shelters(
    State(state): State<AppState>,
) -> Result<Json<Vec<Shelter>>, (StatusCode, Json<ApiError>)> {
    state
        .shelters
        .all_shelters()
        .await
        .map(Json)
        .map_err(api_error)
}

/// GET /api/shelters/search - Filtered shelters that have coordinates
pub async fn search_shelters(
    State(state): State<AppState>,
    params: Result<Query<ShelterSearchParams>, QueryRejection>,
) -> Result<Json<ShelterSearchResponse>, (StatusCode, Json<ApiError>)> {
    let Query(params) = params.map_err(api_error)?;
    let Some(filter) = params.into_filter() else {
        return Ok(Json(ShelterSearchResponse {
            count: 0,
            shelters: Vec::new(),
        }));
    };
    let shelters = state
        .shelters
        .find_shelters(&filter)
        .await
        .map_err(api_error)?;

    Ok(Json(ShelterSearchResponse {
        count: shelters.len(),
        shelters,
    }))
}

/// GET /api/shelters/:id - A single shelter
pub async fn get_shelter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Shelter>, (StatusCode, Json<ApiError>)> {
    match state.shelters.get_shelter(&id).await {
        Ok(Some(shelter)) => Ok(Json(shelter)),
        Ok(None) => Err(api_error(RepositoryError::NotFound(id))),
        Err(err) => Err(api_error(err)),
    }
}
