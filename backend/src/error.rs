use axum::{
    Json,
    extract::rejection::{BytesRejection, JsonRejection, QueryRejection},
    http::StatusCode,
};
use thiserror::Error;

use crate::directions::DirectionsError;
use crate::emergency::EmergencyError;
use crate::geo::GeoError;
use crate::gpx_import::GpxImportError;
use crate::models::ApiError;
use crate::repository::RepositoryError;
use crate::trip::TripError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error(transparent)]
    GpxImport(#[from] GpxImportError),
    #[error("invalid coordinates: {0}")]
    Geo(#[from] GeoError),
    #[error(transparent)]
    Trip(#[from] TripError),
    #[error(transparent)]
    Emergency(#[from] EmergencyError),
    #[error(transparent)]
    Directions(#[from] DirectionsError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("{0}")]
    BadRequest(String),
    #[error("invalid request body: {}", .0.body_text())]
    Json(#[from] JsonRejection),
    #[error("invalid query string: {}", .0.body_text())]
    Query(#[from] QueryRejection),
    #[error("{}", .0.body_text())]
    Body(#[from] BytesRejection),
    #[error("routing service is not configured")]
    RoutingUnavailable,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Gpx(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::GpxImport(_)
            | Self::Geo(_)
            | Self::Trip(_)
            | Self::BadRequest(_)
            | Self::Json(_)
            | Self::Query(_) => StatusCode::BAD_REQUEST,
            Self::Body(rejection) => rejection.status(),
            Self::Emergency(EmergencyError::NoSheltersAvailable) => StatusCode::NOT_FOUND,
            Self::Directions(err) => match err {
                DirectionsError::NoRoute => StatusCode::NOT_FOUND,
                DirectionsError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
                DirectionsError::Http(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RoutingUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Maps any handler failure to the JSON error body returned by the API.
pub fn api_error(err: impl Into<AppError>) -> (StatusCode, Json<ApiError>) {
    let err = err.into();
    let status = err.status();
    if status.is_server_error() {
        tracing::error!("request failed with {status}: {err}");
    } else {
        tracing::debug!("request rejected with {status}: {err}");
    }
    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
