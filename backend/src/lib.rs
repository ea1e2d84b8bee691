pub mod config;
pub mod database;
pub mod directions;
pub mod emergency;
pub mod emergency_handlers;
pub mod error;
pub mod geo;
pub mod gpx_export;
pub mod gpx_import;
pub mod hiking;
pub mod models;
pub mod polyline;
pub mod repository;
pub mod shelter_handlers;
pub mod trip;
pub mod trip_handlers;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::directions::RouteProvider;
use crate::gpx_import::MAX_GPX_BYTES;
use crate::repository::ShelterRepository;

#[derive(Clone)]
pub struct AppState {
    pub shelters: Arc<dyn ShelterRepository>,
    /// `None` when no routing API key is configured.
    pub directions: Option<Arc<dyn RouteProvider>>,
    pub max_daily_hours: f64,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/shelters", get(shelter_handlers::list_shelters))
        .route("/api/shelters/search", get(shelter_handlers::search_shelters))
        .route("/api/shelters/:id", get(shelter_handlers::get_shelter))
        .route("/api/trips/plan", post(trip_handlers::plan_trip_handler))
        .route("/api/trips/gpx", post(trip_handlers::export_trip_gpx))
        .route("/api/trip/hiking-route", post(trip_handlers::hiking_route))
        .route(
            "/api/gpx/summary",
            post(trip_handlers::gpx_summary).layer(DefaultBodyLimit::max(MAX_GPX_BYTES)),
        )
        .route(
            "/api/emergency/nearest-shelter",
            get(emergency_handlers::nearest_shelter),
        )
        .route(
            "/api/emergency/route",
            post(emergency_handlers::emergency_route),
        )
        .with_state(state)
}
