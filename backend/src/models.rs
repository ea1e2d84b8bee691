//! Wire types shared with API clients.

pub use shared::{
    ApiError, Coordinate, DayPlan, GpxTrackSummary, NearestShelterResponse, Route, RouteRequest,
    RouteStep, RoutingProfile, Shelter, ShelterKind, ShelterSearchResponse, Stage, StageEndpoint,
    TripGpxResponse, TripPlanRequest, TripPlanResponse, TripSummary,
};
