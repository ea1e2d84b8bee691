use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShelterKind {
    Hut,
    Shelter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ShelterKind,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub is_serviced: bool,
    #[serde(default)]
    pub accessibility: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Meters above sea level.
    #[serde(default)]
    pub elevation: Option<f64>,
}

impl Shelter {
    /// Position of the shelter, if both latitude and longitude are known.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageEndpoint {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
}

impl StageEndpoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// One leg of a trip between two consecutive shelters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub day: u32,
    pub from: StageEndpoint,
    pub to: StageEndpoint,
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub estimated_time_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: u32,
    pub stage_count: usize,
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub time_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub total_distance_km: f64,
    pub total_elevation_gain_m: f64,
    pub total_time_hours: f64,
    pub total_days: u32,
    pub stage_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanRequest {
    pub shelter_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_daily_hours: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanResponse {
    pub stages: Vec<Stage>,
    pub days: Vec<DayPlan>,
    pub summary: TripSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripGpxResponse {
    pub gpx_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestShelterResponse {
    pub user_location: Coordinate,
    pub nearest_shelter: Shelter,
    pub distance_km: f64,
    pub bearing_degrees: f64,
    pub compass: String,
    pub walking_time_hours: f64,
    /// Human readable walking time, e.g. `"1h 20min"`.
    pub walking_time: String,
    /// Human readable distance, e.g. `"3.4km"`.
    pub distance_label: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: Coordinate,
    pub end: Coordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingProfile {
    FootHiking,
    FootWalking,
}

impl RoutingProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FootHiking => "foot-hiking",
            Self::FootWalking => "foot-walking",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    pub instruction: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub coordinates: Vec<Coordinate>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub steps: Vec<RouteStep>,
    pub profile: RoutingProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelterSearchResponse {
    pub shelters: Vec<Shelter>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpxTrackSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub coordinates: Vec<Coordinate>,
    pub point_count: usize,
    pub distance_km: f64,
    pub elevation_gain_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}
