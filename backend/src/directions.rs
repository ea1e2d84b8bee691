//! Walking directions from the OpenRouteService API.
//!
//! The HTTP state only sees the [`RouteProvider`] trait, so the real client
//! can be swapped for a fake in tests or left out when no API key is set.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::{
    models::{Coordinate, Route, RouteStep, RoutingProfile},
    polyline::{self, DEFAULT_PRECISION, PolylineError},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum DirectionsError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("routing service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("no route found")]
    NoRoute,
    #[error("invalid route geometry: {0}")]
    Polyline(#[from] PolylineError),
    #[error("invalid routing response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid routing configuration: {0}")]
    Config(String),
}

/// Source of walking routes between two points.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn directions(
        &self,
        profile: RoutingProfile,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Route, DirectionsError>;
}

/// Hiking trails first, plain walking if the hiking profile fails for any reason.
pub async fn hiking_route(
    provider: &dyn RouteProvider,
    start: Coordinate,
    end: Coordinate,
) -> Result<Route, DirectionsError> {
    match provider
        .directions(RoutingProfile::FootHiking, start, end)
        .await
    {
        Ok(route) => Ok(route),
        Err(err) => {
            tracing::warn!("hiking route failed, falling back to walking: {err}");
            provider
                .directions(RoutingProfile::FootWalking, start, end)
                .await
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenRouteServiceConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl OpenRouteServiceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Clone)]
pub struct OpenRouteServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenRouteServiceClient {
    pub fn new(config: OpenRouteServiceConfig) -> Result<Self, DirectionsError> {
        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| DirectionsError::Config(format!("invalid API key: {e}")))?;
        headers.insert(AUTHORIZATION, token);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    /// `[lng, lat]` pairs.
    coordinates: [[f64; 2]; 2],
    instructions: bool,
}

#[async_trait]
impl RouteProvider for OpenRouteServiceClient {
    async fn directions(
        &self,
        profile: RoutingProfile,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Route, DirectionsError> {
        let url = format!("{}/v2/directions/{}", self.base_url, profile.as_str());
        let request = DirectionsRequest {
            coordinates: [
                [start.longitude, start.latitude],
                [end.longitude, end.latitude],
            ],
            instructions: true,
        };

        tracing::debug!("requesting {} route from {url}", profile.as_str());
        let response = self.http.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("routing service error {status}: {body}");
            return Err(DirectionsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: DirectionsResponse = serde_json::from_str(&body)?;
        parse_directions(parsed, profile, start, end)
    }
}

/// Raw directions payload; either GeoJSON `features` or JSON `routes`.
#[derive(Debug, Default, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    features: Vec<Feature>,
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: LineString,
    #[serde(default)]
    properties: RouteProperties,
}

#[derive(Debug, Deserialize)]
struct LineString {
    coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct RouteProperties {
    #[serde(default)]
    summary: Summary,
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    summary: Summary,
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawGeometry {
    Encoded(String),
    Coordinates(Vec<Vec<f64>>),
}

#[derive(Debug, Default, Deserialize)]
struct Summary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    #[serde(default)]
    instruction: String,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

/// Turns a directions payload into a [`Route`] with `(lat, lng)` coordinates.
///
/// A route without geometry falls back to the straight segment `start -> end`.
pub fn parse_directions(
    response: DirectionsResponse,
    profile: RoutingProfile,
    start: Coordinate,
    end: Coordinate,
) -> Result<Route, DirectionsError> {
    if let Some(feature) = response.features.into_iter().next() {
        return Ok(Route {
            coordinates: swap_lng_lat(&feature.geometry.coordinates),
            distance_meters: feature.properties.summary.distance,
            duration_seconds: feature.properties.summary.duration,
            steps: first_segment_steps(feature.properties.segments),
            profile,
        });
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(DirectionsError::NoRoute)?;

    let coordinates = match route.geometry {
        Some(RawGeometry::Coordinates(pairs)) => swap_lng_lat(&pairs),
        Some(RawGeometry::Encoded(encoded)) => {
            let decoded = polyline::decode(&encoded, DEFAULT_PRECISION)?;
            tracing::debug!("decoded {} route points", decoded.len());
            decoded
        }
        None => {
            tracing::debug!("route has no geometry, using direct line");
            vec![start, end]
        }
    };

    Ok(Route {
        coordinates,
        distance_meters: route.summary.distance,
        duration_seconds: route.summary.duration,
        steps: first_segment_steps(route.segments),
        profile,
    })
}

fn swap_lng_lat(pairs: &[Vec<f64>]) -> Vec<Coordinate> {
    pairs
        .iter()
        .filter_map(|pair| match pair.as_slice() {
            [lng, lat, ..] => Some(Coordinate::new(*lat, *lng)),
            _ => None,
        })
        .collect()
}

fn first_segment_steps(segments: Vec<Segment>) -> Vec<RouteStep> {
    segments
        .into_iter()
        .next()
        .map(|segment| {
            segment
                .steps
                .into_iter()
                .map(|step| RouteStep {
                    instruction: step.instruction,
                    distance_meters: step.distance,
                    duration_seconds: step.duration,
                })
                .collect()
        })
        .unwrap_or_default()
}
