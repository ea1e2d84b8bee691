//! The OpenRouteService client against a local stand-in server.

use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use hutfinder::{
    directions::{
        DirectionsError, OpenRouteServiceClient, OpenRouteServiceConfig, RouteProvider,
        hiking_route,
    },
    models::{Coordinate, RoutingProfile},
    polyline,
};
use serde_json::{Value, json};

const API_KEY: &str = "test-key";

/// Answers like the directions endpoint; `foot-hiking` has no route.
async fn fake_directions(
    Path(profile): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {API_KEY}"));
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Access to this API has been disallowed" })),
        );
    }
    if profile == "foot-hiking" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "code": 2009, "message": "Route could not be found" } })),
        );
    }

    // echo the requested [lng, lat] pairs back as the route geometry
    let coords = &body["coordinates"];
    let start = Coordinate::new(coords[0][1].as_f64().unwrap(), coords[0][0].as_f64().unwrap());
    let end = Coordinate::new(coords[1][1].as_f64().unwrap(), coords[1][0].as_f64().unwrap());
    let geometry = polyline::encode(&[start, end], polyline::DEFAULT_PRECISION);

    (
        StatusCode::OK,
        Json(json!({
            "routes": [{
                "geometry": geometry,
                "summary": { "distance": 2345.6, "duration": 1800.0 },
                "segments": [{
                    "steps": [
                        { "instruction": "Head north", "distance": 2000.0, "duration": 1500.0 },
                        { "instruction": "Arrive at destination", "distance": 345.6, "duration": 300.0 }
                    ]
                }]
            }]
        })),
    )
}

async fn spawn_fake_ors() -> String {
    let app = Router::new().route("/v2/directions/:profile", post(fake_directions));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str, key: &str) -> OpenRouteServiceClient {
    OpenRouteServiceClient::new(
        OpenRouteServiceConfig::new(key)
            .with_base_url(format!("{base_url}/"))
            .with_timeout(5),
    )
    .unwrap()
}

fn points() -> (Coordinate, Coordinate) {
    (
        Coordinate::new(45.9205, 7.8671),
        Coordinate::new(45.9763, 7.6581),
    )
}

#[tokio::test]
async fn walking_route_is_decoded() {
    let base = spawn_fake_ors().await;
    let (start, end) = points();

    let route = client(&base, API_KEY)
        .directions(RoutingProfile::FootWalking, start, end)
        .await
        .unwrap();

    assert_eq!(route.profile, RoutingProfile::FootWalking);
    assert_eq!(route.coordinates.len(), 2);
    assert!((route.coordinates[0].latitude - start.latitude).abs() < 1e-5);
    assert!((route.coordinates[1].longitude - end.longitude).abs() < 1e-5);
    assert_eq!(route.distance_meters, 2345.6);
    assert_eq!(route.steps.len(), 2);
    assert_eq!(route.steps[0].instruction, "Head north");
}

#[tokio::test]
async fn upstream_errors_keep_status() {
    let base = spawn_fake_ors().await;
    let (start, end) = points();

    let err = client(&base, API_KEY)
        .directions(RoutingProfile::FootHiking, start, end)
        .await
        .unwrap_err();
    assert!(matches!(err, DirectionsError::Status { status: 404, .. }));

    let err = client(&base, "wrong-key")
        .directions(RoutingProfile::FootWalking, start, end)
        .await
        .unwrap_err();
    assert!(matches!(err, DirectionsError::Status { status: 401, .. }));
}

#[tokio::test]
async fn hiking_falls_back_to_walking_over_http() {
    let base = spawn_fake_ors().await;
    let (start, end) = points();

    let route = hiking_route(&client(&base, API_KEY), start, end)
        .await
        .unwrap();
    assert_eq!(route.profile, RoutingProfile::FootWalking);
}

#[tokio::test]
async fn unreachable_service_is_http_error() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (start, end) = points();

    let err = client(&format!("http://{addr}"), API_KEY)
        .directions(RoutingProfile::FootWalking, start, end)
        .await
        .unwrap_err();
    assert!(matches!(err, DirectionsError::Http(_)));
}
