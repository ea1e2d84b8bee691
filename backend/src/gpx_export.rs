use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};

use crate::error::AppError;
use crate::models::{Stage, StageEndpoint};

const CREATOR: &str = "hutfinder";

/// Serializes planned stages as a base64 GPX 1.1 document.
///
/// Every visited shelter becomes a waypoint and every day becomes a track
/// named "Day N" whose segment runs through that day's shelters.
pub fn encode_trip_as_gpx(stages: &[Stage]) -> Result<String, AppError> {
    let gpx = trip_to_gpx(stages);
    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    Ok(BASE64.encode(buffer))
}

pub fn trip_to_gpx(stages: &[Stage]) -> Gpx {
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(CREATOR.into()),
        ..Default::default()
    };

    let mut last_waypoint: Option<&str> = None;
    for stage in stages {
        for endpoint in [&stage.from, &stage.to] {
            if last_waypoint != Some(endpoint.id.as_str()) {
                gpx.waypoints.push(to_waypoint(endpoint));
                last_waypoint = Some(endpoint.id.as_str());
            }
        }
    }

    for day_stages in stages.chunk_by(|a, b| a.day == b.day) {
        let mut segment = TrackSegment::new();
        let mut last_point: Option<&str> = None;
        for stage in day_stages {
            for endpoint in [&stage.from, &stage.to] {
                if last_point != Some(endpoint.id.as_str()) {
                    segment.points.push(to_waypoint(endpoint));
                    last_point = Some(endpoint.id.as_str());
                }
            }
        }
        gpx.tracks.push(Track {
            name: Some(format!("Day {}", day_stages[0].day)),
            segments: vec![segment],
            ..Default::default()
        });
    }

    gpx
}

fn to_waypoint(endpoint: &StageEndpoint) -> Waypoint {
    let position = endpoint.coordinate();
    let mut waypoint = Waypoint::new(Point::new(position.longitude, position.latitude));
    waypoint.name = Some(endpoint.name.clone());
    waypoint.elevation = endpoint.elevation;
    waypoint
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(id: &str, lat: f64, lon: f64) -> StageEndpoint {
        StageEndpoint {
            id: id.into(),
            name: id.to_uppercase(),
            latitude: lat,
            longitude: lon,
            elevation: Some(2000.0),
        }
    }

    fn stage(day: u32, from: StageEndpoint, to: StageEndpoint) -> Stage {
        Stage {
            id: format!("{}-{}", from.id, to.id),
            day,
            from,
            to,
            distance_km: 5.0,
            elevation_gain_m: 0.0,
            estimated_time_hours: 1.25,
        }
    }

    fn sample_trip() -> Vec<Stage> {
        let a = endpoint("a", 46.0, 7.0);
        let b = endpoint("b", 46.1, 7.1);
        let c = endpoint("c", 46.2, 7.2);
        let d = endpoint("d", 46.3, 7.3);
        vec![
            stage(1, a, b.clone()),
            stage(1, b, c.clone()),
            stage(2, c, d),
        ]
    }

    #[test]
    fn one_track_per_day() {
        let gpx = trip_to_gpx(&sample_trip());
        let names: Vec<_> = gpx.tracks.iter().filter_map(|t| t.name.clone()).collect();
        assert_eq!(names, ["Day 1", "Day 2"]);
        assert_eq!(gpx.tracks[0].segments[0].points.len(), 3);
        assert_eq!(gpx.tracks[1].segments[0].points.len(), 2);
    }

    #[test]
    fn shared_endpoints_are_listed_once() {
        let gpx = trip_to_gpx(&sample_trip());
        let names: Vec<_> = gpx.waypoints.iter().filter_map(|w| w.name.clone()).collect();
        assert_eq!(names, ["A", "B", "C", "D"]);
        let first = gpx.waypoints[0].point();
        assert_eq!((first.x(), first.y()), (7.0, 46.0));
        assert_eq!(gpx.waypoints[0].elevation, Some(2000.0));
    }

    #[test]
    fn encoded_document_reads_back() {
        let encoded = encode_trip_as_gpx(&sample_trip()).unwrap();
        let bytes = BASE64.decode(encoded).unwrap();
        let parsed = gpx::read(bytes.as_slice()).unwrap();
        assert_eq!(parsed.waypoints.len(), 4);
        assert_eq!(parsed.tracks.len(), 2);
        assert_eq!(parsed.creator.as_deref(), Some(CREATOR));
    }

    #[test]
    fn empty_trip_is_valid_gpx() {
        let encoded = encode_trip_as_gpx(&[]).unwrap();
        let bytes = BASE64.decode(encoded).unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert!(xml.contains("<gpx"));
        assert!(!xml.contains("<trk>"));
    }
}
