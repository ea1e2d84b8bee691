//! Summaries of user-uploaded GPX tracks.

use std::io::Read;

use crate::geo::path_distance_km;
use crate::models::{Coordinate, GpxTrackSummary};

/// Upload limit for GPX documents.
pub const MAX_GPX_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum GpxImportError {
    #[error("invalid GPX document: {0}")]
    Parse(#[from] gpx::errors::GpxError),
    #[error("GPX document needs a track or route with at least two points")]
    NoTrack,
}

/// Reads a GPX document and summarizes its points.
///
/// Track points are used when present, otherwise route points; fewer than
/// two points is rejected. Elevation gain only counts climbs between
/// consecutive points that both carry an elevation.
pub fn summarize_gpx<R: Read>(reader: R) -> Result<GpxTrackSummary, GpxImportError> {
    let gpx = gpx::read(reader)?;

    let track_points: Vec<_> = gpx
        .tracks
        .iter()
        .flat_map(|track| &track.segments)
        .flat_map(|segment| &segment.points)
        .collect();
    let points = if track_points.is_empty() {
        gpx.routes.iter().flat_map(|route| &route.points).collect()
    } else {
        track_points
    };
    if points.len() < 2 {
        return Err(GpxImportError::NoTrack);
    }

    let name = gpx
        .tracks
        .iter()
        .find_map(|t| t.name.clone())
        .or_else(|| gpx.routes.iter().find_map(|r| r.name.clone()))
        .or_else(|| gpx.metadata.as_ref().and_then(|m| m.name.clone()));

    let coordinates: Vec<Coordinate> = points
        .iter()
        .map(|wp| {
            let point = wp.point();
            Coordinate::new(point.y(), point.x())
        })
        .collect();

    let elevation_gain_m = points
        .windows(2)
        .filter_map(|pair| match (pair[0].elevation, pair[1].elevation) {
            (Some(a), Some(b)) if b > a => Some(b - a),
            _ => None,
        })
        .sum();

    tracing::debug!("summarized GPX upload with {} points", coordinates.len());

    Ok(GpxTrackSummary {
        name,
        point_count: coordinates.len(),
        distance_km: path_distance_km(&coordinates),
        elevation_gain_m,
        coordinates,
    })
}
