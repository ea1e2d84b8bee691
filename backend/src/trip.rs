//! Multi-day trip staging.
//!
//! Consecutive shelters become stages; stages are bucketed into days so that
//! no day (except one made of a single oversized stage) exceeds the daily
//! walking budget.

use crate::{
    geo::haversine_km,
    hiking::{TRIP_SPEED_KMH, elevation_gain, estimate_hiking_time},
    models::{DayPlan, Shelter, Stage, StageEndpoint, TripSummary},
};

pub const DEFAULT_MAX_DAILY_HOURS: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TripError {
    #[error("maximum daily hours must be a positive number, got {0}")]
    InvalidDailyLimit(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripPlan {
    pub stages: Vec<Stage>,
    pub days: Vec<DayPlan>,
    pub summary: TripSummary,
}

pub fn plan_trip(shelters: &[Shelter], max_daily_hours: f64) -> Result<TripPlan, TripError> {
    if !max_daily_hours.is_finite() || max_daily_hours <= 0.0 {
        return Err(TripError::InvalidDailyLimit(max_daily_hours));
    }

    let stages = plan_stages(shelters, max_daily_hours);
    let days = group_by_day(&stages);
    let summary = summarize(&stages);

    tracing::debug!(
        "planned {} stages over {} days ({:.1} km)",
        summary.stage_count,
        summary.total_days,
        summary.total_distance_km
    );

    Ok(TripPlan {
        stages,
        days,
        summary,
    })
}

/// Splits an ordered shelter list into day-numbered stages.
///
/// A pair where either shelter lacks coordinates produces no stage and does
/// not touch the day counter or the daily budget.
pub fn plan_stages(shelters: &[Shelter], max_daily_hours: f64) -> Vec<Stage> {
    let mut stages: Vec<Stage> = Vec::with_capacity(shelters.len().saturating_sub(1));
    let mut day = 1;
    let mut daily_hours = 0.0;

    for pair in shelters.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let (Some(from_coord), Some(to_coord)) = (from.coordinate(), to.coordinate()) else {
            tracing::debug!("skipping leg {} -> {}: missing coordinates", from.id, to.id);
            continue;
        };

        let distance_km = haversine_km(from_coord, to_coord);
        let elevation_gain_m =
            elevation_gain(from.elevation.unwrap_or(0.0), to.elevation.unwrap_or(0.0));
        let estimated_time_hours =
            estimate_hiking_time(distance_km, elevation_gain_m, TRIP_SPEED_KMH);

        if daily_hours + estimated_time_hours > max_daily_hours && !stages.is_empty() {
            day += 1;
            daily_hours = 0.0;
        }

        stages.push(Stage {
            id: format!("{}-{}", from.id, to.id),
            day,
            from: endpoint(from, from_coord.latitude, from_coord.longitude),
            to: endpoint(to, to_coord.latitude, to_coord.longitude),
            distance_km,
            elevation_gain_m,
            estimated_time_hours,
        });
        daily_hours += estimated_time_hours;
    }

    stages
}

pub fn summarize(stages: &[Stage]) -> TripSummary {
    TripSummary {
        total_distance_km: stages.iter().map(|s| s.distance_km).sum(),
        total_elevation_gain_m: stages.iter().map(|s| s.elevation_gain_m).sum(),
        total_time_hours: stages.iter().map(|s| s.estimated_time_hours).sum(),
        total_days: stages.iter().map(|s| s.day).max().unwrap_or(0),
        stage_count: stages.len(),
    }
}

/// Per-day totals, in day order. Relies on stage days being non-decreasing.
pub fn group_by_day(stages: &[Stage]) -> Vec<DayPlan> {
    let mut days: Vec<DayPlan> = Vec::new();
    for stage in stages {
        match days.last_mut() {
            Some(current) if current.day == stage.day => {
                current.stage_count += 1;
                current.distance_km += stage.distance_km;
                current.elevation_gain_m += stage.elevation_gain_m;
                current.time_hours += stage.estimated_time_hours;
            }
            _ => days.push(DayPlan {
                day: stage.day,
                stage_count: 1,
                distance_km: stage.distance_km,
                elevation_gain_m: stage.elevation_gain_m,
                time_hours: stage.estimated_time_hours,
            }),
        }
    }
    days
}

fn endpoint(shelter: &Shelter, latitude: f64, longitude: f64) -> StageEndpoint {
    StageEndpoint {
        id: shelter.id.clone(),
        name: shelter.name.clone(),
        latitude,
        longitude,
        elevation: shelter.elevation,
    }
}
