//! Hiking-time heuristics and the display helpers built on them.

/// Planning pace used by the trip builder.
pub const TRIP_SPEED_KMH: f64 = 4.0;
/// Slower pace assumed when walking to a shelter in an emergency.
pub const EMERGENCY_SPEED_KMH: f64 = 3.0;

/// Every 300 m of ascent adds half an hour.
const ELEVATION_PENALTY_STEP_M: f64 = 300.0;
const ELEVATION_PENALTY_HOURS: f64 = 0.5;

/// Estimated walking hours: `distance / speed + max(0, gain) / 300 * 0.5`.
pub fn estimate_hiking_time(distance_km: f64, elevation_gain_m: f64, speed_kmh: f64) -> f64 {
    let base_hours = distance_km / speed_kmh;
    let penalty_hours =
        elevation_gain_m.max(0.0) / ELEVATION_PENALTY_STEP_M * ELEVATION_PENALTY_HOURS;
    base_hours + penalty_hours
}

/// Positive height difference from `from_m` up to `to_m`; descents count as zero.
pub fn elevation_gain(from_m: f64, to_m: f64) -> f64 {
    (to_m - from_m).max(0.0)
}

/// `"45min"`, `"2h"` or `"2h 30min"`.
pub fn format_duration(hours: f64) -> String {
    let (h, m) = split_hours(hours);
    match (h, m) {
        (0, m) => format!("{m}min"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}min"),
    }
}

/// Meters under 1 km, one decimal under 10 km, whole kilometers beyond.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m", (km * 1000.0).round())
    } else if km < 10.0 {
        format!("{km:.1}km")
    } else {
        format!("{}km", km.round())
    }
}

/// Walking time label at the emergency pace.
pub fn walking_time_label(distance_km: f64) -> String {
    let hours = distance_km / EMERGENCY_SPEED_KMH;
    if hours < 1.0 {
        format!("{} min", (hours * 60.0).round())
    } else {
        format_duration(hours)
    }
}

fn split_hours(hours: f64) -> (u64, u64) {
    let whole = hours.floor();
    let minutes = ((hours - whole) * 60.0).round();
    let (whole, minutes) = if minutes >= 60.0 {
        (whole + 1.0, 0.0)
    } else {
        (whole, minutes)
    };
    (whole.max(0.0) as u64, minutes.max(0.0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_walk_at_planning_speed() {
        assert_eq!(estimate_hiking_time(4.0, 0.0, TRIP_SPEED_KMH), 1.0);
    }

    #[test]
    fn pure_ascent_costs_half_hour_per_300m() {
        assert_eq!(estimate_hiking_time(0.0, 300.0, TRIP_SPEED_KMH), 0.5);
        assert_eq!(estimate_hiking_time(0.0, 900.0, TRIP_SPEED_KMH), 1.5);
    }

    #[test]
    fn negative_gain_is_clamped() {
        assert_eq!(estimate_hiking_time(6.0, -500.0, EMERGENCY_SPEED_KMH), 2.0);
    }

    #[test]
    fn elevation_gain_ignores_descent() {
        assert_eq!(elevation_gain(2000.0, 2450.0), 450.0);
        assert_eq!(elevation_gain(2450.0, 2000.0), 0.0);
    }

    #[test]
    fn duration_labels() {
        assert_eq!(format_duration(0.75), "45min");
        assert_eq!(format_duration(2.0), "2h");
        assert_eq!(format_duration(2.5), "2h 30min");
        assert_eq!(format_duration(1.999), "2h");
    }

    #[test]
    fn distance_labels() {
        assert_eq!(format_distance(0.85), "850m");
        assert_eq!(format_distance(3.44), "3.4km");
        assert_eq!(format_distance(12.4), "12km");
    }

    #[test]
    fn walking_labels() {
        assert_eq!(walking_time_label(2.0), "40 min");
        assert_eq!(walking_time_label(4.5), "1h 30min");
        assert_eq!(walking_time_label(6.0), "2h");
    }
}
