use crate::models::Coordinate;

pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Width of one compass sector in degrees.
const SECTOR_DEGREES: f64 = 22.5;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("latitude and longitude must be finite numbers")]
    NotANumber,
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Great-circle distance in kilometers (Haversine).
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

pub fn path_distance_km(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}

/// Initial bearing from `from` to `to`, in degrees within [0, 360).
///
/// Identical points yield 0.
pub fn bearing_degrees(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    let bearing = (y.atan2(x).to_degrees() + 360.0) % 360.0;
    // -0.0 and float residue just below 360 both belong to north
    if bearing >= 360.0 || bearing == 0.0 {
        0.0
    } else {
        bearing
    }
}

/// The 16 points of the compass rose, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
}

impl Compass {
    const ALL: [Compass; 16] = [
        Compass::N,
        Compass::Nne,
        Compass::Ne,
        Compass::Ene,
        Compass::E,
        Compass::Ese,
        Compass::Se,
        Compass::Sse,
        Compass::S,
        Compass::Ssw,
        Compass::Sw,
        Compass::Wsw,
        Compass::W,
        Compass::Wnw,
        Compass::Nw,
        Compass::Nnw,
    ];

    /// Nearest compass point: `round(bearing / 22.5) mod 16`.
    pub fn from_bearing(bearing: f64) -> Self {
        let sector = (bearing / SECTOR_DEGREES).round().rem_euclid(16.0) as usize;
        Self::ALL[sector % 16]
    }

    pub fn label(self) -> &'static str {
        match self {
            Compass::N => "N",
            Compass::Nne => "NNE",
            Compass::Ne => "NE",
            Compass::Ene => "ENE",
            Compass::E => "E",
            Compass::Ese => "ESE",
            Compass::Se => "SE",
            Compass::Sse => "SSE",
            Compass::S => "S",
            Compass::Ssw => "SSW",
            Compass::Sw => "SW",
            Compass::Wsw => "WSW",
            Compass::W => "W",
            Compass::Wnw => "WNW",
            Compass::Nw => "NW",
            Compass::Nnw => "NNW",
        }
    }
}

pub fn bearing_to_compass(bearing: f64) -> &'static str {
    Compass::from_bearing(bearing).label()
}

/// Checks WGS84 bounds before any computation.
pub fn validate_coordinate(latitude: f64, longitude: f64) -> Result<Coordinate, GeoError> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(GeoError::NotANumber);
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(GeoError::LatitudeOutOfRange(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(GeoError::LongitudeOutOfRange(longitude));
    }
    Ok(Coordinate::new(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERMATT: Coordinate = Coordinate {
        latitude: 45.9763,
        longitude: 7.6581,
    };

    #[test]
    fn test_haversine_same_point() {
        assert_eq!(haversine_km(ZERMATT, ZERMATT), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_at_equator() {
        let dist = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!((dist - 111.19).abs() < 0.5, "got {dist}");
    }

    #[test]
    fn test_haversine_symmetry() {
        let a = Coordinate::new(45.0, 5.0);
        let b = Coordinate::new(46.0, 6.0);
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn test_haversine_propagates_nan() {
        let a = Coordinate::new(f64::NAN, 5.0);
        assert!(haversine_km(a, ZERMATT).is_nan());
    }

    #[test]
    fn test_path_distance_short_paths() {
        assert_eq!(path_distance_km(&[]), 0.0);
        assert_eq!(path_distance_km(&[ZERMATT]), 0.0);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!((bearing_degrees(origin, Coordinate::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing_degrees(origin, Coordinate::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing_degrees(origin, Coordinate::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing_degrees(origin, Coordinate::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_identical_points_is_zero() {
        assert_eq!(bearing_degrees(ZERMATT, ZERMATT), 0.0);
    }

    #[test]
    fn test_compass_labels() {
        assert_eq!(bearing_to_compass(0.0), "N");
        assert_eq!(bearing_to_compass(90.0), "E");
        assert_eq!(bearing_to_compass(359.0), "N");
        assert_eq!(bearing_to_compass(22.5), "NNE");
        assert_eq!(bearing_to_compass(180.0), "S");
        assert_eq!(bearing_to_compass(337.5), "NNW");
        assert_eq!(bearing_to_compass(11.24), "N");
    }

    #[test]
    fn test_validate_coordinate_bounds() {
        assert!(validate_coordinate(90.0, 180.0).is_ok());
        assert!(validate_coordinate(-90.0, -180.0).is_ok());
        assert_eq!(
            validate_coordinate(90.5, 0.0),
            Err(GeoError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            validate_coordinate(0.0, -181.0),
            Err(GeoError::LongitudeOutOfRange(-181.0))
        );
        assert_eq!(validate_coordinate(f64::NAN, 0.0), Err(GeoError::NotANumber));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn valid_coord() -> impl Strategy<Value = Coordinate> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
        }

        proptest! {
            #[test]
            fn prop_haversine_non_negative(a in valid_coord(), b in valid_coord()) {
                prop_assert!(haversine_km(a, b) >= 0.0);
            }

            #[test]
            fn prop_haversine_symmetric(a in valid_coord(), b in valid_coord()) {
                prop_assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
            }

            #[test]
            fn prop_haversine_same_point_is_zero(coord in valid_coord()) {
                prop_assert_eq!(haversine_km(coord, coord), 0.0);
            }

            #[test]
            fn prop_haversine_bounded_by_half_circumference(a in valid_coord(), b in valid_coord()) {
                let max_distance = std::f64::consts::PI * EARTH_RADIUS_KM;
                prop_assert!(haversine_km(a, b) <= max_distance + 0.1);
            }

            #[test]
            fn prop_bearing_in_range(a in valid_coord(), b in valid_coord()) {
                let bearing = bearing_degrees(a, b);
                prop_assert!((0.0..360.0).contains(&bearing));
            }

            #[test]
            fn prop_compass_label_is_nearest_sector(bearing in 0.0f64..360.0) {
                let label = bearing_to_compass(bearing);
                let index = Compass::ALL.iter().position(|c| c.label() == label).unwrap();
                let center = index as f64 * 22.5;
                let diff = (bearing - center).rem_euclid(360.0);
                let diff = diff.min(360.0 - diff);
                prop_assert!(diff <= 11.25 + 1e-9);
            }
        }
    }
}
