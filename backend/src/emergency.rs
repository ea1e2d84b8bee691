use crate::{
    geo::{Compass, bearing_degrees, haversine_km},
    hiking::{EMERGENCY_SPEED_KMH, estimate_hiking_time, format_distance, walking_time_label},
    models::{Coordinate, NearestShelterResponse, Shelter},
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmergencyError {
    #[error("no shelters with coordinates are available")]
    NoSheltersAvailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearestShelter {
    pub shelter: Shelter,
    pub distance_km: f64,
}

/// Linear scan for the closest shelter. Shelters without coordinates are
/// ignored; on equal distances the earlier shelter wins.
pub fn nearest_shelter(
    user: Coordinate,
    shelters: &[Shelter],
) -> Result<NearestShelter, EmergencyError> {
    let mut best: Option<(&Shelter, f64)> = None;

    for shelter in shelters {
        let Some(position) = shelter.coordinate() else {
            continue;
        };
        let distance = haversine_km(user, position);
        match best {
            Some((_, min)) if distance >= min => {}
            _ => best = Some((shelter, distance)),
        }
    }

    best.map(|(shelter, distance_km)| NearestShelter {
        shelter: shelter.clone(),
        distance_km,
    })
    .ok_or(EmergencyError::NoSheltersAvailable)
}

/// Directions to the nearest shelter as shown to someone in trouble.
#[derive(Debug, Clone, PartialEq)]
pub struct EmergencyGuidance {
    pub user: Coordinate,
    pub nearest: NearestShelter,
    pub bearing_degrees: f64,
    pub compass: Compass,
    pub walking_time_hours: f64,
}

impl EmergencyGuidance {
    pub fn new(user: Coordinate, nearest: NearestShelter) -> Self {
        let target = nearest.shelter.coordinate().unwrap_or(user);
        let bearing = bearing_degrees(user, target);
        Self {
            user,
            bearing_degrees: bearing,
            compass: Compass::from_bearing(bearing),
            walking_time_hours: estimate_hiking_time(nearest.distance_km, 0.0, EMERGENCY_SPEED_KMH),
            nearest,
        }
    }

    pub fn into_response(self) -> NearestShelterResponse {
        NearestShelterResponse {
            user_location: self.user,
            distance_km: self.nearest.distance_km,
            bearing_degrees: self.bearing_degrees,
            compass: self.compass.label().to_string(),
            walking_time_hours: self.walking_time_hours,
            walking_time: walking_time_label(self.nearest.distance_km),
            distance_label: format_distance(self.nearest.distance_km),
            nearest_shelter: self.nearest.shelter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShelterKind;

    const KM_PER_DEGREE: f64 = 111.194_926_644_558_73;

    fn shelter(id: &str, coord: Option<(f64, f64)>) -> Shelter {
        Shelter {
            id: id.into(),
            name: id.into(),
            description: None,
            kind: ShelterKind::Shelter,
            is_free: true,
            capacity: Some(8),
            is_serviced: false,
            accessibility: vec!["foot".into()],
            amenities: vec![],
            latitude: coord.map(|c| c.0),
            longitude: coord.map(|c| c.1),
            elevation: None,
        }
    }

    fn north_km(id: &str, km: f64) -> Shelter {
        shelter(id, Some((km / KM_PER_DEGREE, 0.0)))
    }

    #[test]
    fn picks_closest_shelter() {
        let user = Coordinate::new(0.0, 0.0);
        let shelters = [north_km("s1", 10.0), north_km("s2", 3.0), north_km("s3", 5.0)];
        let nearest = nearest_shelter(user, &shelters).unwrap();
        assert_eq!(nearest.shelter.id, "s2");
        assert!((nearest.distance_km - 3.0).abs() < 1e-6);
    }

    #[test]
    fn ties_go_to_first_in_list() {
        let user = Coordinate::new(0.0, 0.0);
        let shelters = [north_km("s1", 10.0), north_km("s2", 3.0), north_km("s3", 3.0)];
        let nearest = nearest_shelter(user, &shelters).unwrap();
        assert_eq!(nearest.shelter.id, "s2");
        assert!((nearest.distance_km - 3.0).abs() < 1e-6);
    }

    #[test]
    fn shelters_without_coordinates_are_ignored() {
        let user = Coordinate::new(0.0, 0.0);
        let shelters = [shelter("ghost", None), north_km("real", 8.0)];
        assert_eq!(nearest_shelter(user, &shelters).unwrap().shelter.id, "real");
    }

    #[test]
    fn empty_candidates_report_no_shelters() {
        let user = Coordinate::new(46.0, 7.0);
        assert_eq!(
            nearest_shelter(user, &[]),
            Err(EmergencyError::NoSheltersAvailable)
        );
        assert_eq!(
            nearest_shelter(user, &[shelter("ghost", None)]),
            Err(EmergencyError::NoSheltersAvailable)
        );
    }

    #[test]
    fn guidance_points_toward_shelter() {
        let user = Coordinate::new(0.0, 0.0);
        let nearest = nearest_shelter(user, &[north_km("s", 6.0)]).unwrap();
        let guidance = EmergencyGuidance::new(user, nearest);

        assert_eq!(guidance.compass, Compass::N);
        assert!((guidance.walking_time_hours - 2.0).abs() < 1e-6);

        let response = guidance.into_response();
        assert_eq!(response.compass, "N");
        assert_eq!(response.walking_time, "2h");
        assert_eq!(response.distance_label, "6.0km");
        assert_eq!(response.nearest_shelter.id, "s");
    }
}
