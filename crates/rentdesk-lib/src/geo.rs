//! Great-circle distance on a spherical Earth.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for all distance calculations, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Haversine distance to another point in kilometres.
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Haversine great-circle distance between two points, in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn distance_to_self_is_zero() {
        for (lat, lon) in [(0.0, 0.0), (39.946613, 116.370503), (-33.9, 151.2), (90.0, 0.0)] {
            assert_eq!(haversine_km(lat, lon, lat, lon), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            ((39.946613, 116.370503), (31.2304, 121.4737)),
            ((-33.8688, 151.2093), (51.5074, -0.1278)),
            ((0.0, 179.9), (0.0, -179.9)),
        ];
        for ((lat1, lon1), (lat2, lon2)) in pairs {
            let ab = haversine_km(lat1, lon1, lat2, lon2);
            let ba = haversine_km(lat2, lon2, lat1, lon1);
            assert!((ab - ba).abs() < EPSILON, "{ab} != {ba}");
        }
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antimeridian_crossing_takes_the_short_way() {
        let d = haversine_km(0.0, 179.5, 0.0, -179.5);
        assert!(d < 112.0, "got {d}");
    }

    #[test]
    fn antipodal_points_are_half_the_circumference_apart() {
        let d = haversine_km(0.0, 0.0, 0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half).abs() < 1e-6);
    }

    #[test]
    fn beijing_to_shanghai() {
        let beijing = GeoPoint::new(39.9042, 116.4074);
        let shanghai = GeoPoint::new(31.2304, 121.4737);
        let d = beijing.distance_to(&shanghai);
        assert!((1060.0..1075.0).contains(&d), "got {d}");
    }
}
