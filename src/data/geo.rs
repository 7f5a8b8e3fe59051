/// Mean Earth radius in miles (spherical approximation).
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A point on the sphere, both coordinates in **radians**.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    /// Convert a decimal-degree coordinate pair.
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        GeoPoint {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }

    /// Great-circle distance to `other`, in miles.
    pub fn distance_miles(&self, other: &GeoPoint) -> f64 {
        great_circle_distance_miles(self.lon, self.lat, other.lon, other.lat)
    }
}

/// Haversine distance in miles. All inputs must already be in radians;
/// no unit conversion happens here.
pub fn great_circle_distance_miles(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let a = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    #[test]
    fn test_identical_points_are_zero() {
        let p = GeoPoint::from_degrees(-122.4, 37.77);
        assert!(p.distance_miles(&p) < 1e-6);
    }

    #[test]
    fn test_symmetric() {
        let sf = GeoPoint::from_degrees(-122.4194, 37.7749);
        let la = GeoPoint::from_degrees(-118.2437, 34.0522);
        assert_eq!(sf.distance_miles(&la), la.distance_miles(&sf));
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = great_circle_distance_miles(0.0, 0.0, PI, 0.0);
        assert!((d - PI * EARTH_RADIUS_MILES).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn test_hundredth_degree_of_latitude() {
        let a = GeoPoint::from_degrees(-122.0, 37.0);
        let b = GeoPoint::from_degrees(-122.0, 37.01);
        let d = a.distance_miles(&b);
        assert!((d - 0.691).abs() < 0.005, "Expected ~0.69 miles, got {d}");
    }

    #[test]
    fn test_sf_to_la() {
        let sf = GeoPoint::from_degrees(-122.4194, 37.7749);
        let la = GeoPoint::from_degrees(-118.2437, 34.0522);
        let d = sf.distance_miles(&la);
        // Roughly 347 miles as the crow flies
        assert!((d - 347.0).abs() < 5.0, "Expected ~347 miles, got {d}");
    }
}
