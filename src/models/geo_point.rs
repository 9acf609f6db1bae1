use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 latitude/longitude pair in degrees.
///
/// Always latitude first. External services that speak `[lng, lat]` are
/// converted at the adapter boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(GeoPoint { lat, lng })
    }

    /// Build a point from a GeoJSON-ordered `[lng, lat]` pair.
    pub fn from_lng_lat(pair: [f64; 2]) -> Result<Self, String> {
        GeoPoint::new(pair[1], pair[0])
    }

    /// The point as a GeoJSON-ordered `[lng, lat]` pair.
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Great-circle distance in kilometers (Haversine)
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Planar offset from `other` in degrees, as used by the waypoint
    /// generator's equirectangular approximation.
    pub fn degree_offset_from(&self, other: &GeoPoint) -> f64 {
        (self.lat - other.lat).hypot(self.lng - other.lng)
    }
}

/// Fixed-precision rendering, used when no place name is available.
impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(48.8566, 2.3522).is_ok());
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 181.0).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_lng_lat_conversion_swaps_axes() {
        let point = GeoPoint::from_lng_lat([2.3522, 48.8566]).unwrap();
        assert_eq!(point.lat, 48.8566);
        assert_eq!(point.lng, 2.3522);
        assert_eq!(point.to_lng_lat(), [2.3522, 48.8566]);
    }

    #[test]
    fn test_distance_calculation() {
        let paris = GeoPoint::new(48.8566, 2.3522).unwrap();
        let london = GeoPoint::new(51.5074, -0.1278).unwrap();

        let distance = paris.distance_to(&london);
        // Paris to London is approximately 344 km
        assert!((distance - 344.0).abs() < 10.0);
    }

    #[test]
    fn test_degree_offset() {
        let a = GeoPoint::new(0.0, 0.0).unwrap();
        let b = GeoPoint::new(0.003, 0.004).unwrap();
        assert!((b.degree_offset_from(&a) - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_display_fixed_precision() {
        let point = GeoPoint::new(48.8566, 2.3522).unwrap();
        assert_eq!(point.to_string(), "48.85660, 2.35220");
    }
}
