use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance in kilometers
/// Prevents mixing up units with the meters reported by the routing service
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceKm(pub f64);

impl DistanceKm {
    /// Get the raw kilometers value
    pub fn as_km(self) -> f64 {
        self.0
    }

    /// Round half away from zero to the given number of decimals
    pub fn rounded(self, decimals: u32) -> Self {
        let multiplier = 10_f64.powi(decimals as i32);
        DistanceKm((self.0 * multiplier).round() / multiplier)
    }
}

impl fmt::Display for DistanceKm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}km", self.0)
    }
}

impl From<DistanceMeters> for DistanceKm {
    fn from(meters: DistanceMeters) -> Self {
        DistanceKm(meters.0 / 1000.0)
    }
}

/// Distance in meters, as reported by OSRM
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceMeters(pub f64);

impl DistanceMeters {
    /// Convert to kilometers
    pub fn to_km(self) -> DistanceKm {
        DistanceKm::from(self)
    }
}

impl fmt::Display for DistanceMeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}m", self.0)
    }
}
