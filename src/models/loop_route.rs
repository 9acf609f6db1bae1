use crate::constants::{
    MAX_BATCH_SIZE, MAX_TARGET_DISTANCE_KM, MIN_POINT_COUNT, MIN_TARGET_DISTANCE_KM,
};
use crate::models::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutingProfile {
    #[default]
    Pedestrian,
    Cycling,
}

impl RoutingProfile {
    /// Returns the OSRM profile name for this routing profile
    pub fn osrm_profile(&self) -> &'static str {
        match self {
            RoutingProfile::Pedestrian => "foot",
            RoutingProfile::Cycling => "bike",
        }
    }
}

impl fmt::Display for RoutingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingProfile::Pedestrian => write!(f, "pedestrian"),
            RoutingProfile::Cycling => write!(f, "cycling"),
        }
    }
}

impl FromStr for RoutingProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pedestrian" | "foot" | "walk" | "walking" => Ok(RoutingProfile::Pedestrian),
            "cycling" | "bike" | "bicycle" => Ok(RoutingProfile::Cycling),
            _ => Err(format!("Invalid routing profile: '{}'", s)),
        }
    }
}

/// What the user submitted: where to start and how far to go.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoopRequest {
    pub origin_address: String,
    pub target_distance_km: f64,
}

impl LoopRequest {
    pub fn new(origin_address: impl Into<String>, target_distance_km: f64) -> Self {
        LoopRequest {
            origin_address: origin_address.into(),
            target_distance_km,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.origin_address.trim().is_empty() {
            return Err("address must not be empty".to_string());
        }
        if !self.target_distance_km.is_finite()
            || !(MIN_TARGET_DISTANCE_KM..=MAX_TARGET_DISTANCE_KM)
                .contains(&self.target_distance_km)
        {
            return Err(format!(
                "distance_km must be between {} and {}",
                MIN_TARGET_DISTANCE_KM, MAX_TARGET_DISTANCE_KM
            ));
        }
        Ok(())
    }
}

/// Closed sequence of waypoints: `[center, p1, .., pn, center]`.
///
/// Constructed only through [`WaypointPolygon::close`], which guarantees the
/// closing point and the minimum interior size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaypointPolygon {
    points: Vec<GeoPoint>,
}

impl WaypointPolygon {
    /// Close `interior` around `center`. Needs at least 3 interior points.
    pub fn close(center: GeoPoint, interior: Vec<GeoPoint>) -> Result<Self, String> {
        if interior.len() < MIN_POINT_COUNT {
            return Err(format!(
                "A loop polygon needs at least {} interior points, got {}",
                MIN_POINT_COUNT,
                interior.len()
            ));
        }

        let mut points = Vec::with_capacity(interior.len() + 2);
        points.push(center);
        points.extend(interior);
        points.push(center);

        Ok(WaypointPolygon { points })
    }

    pub fn center(&self) -> GeoPoint {
        self.points[0]
    }

    /// Every waypoint in submission order, closing point included.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// The generated points, without the leading and closing center.
    pub fn interior(&self) -> &[GeoPoint] {
        &self.points[1..self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A street-following path returned by the routing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedPath {
    /// Ordered points, latitude first
    pub points: Vec<GeoPoint>,
    /// Realized length, rounded to 2 decimals
    pub distance_km: f64,
    pub duration_minutes: u32,
}

/// Everything a new loop needs except what the registry assigns.
#[derive(Debug, Clone)]
pub struct LoopDraft {
    pub origin_address: String,
    pub origin: GeoPoint,
    pub requested_distance_km: f64,
    pub path: RoutedPath,
}

/// An accepted loop. Never mutated after the registry creates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loop {
    /// Creation index, 0-based
    pub id: u64,
    pub origin_address: String,
    pub origin: GeoPoint,
    pub requested_distance_km: f64,
    pub actual_distance_km: f64,
    pub color: String,
    pub path: RoutedPath,
}

/// Result of one generation attempt inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Added { loop_id: u64 },
    NoRoute,
    SurfaceUnavailable,
    RoutingFailed { reason: String },
    /// Never ran because an earlier attempt failed.
    Skipped,
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Added { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            AttemptOutcome::NoRoute
                | AttemptOutcome::SurfaceUnavailable
                | AttemptOutcome::RoutingFailed { .. }
        )
    }
}

/// What happened to a batch: per-attempt outcomes and the loops it added.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub origin: GeoPoint,
    pub attempts: Vec<AttemptOutcome>,
    pub loops: Vec<Loop>,
    /// Loops in the registry after this batch
    pub total_loops: usize,
    pub message: String,
}

impl BatchReport {
    pub fn status_message(added: usize) -> String {
        match added {
            0 => "No route found".to_string(),
            1 => "1 loop added".to_string(),
            n => format!("{} loops added", n),
        }
    }
}

// Request/Response types for API endpoints

#[derive(Debug, Deserialize)]
pub struct GenerateLoopsRequest {
    pub address: String,
    pub distance_km: f64,
    #[serde(default)]
    pub count: Option<usize>,
    /// Fixed seed for reproducible polygons
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GenerateLoopsRequest {
    pub fn loop_request(&self) -> LoopRequest {
        LoopRequest::new(self.address.clone(), self.distance_km)
    }

    /// Requested loop count, falling back to the configured batch size
    pub fn batch_size(&self, default: usize) -> usize {
        self.count.unwrap_or(default)
    }
}

pub fn validate_batch_size(count: usize) -> Result<(), String> {
    if !(1..=MAX_BATCH_SIZE).contains(&count) {
        return Err(format!("count must be between 1 and {}", MAX_BATCH_SIZE));
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoopListResponse {
    pub total: usize,
    pub loops: Vec<Loop>,
}

#[derive(Debug, Deserialize)]
pub struct LoopListQuery {
    pub recent: Option<usize>,
}
