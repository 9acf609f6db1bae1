use crate::constants::{DEFAULT_OSRM_BASE_URL, MAX_WAYPOINTS};
use crate::error::{AppError, Result};
use crate::models::{DistanceMeters, GeoPoint, RoutedPath, RoutingProfile, WaypointPolygon};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turns an ordered waypoint tour into a real walkable path.
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Route through the waypoints in order. `Ok(None)` when the service has
    /// no usable route for them.
    async fn route(&self, waypoints: &WaypointPolygon) -> Result<Option<RoutedPath>>;
}

#[derive(Clone)]
pub struct OsrmClient {
    client: Client,
    base_url: String,
    profile: RoutingProfile,
}

impl OsrmClient {
    pub fn new(profile: RoutingProfile) -> Self {
        OsrmClient {
            client: Client::new(),
            base_url: DEFAULT_OSRM_BASE_URL.to_string(),
            profile,
        }
    }

    pub fn with_config(
        base_url: String,
        profile: RoutingProfile,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(OsrmClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            profile,
        })
    }

    /// Get a route through the waypoints, in order.
    /// Returns `Ok(None)` if OSRM found no route.
    pub async fn get_route(&self, waypoints: &[GeoPoint]) -> Result<Option<RouteResponse>> {
        if waypoints.len() < 2 {
            return Err(AppError::InvalidRequest(
                "At least 2 waypoints required".to_string(),
            ));
        }

        if waypoints.len() > MAX_WAYPOINTS {
            return Err(AppError::InvalidRequest(format!(
                "Maximum {} waypoints allowed",
                MAX_WAYPOINTS
            )));
        }

        let url = format!(
            "{}/{}/{}",
            self.base_url,
            self.profile.osrm_profile(),
            coordinates_path(waypoints)
        );

        tracing::debug!(
            waypoints = waypoints.len(),
            profile = %self.profile.osrm_profile(),
            "OSRM request: {} waypoints, profile {}",
            waypoints.len(), self.profile.osrm_profile()
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("steps", "false"),
            ])
            .send()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Request failed: {}", e)))?;

        let status = response.status();
        // OSRM answers 400 with a JSON body for unroutable input
        if !status.is_success() && status.as_u16() != 400 {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                waypoints = waypoints.len(),
                "OSRM HTTP error {}: {}",
                status, error_text
            );
            return Err(AppError::RoutingApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: OsrmRouteApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Failed to parse response: {}", e)))?;

        if body.code != "Ok" {
            if is_no_route_code(&body.code) {
                tracing::warn!(
                    code = %body.code,
                    waypoints = waypoints.len(),
                    "OSRM found no route for {} waypoints: {}",
                    waypoints.len(),
                    body.message.as_deref().unwrap_or("")
                );
                return Ok(None);
            }
            return Err(AppError::RoutingApi(format!(
                "{}: {}",
                body.code,
                body.message.unwrap_or_default()
            )));
        }

        let Some(route) = body.routes.into_iter().next() else {
            tracing::warn!(
                waypoints = waypoints.len(),
                "OSRM returned 0 routes for {} waypoints",
                waypoints.len()
            );
            return Ok(None);
        };

        tracing::debug!(
            distance_km = %format!("{:.2}", route.distance / 1000.0),
            duration_min = %format!("{:.0}", route.duration / 60.0),
            path_points = route.geometry.coordinates.len(),
            "OSRM response: {:.2}km, {:.0}min, {} path points",
            route.distance / 1000.0, route.duration / 60.0, route.geometry.coordinates.len()
        );

        let response = RouteResponse {
            distance_meters: route.distance,
            duration_seconds: route.duration,
            geometry: route.geometry.coordinates,
        };

        // A path needs at least two valid positions to be drawn
        if response.to_points().len() < 2 {
            tracing::warn!(
                waypoints = waypoints.len(),
                positions = response.geometry.len(),
                "OSRM route has no usable geometry"
            );
            return Ok(None);
        }

        Ok(Some(response))
    }
}

#[async_trait]
impl RoutingService for OsrmClient {
    async fn route(&self, waypoints: &WaypointPolygon) -> Result<Option<RoutedPath>> {
        Ok(self
            .get_route(waypoints.points())
            .await?
            .map(|response| response.to_routed_path()))
    }
}

/// Format coordinates as "lng,lat;lng,lat;..."
fn coordinates_path(waypoints: &[GeoPoint]) -> String {
    waypoints
        .iter()
        .map(|p| format!("{},{}", p.lng, p.lat))
        .collect::<Vec<_>>()
        .join(";")
}

fn is_no_route_code(code: &str) -> bool {
    matches!(code, "NoRoute" | "NoSegment" | "NoMatch")
}

// OSRM API response types

#[derive(Debug, Deserialize)]
struct OsrmRouteApiResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64, // meters
    duration: f64, // seconds
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>, // [lng, lat] pairs
}

// Our simplified response type

#[derive(Debug, Clone, Serialize)]
pub struct RouteResponse {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// GeoJSON coordinates as [lng, lat] pairs
    pub geometry: Vec<[f64; 2]>,
}

impl RouteResponse {
    /// Realized length in km, rounded to 2 decimals
    pub fn distance_km(&self) -> f64 {
        DistanceMeters(self.distance_meters)
            .to_km()
            .rounded(2)
            .as_km()
    }

    pub fn duration_minutes(&self) -> u32 {
        (self.duration_seconds / 60.0).round() as u32
    }

    /// Swap each [lng, lat] pair into a latitude-first GeoPoint
    pub fn to_points(&self) -> Vec<GeoPoint> {
        self.geometry
            .iter()
            .filter_map(|pair| GeoPoint::from_lng_lat(*pair).ok())
            .collect()
    }

    pub fn to_routed_path(&self) -> RoutedPath {
        RoutedPath {
            points: self.to_points(),
            distance_km: self.distance_km(),
            duration_minutes: self.duration_minutes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_to_public_server() {
        let client = OsrmClient::new(RoutingProfile::Pedestrian);
        assert_eq!(client.base_url, DEFAULT_OSRM_BASE_URL);
        assert_eq!(client.profile, RoutingProfile::Pedestrian);
    }

    #[test]
    fn test_with_config_trims_base_url() {
        let client = OsrmClient::with_config(
            "http://localhost:5000/route/v1/".to_string(),
            RoutingProfile::Cycling,
            Some(Duration::from_secs(10)),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:5000/route/v1");
        assert_eq!(client.profile, RoutingProfile::Cycling);
    }

    #[test]
    fn test_coordinates_path_is_lng_first() {
        let waypoints = vec![
            GeoPoint::new(48.8566, 2.3522).unwrap(),
            GeoPoint::new(48.8584, 2.2945).unwrap(),
        ];
        assert_eq!(
            coordinates_path(&waypoints),
            "2.3522,48.8566;2.2945,48.8584"
        );
    }

    #[test]
    fn test_route_response_conversions() {
        let response = RouteResponse {
            distance_meters: 5237.6,
            duration_seconds: 3720.0,
            geometry: vec![[2.3522, 48.8566], [2.2945, 48.8584]],
        };

        assert_eq!(response.distance_km(), 5.24);
        assert_eq!(response.duration_minutes(), 62);

        let path = response.to_routed_path();
        assert_eq!(path.points.len(), 2);
        assert_eq!(path.points[0].lat, 48.8566);
        assert_eq!(path.points[0].lng, 2.3522);
        assert_eq!(path.points[1].lat, 48.8584);
        assert_eq!(path.distance_km, 5.24);
    }

    #[test]
    fn test_parse_no_route_body() {
        let body: OsrmRouteApiResponse = serde_json::from_str(
            r#"{"code": "NoRoute", "message": "Impossible route between points"}"#,
        )
        .unwrap();
        assert!(body.routes.is_empty());
        assert!(is_no_route_code(&body.code));
        assert!(!is_no_route_code("InvalidQuery"));
    }

    #[tokio::test]
    async fn test_rejects_too_few_waypoints() {
        let client = OsrmClient::new(RoutingProfile::Pedestrian);
        let result = client
            .get_route(&[GeoPoint::new(48.8566, 2.3522).unwrap()])
            .await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_rejects_too_many_waypoints() {
        let client = OsrmClient::new(RoutingProfile::Pedestrian);
        let waypoints = vec![GeoPoint::new(48.8566, 2.3522).unwrap(); MAX_WAYPOINTS + 1];
        let result = client.get_route(&waypoints).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }
}
