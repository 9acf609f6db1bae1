use crate::cache::{geocode_cache_key, GeocodeCache};
use crate::error::{AppError, Result};
use crate::models::GeoPoint;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Address lookup in both directions.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// First candidate for `address`, or `None` when nothing matches.
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>>;

    /// Human-readable place for `point`. Falls back to the numeric rendering
    /// of the point when the service has no name for it.
    async fn reverse_geocode(&self, point: GeoPoint) -> Result<String>;
}

/// Nominatim (OpenStreetMap) geocoding client.
#[derive(Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(base_url: String, user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(NominatimClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::GeocodingApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, "Nominatim HTTP error {}: {}", status, error_text);
            return Err(AppError::GeocodingApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GeocodingApi(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>> {
        tracing::debug!(address, "Nominatim search request");

        // A failed lookup is reported the same way as an unknown address
        let candidates: Vec<NominatimPlace> = match self
            .get_json(
                "search",
                &[
                    ("q", address.to_string()),
                    ("format", "json".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(address, error = %e, "Nominatim search failed");
                return Ok(None);
            }
        };

        let Some(first) = candidates.first() else {
            tracing::info!(address, "Nominatim returned no candidates");
            return Ok(None);
        };

        match first.to_point() {
            Ok(point) => Ok(Some(point)),
            Err(e) => {
                tracing::warn!(address, error = %e, "Nominatim returned an unusable candidate");
                Ok(None)
            }
        }
    }

    async fn reverse_geocode(&self, point: GeoPoint) -> Result<String> {
        tracing::debug!(lat = point.lat, lng = point.lng, "Nominatim reverse request");

        let place: NominatimReverse = self
            .get_json(
                "reverse",
                &[
                    ("lat", point.lat.to_string()),
                    ("lon", point.lng.to_string()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        Ok(place
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| point.to_string()))
    }
}

// Nominatim API response types

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    /// Decimal degrees, as a string
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn to_point(&self) -> Result<GeoPoint> {
        let lat: f64 = self
            .lat
            .parse()
            .map_err(|_| AppError::GeocodingApi(format!("Invalid latitude '{}'", self.lat)))?;
        let lng: f64 = self
            .lon
            .parse()
            .map_err(|_| AppError::GeocodingApi(format!("Invalid longitude '{}'", self.lon)))?;
        GeoPoint::new(lat, lng).map_err(AppError::GeocodingApi)
    }
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    // Absent when Nominatim answers with {"error": "Unable to geocode"}
    #[serde(default)]
    display_name: Option<String>,
}

/// Fronts another geocoder with a [`GeocodeCache`] for forward lookups.
pub struct CachingGeocoder {
    inner: Arc<dyn Geocoder>,
    cache: Arc<dyn GeocodeCache>,
}

impl CachingGeocoder {
    pub fn new(inner: Arc<dyn Geocoder>, cache: Arc<dyn GeocodeCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl Geocoder for CachingGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>> {
        let key = geocode_cache_key(address);
        if let Some(point) = self.cache.get_cached_point(&key).await {
            return Ok(Some(point));
        }

        let resolved = self.inner.geocode(address).await?;
        if let Some(point) = resolved {
            self.cache.cache_point(&key, point).await;
        }
        Ok(resolved)
    }

    async fn reverse_geocode(&self, point: GeoPoint) -> Result<String> {
        self.inner.reverse_geocode(point).await
    }
}
