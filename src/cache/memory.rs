use crate::cache::{CacheStats, GeocodeCache};
use crate::models::GeoPoint;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// In-memory cache backed by moka with TTL and bounded capacity.
/// All methods take `&self`; moka handles its own synchronization.
pub struct MemoryCacheService {
    points: Cache<String, GeoPoint>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCacheService {
    pub fn new(ttl_seconds: u64, max_capacity: u64) -> Self {
        let points = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        MemoryCacheService {
            points,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl GeocodeCache for MemoryCacheService {
    async fn get_cached_point(&self, key: &str) -> Option<GeoPoint> {
        match self.points.get(key).await {
            Some(point) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Memory cache hit for geocode: {}", key);
                Some(point)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Memory cache miss for geocode: {}", key);
                None
            }
        }
    }

    async fn cache_point(&self, key: &str, point: GeoPoint) {
        self.points.insert(key.to_string(), point).await;
        tracing::debug!("Memory cached geocode {}: {}", key, point);
    }

    async fn get_stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
            connected: true,
        }
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> GeoPoint {
        GeoPoint::new(48.8566, 2.3522).unwrap()
    }

    #[tokio::test]
    async fn cache_miss() {
        let cache = MemoryCacheService::new(3600, 100);
        assert!(cache.get_cached_point("nonexistent").await.is_none());
    }

    #[tokio::test]
    async fn roundtrip() {
        let cache = MemoryCacheService::new(3600, 100);
        cache.cache_point("key1", paris()).await;
        assert_eq!(cache.get_cached_point("key1").await, Some(paris()));
    }

    #[tokio::test]
    async fn stats_tracking() {
        let cache = MemoryCacheService::new(3600, 100);
        cache.cache_point("key1", paris()).await;

        // 1 miss
        cache.get_cached_point("missing").await;
        // 2 hits
        cache.get_cached_point("key1").await;
        cache.get_cached_point("key1").await;

        let stats = cache.get_stats().await;
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 66.666).abs() < 1.0);
    }

    #[tokio::test]
    async fn backend_name_is_memory() {
        let cache = MemoryCacheService::new(3600, 100);
        assert_eq!(cache.backend_name(), "memory");
        assert!(cache.health_check().await);
    }

    #[tokio::test]
    async fn ttl_expiry() {
        let cache = MemoryCacheService::new(1, 100); // 1 second TTL
        cache.cache_point("key1", paris()).await;

        assert!(cache.get_cached_point("key1").await.is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(cache.get_cached_point("key1").await.is_none());
    }
}
