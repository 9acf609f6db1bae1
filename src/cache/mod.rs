mod memory;

pub use memory::MemoryCacheService;

use crate::models::GeoPoint;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Cache of resolved addresses. Only successful lookups are stored.
#[async_trait]
pub trait GeocodeCache: Send + Sync {
    async fn get_cached_point(&self, key: &str) -> Option<GeoPoint>;
    async fn cache_point(&self, key: &str, point: GeoPoint);
    async fn get_stats(&self) -> CacheStats;
    async fn health_check(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

/// Generate a cache key for an address lookup.
/// Case and surrounding/repeated whitespace do not change the key.
pub fn geocode_cache_key(address: &str) -> String {
    let normalized = address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut hasher = DefaultHasher::new();
    normalized.hash(&mut hasher);

    format!("geocode:{:x}", hasher.finish())
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub connected: bool,
}
