// src/services/cache.rs
// DOCUMENTATION: Simple in-memory cache for reverse-geocoding responses
// PURPOSE: Reduce API calls by caching lookups for nearby coordinates

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cache entry with expiration
#[derive(Clone, Debug)]
struct CacheEntry {
    data: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(data: String, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Simple in-memory cache with TTL
/// DOCUMENTATION: Thread-safe cache for geocoder responses
pub struct GeocodeCache {
    store: Arc<RwLock<HashMap<String, CacheEntry>>>,
    default_ttl: Duration,
}

impl GeocodeCache {
    /// Create new cache with default TTL
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Generate cache key from coordinates
    pub fn generate_key(lat: f64, lon: f64) -> String {
        format!(
            "reverse:{}:{}",
            (lat * 10000.0).round() as i64, // Round to ~10m precision
            (lon * 10000.0).round() as i64
        )
    }

    /// Get cached value
    pub async fn get(&self, key: &str) -> Option<String> {
        let store = self.store.read().await;

        if let Some(entry) = store.get(key) {
            if !entry.is_expired() {
                log::debug!("Cache HIT for key: {}", key);
                return Some(entry.data.clone());
            } else {
                log::debug!("Cache EXPIRED for key: {}", key);
            }
        } else {
            log::debug!("Cache MISS for key: {}", key);
        }

        None
    }

    /// Set cached value with default TTL
    pub async fn set(&self, key: String, value: String) {
        let mut store = self.store.write().await;
        store.insert(key.clone(), CacheEntry::new(value, self.default_ttl));
        log::debug!(
            "Cache SET for key: {} (TTL: {}s)",
            key,
            self.default_ttl.as_secs()
        );
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Cache cleanup: removed {} expired entries ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries
pub fn start_cleanup_task(cache: Arc<GeocodeCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_set_get() {
        tokio_test::block_on(async {
            let cache = GeocodeCache::new(60);
            let key = "test_key".to_string();
            let value = "test_value".to_string();

            cache.set(key.clone(), value.clone()).await;
            let result = cache.get(&key).await;

            assert_eq!(result, Some(value));
        });
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = GeocodeCache::new(1); // 1 second TTL
        let key = "test_key".to_string();

        cache.set(key.clone(), "test_value".to_string()).await;

        // Should exist immediately
        assert!(cache.get(&key).await.is_some());

        // Wait for expiration
        tokio::time::sleep(Duration::from_secs(2)).await;

        // Should be expired
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_generate_key_rounds_nearby_coordinates_together() {
        let key1 = GeocodeCache::generate_key(43.32101, -1.98432);
        let key2 = GeocodeCache::generate_key(43.32101, -1.98432);
        let key3 = GeocodeCache::generate_key(43.33000, -1.98432);

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
    }

    #[tokio::test]
    async fn test_cache_cleanup() {
        let cache = GeocodeCache::new(1);

        cache.set("key1".to_string(), "value1".to_string()).await;
        cache.set("key2".to_string(), "value2".to_string()).await;

        tokio::time::sleep(Duration::from_secs(2)).await;

        cache.cleanup().await;

        assert!(cache.get("key1").await.is_none());
        assert!(cache.get("key2").await.is_none());
    }
}
