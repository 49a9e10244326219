//! In-memory theme cache
//!
//! LRU cache with per-entry TTL. Remote themes fetched by the storage facade
//! are kept here so repeated reads of the same theme skip the network.

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Cache entry with expiry
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Option<Duration>) -> Self {
        Self { value, expires_at: ttl.map(|d| Instant::now() + d) }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() > at)
    }
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub max_entries: usize,
    /// Default TTL in seconds (None = never expire)
    pub default_ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 32,
            default_ttl_secs: Some(300), // 5 minutes
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum entries
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Set default TTL
    pub fn default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.default_ttl_secs = ttl.map(|d| d.as_secs().max(1));
        self
    }

    fn ttl(&self) -> Option<Duration> {
        self.default_ttl_secs.map(Duration::from_secs)
    }
}

/// In-memory LRU cache
pub struct MemoryCache<V> {
    cache: Mutex<LruCache<String, CacheEntry<V>>>,
    default_ttl: Option<Duration>,
}

impl<V: Clone> MemoryCache<V> {
    /// Create a new memory cache
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);

        Self { cache: Mutex::new(LruCache::new(capacity)), default_ttl: config.ttl() }
    }

    /// Get a value; expired entries are dropped and reported as misses
    pub fn get(&self, key: &str) -> Option<V> {
        let mut cache = self.cache.lock();

        if cache.peek(key).is_some_and(CacheEntry::is_expired) {
            cache.pop(key);
            tracing::debug!(key, "cache entry expired");
            return None;
        }

        cache.get(key).map(|entry| entry.value.clone())
    }

    /// Put a value, using the default TTL when `ttl` is None
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let entry = CacheEntry::new(value, ttl.or(self.default_ttl));
        self.cache.lock().put(key.into(), entry);
    }

    /// Remove a value
    pub fn remove(&self, key: &str) -> bool {
        self.cache.lock().pop(key).is_some()
    }

    /// Clear all entries
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// Check if key exists and is not expired
    pub fn contains(&self, key: &str) -> bool {
        let mut cache = self.cache.lock();
        match cache.peek(key) {
            Some(entry) if entry.is_expired() => {
                cache.pop(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_cache_basic() {
        let cache: MemoryCache<String> = MemoryCache::new(CacheConfig::new().max_entries(10));

        cache.put("dark", "theme".to_string(), None);

        assert_eq!(cache.get("dark"), Some("theme".to_string()));
        assert_eq!(cache.get("light"), None);
    }

    #[test]
    fn test_memory_cache_ttl() {
        let cache: MemoryCache<i32> = MemoryCache::new(CacheConfig::new());

        cache.put("dark", 42, Some(Duration::from_millis(50)));
        assert_eq!(cache.get("dark"), Some(42));

        std::thread::sleep(Duration::from_millis(100));

        assert_eq!(cache.get("dark"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_memory_cache_lru_eviction() {
        let cache: MemoryCache<i32> = MemoryCache::new(CacheConfig::new().max_entries(3));

        cache.put("a", 1, None);
        cache.put("b", 2, None);
        cache.put("c", 3, None);
        assert_eq!(cache.len(), 3);

        cache.put("d", 4, None);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("d"), Some(4));
    }

    #[test]
    fn test_memory_cache_remove_and_clear() {
        let cache: MemoryCache<i32> = MemoryCache::new(CacheConfig::new());

        cache.put("a", 1, None);
        cache.put("b", 2, None);
        assert!(cache.contains("a"));

        assert!(cache.remove("a"));
        assert!(!cache.remove("a"));
        assert!(!cache.contains("a"));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_falls_back_to_one() {
        let cache: MemoryCache<i32> = MemoryCache::new(CacheConfig::new().max_entries(0));
        cache.put("a", 1, None);
        cache.put("b", 2, None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("b"), Some(2));
    }
}
