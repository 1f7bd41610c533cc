use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Short-lived cache of rendered read responses, keyed by path and query.
///
/// Owned by `AppState` and cleared wholesale by every write. Each clear bumps
/// a generation counter; a value loaded under an older generation is never
/// stored, so a read that overlaps a write cannot repopulate the cache with
/// pre-write content. A zero TTL disables caching.
pub struct ResponseCache {
    ttl: Duration,
    generation: AtomicU64,
    entries: RwLock<HashMap<String, (Instant, Value)>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        ResponseCache {
            ttl,
            generation: AtomicU64::new(0),
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        if self.ttl.is_zero() {
            return None;
        }
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, value)| value.clone())
    }

    pub async fn put(&self, key: String, value: Value) {
        self.put_loaded_at(key, value, self.generation()).await;
    }

    /// Stores `value` only if no invalidation happened since `generation` was read.
    async fn put_loaded_at(&self, key: String, value: Value, generation: u64) {
        if self.ttl.is_zero() {
            return;
        }
        let mut entries = self.entries.write().await;
        if self.generation() != generation {
            debug!("Discarding stale load for {key}");
            return;
        }
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        entries.insert(key, (Instant::now(), value));
    }

    /// Returns the cached value for `key`, or runs `load` and caches its success.
    pub async fn get_or_load<F, Fut, E>(&self, key: &str, load: F) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if let Some(hit) = self.get(key).await {
            debug!("Cache hit for {key}");
            return Ok(hit);
        }
        let generation = self.generation();
        let value = load().await?;
        self.put_loaded_at(key.to_string(), value.clone(), generation).await;
        Ok(value)
    }

    pub async fn invalidate(&self) {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_or_load_caches_success() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let first: Result<Value, ()> = cache.get_or_load("/api/skills", || async { Ok(json!(1)) }).await;
        let second: Result<Value, ()> = cache.get_or_load("/api/skills", || async { Ok(json!(2)) }).await;
        assert_eq!(first, Ok(json!(1)));
        assert_eq!(second, Ok(json!(1)));
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let failed: Result<Value, &str> = cache.get_or_load("/api/all", || async { Err("down") }).await;
        assert!(failed.is_err());
        assert!(cache.get("/api/all").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_clears_everything() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("/api/dreams".to_string(), json!([])).await;
        cache.put("/api/projects?featured=true".to_string(), json!([])).await;
        cache.invalidate().await;
        assert!(cache.get("/api/dreams").await.is_none());
        assert!(cache.get("/api/projects?featured=true").await.is_none());
    }

    #[tokio::test]
    async fn test_load_overlapping_a_write_is_not_cached() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let loaded: Result<Value, ()> = cache
            .get_or_load("/api/skills", || async {
                // A write lands while the read is still in flight.
                cache.invalidate().await;
                Ok(json!({"total": 0}))
            })
            .await;
        assert_eq!(loaded, Ok(json!({"total": 0})));
        assert!(cache.get("/api/skills").await.is_none());

        let fresh: Result<Value, ()> = cache.get_or_load("/api/skills", || async { Ok(json!({"total": 1})) }).await;
        assert_eq!(fresh, Ok(json!({"total": 1})));
        assert_eq!(cache.get("/api/skills").await, Some(json!({"total": 1})));
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let cache = ResponseCache::new(Duration::ZERO);
        cache.put("/api/dreams".to_string(), json!([])).await;
        assert!(cache.get("/api/dreams").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let cache = ResponseCache::new(Duration::from_secs(5));
        cache.put("/api/contact".to_string(), json!([])).await;
        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(cache.get("/api/contact").await.is_none());
    }
}
