use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::CacheStore;
use crate::error::AppResult;
use crate::models::Cart;

#[derive(Debug, Default)]
struct Entries {
    values: HashMap<String, (String, Instant)>,
    hashes: HashMap<String, Cart>,
}

/// Single-process cache with Redis-like semantics for the commands the
/// service uses. Expired values are dropped on read.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<Entries>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut entries = self.entries.write().await;
        let expired = match entries.values.get(key) {
            Some((value, expires_at)) if Instant::now() < *expires_at => {
                return Ok(Some(value.clone()))
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.values.remove(key);
        }
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let expires_at = Instant::now() + ttl;
        self.entries
            .write()
            .await
            .values
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }

    async fn hincr_by(&self, key: &str, field: i32, delta: i64) -> AppResult<Cart> {
        let mut entries = self.entries.write().await;
        let hash = entries.hashes.entry(key.to_string()).or_default();
        let current = hash.get(&field).copied().unwrap_or(0);
        // Same refusal as Redis HINCRBY; the hash is left untouched.
        let updated = current.checked_add(delta).ok_or_else(|| {
            redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "increment or decrement would overflow",
            ))
        })?;
        hash.insert(field, updated);
        Ok(hash.clone())
    }

    async fn hgetall(&self, key: &str) -> AppResult<Cart> {
        let entries = self.entries.read().await;
        Ok(entries.hashes.get(key).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::error::AppError;

    #[tokio::test]
    async fn increments_accumulate_per_field() {
        let cache = MemoryCache::new();
        cache.hincr_by("cart:s1", 7, 2).await.unwrap();
        let cart = cache.hincr_by("cart:s1", 7, 3).await.unwrap();
        assert_eq!(cart, Cart::from([(7, 5)]));
    }

    #[tokio::test]
    async fn increment_returns_the_whole_hash() {
        let cache = MemoryCache::new();
        cache.hincr_by("cart:s1", 1, 1).await.unwrap();
        let cart = cache.hincr_by("cart:s1", 4, 2).await.unwrap();
        assert_eq!(cart, Cart::from([(1, 1), (4, 2)]));
    }

    #[tokio::test]
    async fn overflowing_increment_is_refused_and_leaves_hash_alone() {
        let cache = MemoryCache::new();
        cache.hincr_by("cart:s1", 7, i64::MAX).await.unwrap();

        let result = cache.hincr_by("cart:s1", 7, 1).await;
        assert!(matches!(result, Err(AppError::Cache(_))));
        assert_eq!(
            cache.hgetall("cart:s1").await.unwrap(),
            Cart::from([(7, i64::MAX)])
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_are_not_lost() {
        const TASKS: i64 = 64;
        let cache = Arc::new(MemoryCache::new());

        let handles: Vec<_> = (0..TASKS)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.hincr_by("cart:s1", 7, 1).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(cache.hgetall("cart:s1").await.unwrap(), Cart::from([(7, TASKS)]));
    }

    #[tokio::test]
    async fn sessions_do_not_share_hashes() {
        let cache = MemoryCache::new();
        cache.hincr_by("cart:a", 1, 1).await.unwrap();
        assert!(cache.hgetall("cart:b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_hash_is_empty() {
        let cache = MemoryCache::new();
        assert_eq!(cache.hgetall("cart:unknown-session").await.unwrap(), Cart::new());
    }

    #[tokio::test(start_paused = true)]
    async fn values_expire_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .set_ex("products", "[]", Duration::from_secs(300))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get("products").await.unwrap().as_deref(), Some("[]"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("products").await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_value_is_none() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("products").await.unwrap(), None);
    }
}
