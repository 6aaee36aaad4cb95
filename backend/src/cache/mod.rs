//! Cache backends behind one trait.
//!
//! - [`RedisCache`]: Redis via a multiplexed connection manager
//! - [`MemoryCache`]: in-process stand-in, selected with `REDIS_URL=memory://`
//!
//! When no cache is configured the service holds `None` instead of a backend,
//! and the cart endpoints answer in mock mode.

mod memory;
mod redis_cache;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::MEMORY_CACHE_URL;
use crate::error::AppResult;
use crate::models::Cart;

pub use self::memory::MemoryCache;
pub use self::redis_cache::RedisCache;

#[async_trait]
pub trait CacheStore: Send + Sync {
    fn name(&self) -> &'static str;

    async fn ping(&self) -> AppResult<()>;

    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Atomically add `delta` to `field` of the hash at `key` and return the
    /// whole hash as it stands after the increment.
    async fn hincr_by(&self, key: &str, field: i32, delta: i64) -> AppResult<Cart>;

    /// The whole hash at `key`; empty when the key does not exist.
    async fn hgetall(&self, key: &str) -> AppResult<Cart>;

    async fn close(&self) {}
}

/// Open the backend named by `url`.
pub async fn connect(url: &str) -> AppResult<Arc<dyn CacheStore>> {
    if url == MEMORY_CACHE_URL {
        return Ok(Arc::new(MemoryCache::new()));
    }
    Ok(Arc::new(RedisCache::connect(url).await?))
}
