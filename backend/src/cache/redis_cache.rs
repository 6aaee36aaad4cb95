use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::info;

use super::CacheStore;
use crate::error::AppResult;
use crate::models::Cart;

/// Redis-backed cache. `ConnectionManager` multiplexes one connection and
/// reconnects on its own; clones share it.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> AppResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value = redis::cmd("GET")
            .arg(key)
            .query_async::<_, Option<String>>(&mut conn)
            .await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("SETEX")
            .arg(key)
            .arg(ttl.as_secs().max(1))
            .arg(value)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn hincr_by(&self, key: &str, field: i32, delta: i64) -> AppResult<Cart> {
        let mut conn = self.conn.clone();
        // MULTI/EXEC so the read-back reflects exactly this increment
        let (cart,): (Cart,) = redis::pipe()
            .atomic()
            .cmd("HINCRBY")
            .arg(key)
            .arg(field)
            .arg(delta)
            .ignore()
            .cmd("HGETALL")
            .arg(key)
            .query_async(&mut conn)
            .await?;
        Ok(cart)
    }

    async fn hgetall(&self, key: &str) -> AppResult<Cart> {
        let mut conn = self.conn.clone();
        let cart = redis::cmd("HGETALL")
            .arg(key)
            .query_async::<_, Cart>(&mut conn)
            .await?;
        Ok(cart)
    }

    async fn close(&self) {
        // Dropping the last manager clone closes the socket.
        info!("Redis connection released.");
    }
}
