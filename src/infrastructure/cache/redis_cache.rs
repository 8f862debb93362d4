//! Redis-backed feed cache.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

/// Namespace for every key this service writes.
const KEY_PREFIX: &str = "rankwire:";

/// Stores rendered feed documents in Redis with an expiry.
///
/// Reads and writes never fail towards the caller: a broken connection turns
/// into a miss, which makes the feed service regenerate from the database.
/// The `ConnectionManager` reconnects on its own.
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl_seconds: u64,
}

impl RedisCache {
    /// Opens a managed connection and checks it with `PING`.
    ///
    /// `default_ttl_seconds` applies to [`CacheService::set`] calls without a TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] when the URL is invalid or the
    /// server does not answer.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::ConnectionError(format!("invalid Redis URL: {e}")))?;

        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::ConnectionError(e.to_string()))?;

        conn.ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("PING failed: {e}")))?;

        info!(default_ttl_seconds, "Redis feed cache connected");

        Ok(Self {
            conn,
            default_ttl_seconds,
        })
    }

    fn key(key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(Self::key(key)).await {
            Ok(hit) => {
                debug!(key, hit = hit.is_some(), "Feed cache lookup");
                Ok(hit)
            }
            Err(e) => {
                warn!(key, error = %e, "Feed cache read failed, treating as miss");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let ttl_seconds = ttl_seconds.unwrap_or(self.default_ttl_seconds);

        if let Err(e) = conn
            .set_ex::<_, _, ()>(Self::key(key), value, ttl_seconds)
            .await
        {
            warn!(key, error = %e, "Feed cache write failed");
        } else {
            debug!(key, bytes = value.len(), ttl_seconds, "Feed cached");
        }
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();

        match conn.del::<_, u32>(Self::key(key)).await {
            Ok(removed) => debug!(key, removed, "Feed cache invalidated"),
            Err(e) => warn!(key, error = %e, "Feed cache invalidation failed"),
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}
