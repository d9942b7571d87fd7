//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use clinica_config::CacheConfig;
use clinica_core::{ClinicaError, ClinicaResult};
use deadpool_redis::{Config, Pool, PoolConfig, Runtime};
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{debug, info};

/// Default TTL for single cached entities (5 minutes).
pub const DEFAULT_ENTRY_TTL: Duration = Duration::from_secs(300);

/// Default TTL for cached listing pages (2 minutes).
pub const DEFAULT_LIST_TTL: Duration = Duration::from_secs(120);

/// How many keys one SCAN iteration asks the server for.
const SCAN_BATCH: usize = 100;

/// Redis-backed [`CacheInterface`].
///
/// Holds an optional connection pool. With no pool the service is a no-op:
/// every read misses and every write succeeds without doing anything, which
/// lets callers run unchanged when caching is switched off.
pub struct RedisCacheService {
    /// Redis connection pool, absent when caching is disabled.
    pool: Option<Pool>,
}

impl RedisCacheService {
    /// Connects to Redis and verifies the connection with a PING.
    ///
    /// Fails if the pool cannot be built or the server does not answer within
    /// the configured connect timeout.
    pub async fn connect(config: &CacheConfig) -> ClinicaResult<Self> {
        let mut cfg = Config::from_url(config.url.clone());
        cfg.pool = Some(PoolConfig::new(config.pool_size));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| ClinicaError::cache(format!("Failed to build Redis pool: {e}")))?;

        let probe = async {
            let mut conn = pool.get().await.map_err(|e| {
                ClinicaError::cache(format!("Failed to get Redis connection: {e}"))
            })?;
            redis::cmd("PING")
                .query_async::<String>(&mut conn)
                .await
                .map_err(|e| ClinicaError::cache(format!("Redis ping failed: {e}")))
        };

        match tokio::time::timeout(config.connect_timeout(), probe).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                return Err(ClinicaError::Timeout(format!(
                    "redis ping to {}",
                    config.url
                )))
            }
        }

        info!("Connected to Redis at {}", config.url);
        Ok(Self { pool: Some(pool) })
    }

    /// Creates a no-op cache service for when Redis is disabled.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { pool: None }
    }

    /// Wraps an existing pool. The pool is assumed to be healthy.
    #[must_use]
    pub const fn with_pool(pool: Pool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> ClinicaResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool
                .get()
                .await
                .map_err(|e| ClinicaError::cache(format!("Failed to get Redis connection: {e}"))),
            None => Err(ClinicaError::cache("Cache is disabled")),
        }
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("enabled", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    async fn get_raw(&self, key: &str) -> ClinicaResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| ClinicaError::cache(format!("Failed to get key '{key}': {e}")))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> ClinicaResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| ClinicaError::cache(format!("Failed to set key '{key}': {e}")))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> ClinicaResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| ClinicaError::cache(format!("Failed to delete key '{key}': {e}")))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn delete_pattern(&self, pattern: &str) -> ClinicaResult<u64> {
        if !self.is_enabled() {
            return Ok(0);
        }

        let mut conn = self.get_conn().await?;
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        // SCAN walks the keyspace in bounded chunks so a large database never
        // blocks the server the way KEYS would.
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| ClinicaError::cache(format!("Failed to scan keys: {e}")))?;

            if !keys.is_empty() {
                let batch: i64 = conn
                    .del(&keys)
                    .await
                    .map_err(|e| ClinicaError::cache(format!("Failed to delete keys: {e}")))?;
                deleted += u64::try_from(batch).unwrap_or(0);
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted)
    }

    async fn close(&self) -> ClinicaResult<()> {
        if let Some(pool) = &self.pool {
            if !pool.is_closed() {
                pool.close();
                info!("Redis connection pool closed");
            }
        }
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheExt;

    #[test]
    fn test_disabled_cache_reports_disabled() {
        let cache = RedisCacheService::disabled();
        assert!(!cache.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_cache_always_misses() {
        let cache = RedisCacheService::disabled();
        let value: Option<String> = cache.get("any:key").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_disabled_cache_writes_are_noops() {
        let cache = RedisCacheService::disabled();
        cache
            .set("any:key", &"value", DEFAULT_ENTRY_TTL)
            .await
            .unwrap();
        assert!(!cache.delete("any:key").await.unwrap());
        assert_eq!(cache.delete_pattern("any:*").await.unwrap(), 0);
        cache.close().await.unwrap();
    }
}
