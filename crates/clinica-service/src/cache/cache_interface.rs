//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use clinica_core::ClinicaResult;
use std::time::Duration;
use tracing::debug;

/// Cache port for storing and retrieving cached data.
///
/// This trait abstracts a byte-oriented key/value store with TTL expiry and
/// glob pattern deletes. Values are JSON strings so the trait stays
/// dyn-compatible; typed access goes through [`CacheExt`].
///
/// Cache entries are derived, expendable views of persistent records: every
/// operation here is best-effort, and callers must stay correct when the
/// cache is empty or unreachable.
#[async_trait]
pub trait CacheInterface: Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> ClinicaResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> ClinicaResult<()>;

    /// Delete a value from the cache. Deleting an absent key is not an error.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> ClinicaResult<bool>;

    /// Delete every key matching a glob-style pattern.
    ///
    /// The keyspace is scanned incrementally; a failure mid-scan surfaces an
    /// error but keys already removed stay removed.
    ///
    /// Returns the number of keys deleted.
    async fn delete_pattern(&self, pattern: &str) -> ClinicaResult<u64>;

    /// Release the underlying connection resources. Idempotent.
    async fn close(&self) -> ClinicaResult<()>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Extension trait with typed methods for convenience.
///
/// A stored value that fails to deserialize is treated as a miss, not an
/// error: the entry is stale garbage and the caller will repopulate it.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    async fn get<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> ClinicaResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    debug!("Discarding undecodable cache entry '{}': {}", key, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> ClinicaResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

// Blanket implementation for all CacheInterface implementations
impl<T: CacheInterface + ?Sized> CacheExt for T {}
