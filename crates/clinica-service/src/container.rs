//! Service wiring.
//!
//! Dependencies are assembled once at startup with plain constructors: the
//! database pool feeds the repositories, the repositories and the shared
//! cache feed the services. Everything downstream holds `Arc`s, so the
//! container can be cloned or dropped freely after wiring.

use crate::cache::{CacheInterface, RedisCacheService};
use crate::r#impl::{PatientServiceImpl, UserServiceImpl};
use crate::{PatientService, UserService};
use clinica_config::{AppConfig, CacheConfig};
use clinica_core::ClinicaResult;
use clinica_repository::{DatabasePool, PgPatientRepository, PgUserRepository};
use std::sync::Arc;
use tracing::{info, warn};

/// Connects the cache backend described by the configuration.
///
/// A disabled configuration or an unreachable Redis both yield the no-op
/// cache: the application starts and serves from the database alone rather
/// than failing on a degraded dependency.
pub async fn bootstrap_cache(config: &CacheConfig) -> Arc<dyn CacheInterface> {
    if !config.enabled {
        info!("Caching disabled by configuration");
        return Arc::new(RedisCacheService::disabled());
    }

    match RedisCacheService::connect(config).await {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            warn!("Redis unavailable, continuing without cache: {}", e);
            Arc::new(RedisCacheService::disabled())
        }
    }
}

/// Holds the wired service graph.
pub struct ServiceContainer {
    pool: Arc<DatabasePool>,
    cache: Arc<dyn CacheInterface>,
    /// Patient service.
    pub patient_service: Arc<dyn PatientService>,
    /// User service.
    pub user_service: Arc<dyn UserService>,
}

impl ServiceContainer {
    /// Wires repositories and services over an existing pool and cache.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>, cache: Arc<dyn CacheInterface>, config: &AppConfig) -> Self {
        let patient_repository = Arc::new(PgPatientRepository::new(Arc::clone(&pool)));
        let user_repository = Arc::new(PgUserRepository::new(Arc::clone(&pool)));

        let patient_service: Arc<dyn PatientService> = Arc::new(PatientServiceImpl::with_ttls(
            patient_repository,
            Arc::clone(&cache),
            config.cache.entry_ttl(),
            config.cache.list_ttl(),
        ));
        let user_service: Arc<dyn UserService> = Arc::new(UserServiceImpl::with_ttls(
            user_repository,
            Arc::clone(&cache),
            config.cache.entry_ttl(),
            config.cache.list_ttl(),
        ));

        Self {
            pool,
            cache,
            patient_service,
            user_service,
        }
    }

    /// Connects the database and cache from configuration and wires the
    /// service graph. Runs pending migrations before returning.
    pub async fn from_config(config: &AppConfig) -> ClinicaResult<Self> {
        let pool = Arc::new(DatabasePool::connect(&config.database).await?);
        pool.run_migrations().await?;

        let cache = bootstrap_cache(&config.cache).await;

        Ok(Self::new(pool, cache, config))
    }

    /// Returns the shared cache handle.
    #[must_use]
    pub fn cache(&self) -> Arc<dyn CacheInterface> {
        Arc::clone(&self.cache)
    }

    /// Returns the shared database pool.
    #[must_use]
    pub fn pool(&self) -> Arc<DatabasePool> {
        Arc::clone(&self.pool)
    }

    /// Releases the cache and database connections. Idempotent.
    pub async fn shutdown(&self) -> ClinicaResult<()> {
        self.cache.close().await?;
        self.pool.close().await;
        info!("Service container shut down");
        Ok(())
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_disabled_cache() {
        let config = CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        };
        let cache = bootstrap_cache(&config).await;
        assert!(!cache.is_enabled());
    }

    #[tokio::test]
    async fn test_bootstrap_falls_back_when_unreachable() {
        let config = CacheConfig {
            enabled: true,
            url: "redis://127.0.0.1:1".to_string(),
            connect_timeout_secs: 1,
            ..CacheConfig::default()
        };
        let cache = bootstrap_cache(&config).await;
        assert!(!cache.is_enabled());
    }
}
