//! Patient service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface, DEFAULT_ENTRY_TTL, DEFAULT_LIST_TTL};
use crate::patient_service::PatientService;
use async_trait::async_trait;
use clinica_core::{ClinicaError, ClinicaResult, Page, PageRequest, Patient, PatientId};
use clinica_repository::{PatientFilter, PatientRepository};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Cache-aside patient service.
///
/// Cache failures never surface to the caller: a failed read falls through
/// to the repository, a failed write or invalidation is logged and dropped.
/// Invalidation removes the entity key and every cached listing page, since
/// any page may contain the changed record.
pub struct PatientServiceImpl<R: PatientRepository> {
    repository: Arc<R>,
    cache: Arc<dyn CacheInterface>,
    entry_ttl: Duration,
    list_ttl: Duration,
}

impl<R: PatientRepository> PatientServiceImpl<R> {
    /// Creates a new patient service with the default TTLs.
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheInterface>) -> Self {
        Self {
            repository,
            cache,
            entry_ttl: DEFAULT_ENTRY_TTL,
            list_ttl: DEFAULT_LIST_TTL,
        }
    }

    /// Creates a patient service with custom TTLs.
    pub fn with_ttls(
        repository: Arc<R>,
        cache: Arc<dyn CacheInterface>,
        entry_ttl: Duration,
        list_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            entry_ttl,
            list_ttl,
        }
    }

    /// Drops the cached entry for one patient along with every listing page.
    async fn invalidate(&self, id: PatientId) {
        if let Err(e) = self.cache.delete(&cache_keys::patient_by_id(id)).await {
            warn!("Failed to invalidate cached patient {}: {}", id, e);
        }
        self.invalidate_lists().await;
    }

    /// Drops every cached listing page.
    async fn invalidate_lists(&self) {
        if let Err(e) = self
            .cache
            .delete_pattern(&cache_keys::patient_list_pattern())
            .await
        {
            warn!("Failed to invalidate cached patient listings: {}", e);
        }
    }
}

#[async_trait]
impl<R: PatientRepository + 'static> PatientService for PatientServiceImpl<R> {
    async fn create_patient(&self, patient: Patient) -> ClinicaResult<Patient> {
        debug!("Creating patient: {}", patient.full_name);

        let created = self.repository.create(&patient).await?;

        // Cached listing pages are stale now; the new entry gets cached on
        // its first read.
        self.invalidate_lists().await;

        info!("Patient created: {}", created.id);
        Ok(created)
    }

    async fn get_patient(&self, id: PatientId) -> ClinicaResult<Patient> {
        debug!("Getting patient: {}", id);

        let cache_key = cache_keys::patient_by_id(id);
        match self.cache.get::<Patient>(&cache_key).await {
            Ok(Some(patient)) => {
                debug!("Cache hit for patient: {}", id);
                return Ok(patient);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for key '{}': {}", cache_key, e),
        }

        let patient = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ClinicaError::not_found("Patient", id))?;

        if let Err(e) = self.cache.set(&cache_key, &patient, self.entry_ttl).await {
            warn!("Failed to cache patient {}: {}", id, e);
        }

        Ok(patient)
    }

    async fn list_patients(
        &self,
        page: PageRequest,
        filter: PatientFilter,
    ) -> ClinicaResult<Page<Patient>> {
        debug!(
            "Listing patients, page: {}, per_page: {}",
            page.page, page.per_page
        );

        let cache_key = cache_keys::patient_list(&page, &filter);
        match self.cache.get::<Page<Patient>>(&cache_key).await {
            Ok(Some(listing)) => {
                debug!("Cache hit for patient listing");
                return Ok(listing);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for key '{}': {}", cache_key, e),
        }

        let listing = self.repository.find_all(page, &filter).await?;

        if let Err(e) = self.cache.set(&cache_key, &listing, self.list_ttl).await {
            warn!("Failed to cache patient listing: {}", e);
        }

        Ok(listing)
    }

    async fn update_patient(&self, id: PatientId, mut patient: Patient) -> ClinicaResult<Patient> {
        debug!("Updating patient: {}", id);

        // Read from the repository, not the cache, so a stale entry can
        // never resurrect a deleted record's identity.
        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ClinicaError::not_found("Patient", id))?;

        patient.preserve_identity(&existing);
        let updated = self.repository.update(&patient).await?;

        self.invalidate(id).await;

        info!("Patient updated: {}", id);
        Ok(updated)
    }

    async fn delete_patient(&self, id: PatientId) -> ClinicaResult<()> {
        debug!("Deleting patient: {}", id);

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(ClinicaError::not_found("Patient", id));
        }

        self.invalidate(id).await;

        info!("Patient deleted: {}", id);
        Ok(())
    }

    async fn count_patients(&self) -> ClinicaResult<u64> {
        self.repository.count().await
    }
}

impl<R: PatientRepository> std::fmt::Debug for PatientServiceImpl<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientServiceImpl")
            .field("entry_ttl", &self.entry_ttl)
            .field("list_ttl", &self.list_ttl)
            .finish_non_exhaustive()
    }
}
