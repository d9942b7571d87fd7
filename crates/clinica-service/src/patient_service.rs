//! Patient service trait definition.

use async_trait::async_trait;
use clinica_core::{ClinicaResult, Page, PageRequest, Patient, PatientId};
use clinica_repository::PatientFilter;

/// Patient service trait.
///
/// Read operations are cache-aside over the repository; write operations go
/// to the repository first and then invalidate whatever the cache holds. The
/// repository is always the source of truth, so a cold or broken cache only
/// costs latency, never correctness.
#[async_trait]
pub trait PatientService: Send + Sync {
    /// Registers a new patient.
    async fn create_patient(&self, patient: Patient) -> ClinicaResult<Patient>;

    /// Gets a patient by ID.
    async fn get_patient(&self, id: PatientId) -> ClinicaResult<Patient>;

    /// Lists patients matching the filter, with pagination.
    async fn list_patients(
        &self,
        page: PageRequest,
        filter: PatientFilter,
    ) -> ClinicaResult<Page<Patient>>;

    /// Updates a patient's record. The stored identifier and creation time
    /// are kept regardless of what the incoming record carries.
    async fn update_patient(&self, id: PatientId, patient: Patient) -> ClinicaResult<Patient>;

    /// Soft-deletes a patient.
    async fn delete_patient(&self, id: PatientId) -> ClinicaResult<()>;

    /// Counts all patients.
    async fn count_patients(&self) -> ClinicaResult<u64>;
}
