//! Repository trait definitions and filter types.

use async_trait::async_trait;
use clinica_core::{ClinicaResult, Gender, Page, PageRequest, Patient, PatientId, PatientType, User, UserId};

/// Filter predicates for patient listing.
///
/// Predicates are combined with AND; an unset field matches everything. The
/// search term is matched case-insensitively as a substring across full name,
/// phone number, email, and medical record number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFilter {
    /// Free-text search term.
    pub search: Option<String>,
    /// Exact gender match.
    pub gender: Option<Gender>,
    /// Exact patient type match.
    pub patient_type: Option<PatientType>,
}

impl PatientFilter {
    /// Returns true if no predicate is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.gender.is_none() && self.patient_type.is_none()
    }
}

/// Filter predicates for user listing.
///
/// The search term is matched case-insensitively across full name and email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Free-text search term.
    pub search: Option<String>,
}

impl UserFilter {
    /// Returns true if no predicate is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
    }
}

/// Patient repository trait.
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Inserts a new patient. Fails with `Conflict` if the medical record
    /// number is already taken.
    async fn create(&self, patient: &Patient) -> ClinicaResult<Patient>;

    /// Finds a patient by ID. Soft-deleted records are not returned.
    async fn find_by_id(&self, id: PatientId) -> ClinicaResult<Option<Patient>>;

    /// Finds patients matching the filter, with the total count of matching
    /// records before pagination.
    async fn find_all(&self, page: PageRequest, filter: &PatientFilter)
        -> ClinicaResult<Page<Patient>>;

    /// Replaces the stored patient's fields by identifier. Fails with
    /// `NotFound` if the identifier does not exist.
    async fn update(&self, patient: &Patient) -> ClinicaResult<Patient>;

    /// Soft-deletes a patient. Returns false if the identifier does not exist.
    async fn delete(&self, id: PatientId) -> ClinicaResult<bool>;

    /// Counts all patients.
    async fn count(&self) -> ClinicaResult<u64>;
}

/// User repository trait.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user. Fails with `Conflict` if the email is taken.
    async fn create(&self, user: &User) -> ClinicaResult<User>;

    /// Finds a user by ID. Soft-deleted records are not returned.
    async fn find_by_id(&self, id: UserId) -> ClinicaResult<Option<User>>;

    /// Finds a user by email.
    async fn find_by_email(&self, email: &str) -> ClinicaResult<Option<User>>;

    /// Finds users matching the filter, with the total count of matching
    /// records before pagination.
    async fn find_all(&self, page: PageRequest, filter: &UserFilter) -> ClinicaResult<Page<User>>;

    /// Replaces the stored user's fields by identifier. Fails with `NotFound`
    /// if the identifier does not exist.
    async fn update(&self, user: &User) -> ClinicaResult<User>;

    /// Soft-deletes a user. Returns false if the identifier does not exist.
    async fn delete(&self, id: UserId) -> ClinicaResult<bool>;

    /// Counts all users.
    async fn count(&self) -> ClinicaResult<u64>;
}
