//! Patient entity.

use super::super::value_objects::{Gender, PatientType};
use crate::PatientId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Patient record.
///
/// `id` and `created_at` are immutable once persisted; the service layer
/// re-stamps them onto any incoming update before it reaches the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Unique identifier for the patient.
    pub id: PatientId,

    /// Patient's full name.
    pub full_name: String,

    /// Date of birth.
    pub date_of_birth: NaiveDate,

    /// Patient gender.
    pub gender: Gender,

    /// Administrative category.
    pub patient_type: PatientType,

    /// Contact phone number.
    pub phone_number: String,

    /// Contact email address.
    pub email: Option<String>,

    /// Postal address.
    pub address: Option<String>,

    /// Medical record number; unique across patients when present.
    pub medical_record_number: Option<String>,

    /// Emergency contact name.
    pub emergency_contact_name: Option<String>,

    /// Emergency contact phone number.
    pub emergency_contact_phone: Option<String>,

    /// Blood type (A+, A-, B+, B-, AB+, AB-, O+, O-).
    pub blood_type: Option<String>,

    /// Known allergies.
    pub allergies: Option<String>,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,

    /// Soft-delete timestamp; deleted records are invisible to all reads.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Patient {
    /// Creates a new patient with the required fields; optional fields start
    /// empty and can be set afterwards.
    #[must_use]
    pub fn new(
        full_name: String,
        date_of_birth: NaiveDate,
        gender: Gender,
        patient_type: PatientType,
        phone_number: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PatientId::new(),
            full_name,
            date_of_birth,
            gender,
            patient_type,
            phone_number,
            email: None,
            address: None,
            medical_record_number: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            blood_type: None,
            allergies: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Returns true if the record has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Stamps the immutable fields of `existing` onto this record and
    /// refreshes `updated_at`. Used by the service layer before an update so
    /// the caller cannot change the identifier or creation time.
    pub fn preserve_identity(&mut self, existing: &Self) {
        self.id = existing.id;
        self.created_at = existing.created_at;
        self.updated_at = Utc::now();
    }
}
