//! PostgreSQL patient repository implementation.

use crate::{traits::PatientRepository, DatabasePool, PatientFilter};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use clinica_core::{ClinicaError, ClinicaResult, Page, PageRequest, Patient, PatientId};
use sqlx::{FromRow, Postgres, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL patient repository.
#[derive(Clone)]
pub struct PgPatientRepository {
    pool: Arc<DatabasePool>,
}

impl PgPatientRepository {
    /// Creates a new PostgreSQL patient repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a patient.
#[derive(Debug, FromRow)]
struct PatientRow {
    id: uuid::Uuid,
    full_name: String,
    date_of_birth: NaiveDate,
    gender: String,
    patient_type: String,
    phone_number: String,
    email: Option<String>,
    address: Option<String>,
    medical_record_number: Option<String>,
    emergency_contact_name: Option<String>,
    emergency_contact_phone: Option<String>,
    blood_type: Option<String>,
    allergies: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<PatientRow> for Patient {
    type Error = ClinicaError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        Ok(Patient {
            id: PatientId::from_uuid(row.id),
            full_name: row.full_name,
            date_of_birth: row.date_of_birth,
            gender: row
                .gender
                .parse()
                .map_err(|e| ClinicaError::Internal(format!("Invalid gender in database: {}", e)))?,
            patient_type: row.patient_type.parse().map_err(|e| {
                ClinicaError::Internal(format!("Invalid patient type in database: {}", e))
            })?,
            phone_number: row.phone_number,
            email: row.email,
            address: row.address,
            medical_record_number: row.medical_record_number,
            emergency_contact_name: row.emergency_contact_name,
            emergency_contact_phone: row.emergency_contact_phone,
            blood_type: row.blood_type,
            allergies: row.allergies,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

/// Appends the filter predicates to a query that already has a WHERE clause.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &PatientFilter) {
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        builder.push(" AND (full_name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR phone_number ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR email ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR medical_record_number ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }

    if let Some(gender) = filter.gender {
        builder.push(" AND gender = ");
        builder.push_bind(gender.as_str());
    }

    if let Some(patient_type) = filter.patient_type {
        builder.push(" AND patient_type = ");
        builder.push_bind(patient_type.as_str());
    }
}

#[async_trait]
impl PatientRepository for PgPatientRepository {
    async fn create(&self, patient: &Patient) -> ClinicaResult<Patient> {
        debug!("Creating patient: {}", patient.id);

        let row = sqlx::query_as::<_, PatientRow>(
            r#"
            INSERT INTO patients (id, full_name, date_of_birth, gender, patient_type,
                                  phone_number, email, address, medical_record_number,
                                  emergency_contact_name, emergency_contact_phone,
                                  blood_type, allergies, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING id, full_name, date_of_birth, gender, patient_type, phone_number,
                      email, address, medical_record_number, emergency_contact_name,
                      emergency_contact_phone, blood_type, allergies, created_at,
                      updated_at, deleted_at
            "#,
        )
        .bind(patient.id.into_inner())
        .bind(&patient.full_name)
        .bind(patient.date_of_birth)
        .bind(patient.gender.as_str())
        .bind(patient.patient_type.as_str())
        .bind(&patient.phone_number)
        .bind(&patient.email)
        .bind(&patient.address)
        .bind(&patient.medical_record_number)
        .bind(&patient.emergency_contact_name)
        .bind(&patient.emergency_contact_phone)
        .bind(&patient.blood_type)
        .bind(&patient.allergies)
        .bind(patient.created_at)
        .bind(patient.updated_at)
        .fetch_one(self.pool.inner())
        .await?;

        Patient::try_from(row)
    }

    async fn find_by_id(&self, id: PatientId) -> ClinicaResult<Option<Patient>> {
        debug!("Finding patient by id: {}", id);

        let row = sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT id, full_name, date_of_birth, gender, patient_type, phone_number,
                   email, address, medical_record_number, emergency_contact_name,
                   emergency_contact_phone, blood_type, allergies, created_at,
                   updated_at, deleted_at
            FROM patients
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Patient::try_from).transpose()
    }

    async fn find_all(
        &self,
        page: PageRequest,
        filter: &PatientFilter,
    ) -> ClinicaResult<Page<Patient>> {
        debug!(
            "Finding patients, page: {}, per_page: {}, filter: {:?}",
            page.page, page.per_page, filter
        );

        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM patients WHERE deleted_at IS NULL");
        push_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(self.pool.inner())
            .await?;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT id, full_name, date_of_birth, gender, patient_type, phone_number, \
             email, address, medical_record_number, emergency_contact_name, \
             emergency_contact_phone, blood_type, allergies, created_at, updated_at, \
             deleted_at FROM patients WHERE deleted_at IS NULL",
        );
        push_filters(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(page.limit() as i64);
        builder.push(" OFFSET ");
        builder.push_bind(page.offset() as i64);

        let rows: Vec<PatientRow> = builder
            .build_query_as()
            .fetch_all(self.pool.inner())
            .await?;

        let patients: Vec<Patient> = rows
            .into_iter()
            .map(Patient::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(patients, page.page, page.per_page, total as u64))
    }

    async fn update(&self, patient: &Patient) -> ClinicaResult<Patient> {
        debug!("Updating patient: {}", patient.id);

        let row = sqlx::query_as::<_, PatientRow>(
            r#"
            UPDATE patients
            SET full_name = $2, date_of_birth = $3, gender = $4, patient_type = $5,
                phone_number = $6, email = $7, address = $8, medical_record_number = $9,
                emergency_contact_name = $10, emergency_contact_phone = $11,
                blood_type = $12, allergies = $13, updated_at = $14
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, full_name, date_of_birth, gender, patient_type, phone_number,
                      email, address, medical_record_number, emergency_contact_name,
                      emergency_contact_phone, blood_type, allergies, created_at,
                      updated_at, deleted_at
            "#,
        )
        .bind(patient.id.into_inner())
        .bind(&patient.full_name)
        .bind(patient.date_of_birth)
        .bind(patient.gender.as_str())
        .bind(patient.patient_type.as_str())
        .bind(&patient.phone_number)
        .bind(&patient.email)
        .bind(&patient.address)
        .bind(&patient.medical_record_number)
        .bind(&patient.emergency_contact_name)
        .bind(&patient.emergency_contact_phone)
        .bind(&patient.blood_type)
        .bind(&patient.allergies)
        .bind(patient.updated_at)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Patient::try_from)
            .transpose()?
            .ok_or_else(|| ClinicaError::not_found("Patient", patient.id))
    }

    async fn delete(&self, id: PatientId) -> ClinicaResult<bool> {
        debug!("Soft deleting patient: {}", id);

        let result = sqlx::query(
            "UPDATE patients SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.into_inner())
        .execute(self.pool.inner())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> ClinicaResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM patients WHERE deleted_at IS NULL")
                .fetch_one(self.pool.inner())
                .await?;

        Ok(count as u64)
    }
}

impl std::fmt::Debug for PgPatientRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgPatientRepository").finish_non_exhaustive()
    }
}
