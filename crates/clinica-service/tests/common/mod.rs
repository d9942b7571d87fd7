//! Shared test fixtures: in-memory repositories with call counters and a
//! recording cache, so the service tests can assert how many times each
//! backend was touched without a running database or Redis.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use clinica_core::{
    ClinicaError, ClinicaResult, Gender, Page, PageRequest, Patient, PatientId, PatientType, User,
    UserId,
};
use clinica_repository::{PatientFilter, PatientRepository, UserFilter, UserRepository};
use clinica_service::CacheInterface;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory cache that records every operation.
///
/// TTLs are accepted and ignored; entries live until deleted. Reads and
/// writes can be made to fail independently to exercise the degraded paths.
#[derive(Default)]
pub struct RecordingCache {
    entries: Mutex<HashMap<String, String>>,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub deletes: AtomicUsize,
    pub pattern_deletes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent read fail.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent write and invalidation fail.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the exact key is cached.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    fn matches(key: &str, pattern: &str) -> bool {
        match pattern.strip_suffix('*') {
            Some(prefix) => key.starts_with(prefix),
            None => key == pattern,
        }
    }
}

#[async_trait]
impl CacheInterface for RecordingCache {
    async fn get_raw(&self, key: &str) -> ClinicaResult<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClinicaError::cache("simulated read failure"));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: &str, _ttl: Duration) -> ClinicaResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClinicaError::cache("simulated write failure"));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> ClinicaResult<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClinicaError::cache("simulated write failure"));
        }
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn delete_pattern(&self, pattern: &str) -> ClinicaResult<u64> {
        self.pattern_deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClinicaError::cache("simulated write failure"));
        }
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|key, _| !Self::matches(key, pattern));
        Ok((before - entries.len()) as u64)
    }

    async fn close(&self) -> ClinicaResult<()> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// In-memory patient repository with per-operation call counters.
#[derive(Default)]
pub struct InMemoryPatientRepository {
    patients: Mutex<HashMap<PatientId, Patient>>,
    pub finds: AtomicUsize,
    pub lists: AtomicUsize,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(patient: &Patient, filter: &PatientFilter) -> bool {
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let haystacks = [
                Some(patient.full_name.as_str()),
                Some(patient.phone_number.as_str()),
                patient.email.as_deref(),
                patient.medical_record_number.as_deref(),
            ];
            if !haystacks
                .iter()
                .flatten()
                .any(|h| h.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        if let Some(gender) = filter.gender {
            if patient.gender != gender {
                return false;
            }
        }
        if let Some(patient_type) = filter.patient_type {
            if patient.patient_type != patient_type {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn create(&self, patient: &Patient) -> ClinicaResult<Patient> {
        let mut patients = self.patients.lock().unwrap();
        if let Some(mrn) = patient.medical_record_number.as_deref() {
            let taken = patients
                .values()
                .filter(|p| !p.is_deleted())
                .any(|p| p.medical_record_number.as_deref() == Some(mrn));
            if taken {
                return Err(ClinicaError::conflict(format!(
                    "Medical record number '{mrn}' already exists"
                )));
            }
        }
        patients.insert(patient.id, patient.clone());
        Ok(patient.clone())
    }

    async fn find_by_id(&self, id: PatientId) -> ClinicaResult<Option<Patient>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .patients
            .lock()
            .unwrap()
            .get(&id)
            .filter(|p| !p.is_deleted())
            .cloned())
    }

    async fn find_all(
        &self,
        page: PageRequest,
        filter: &PatientFilter,
    ) -> ClinicaResult<Page<Patient>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        let mut matching: Vec<Patient> = self
            .patients
            .lock()
            .unwrap()
            .values()
            .filter(|p| !p.is_deleted() && Self::matches(p, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect();
        Ok(Page::new(items, page.page, page.per_page, total))
    }

    async fn update(&self, patient: &Patient) -> ClinicaResult<Patient> {
        let mut patients = self.patients.lock().unwrap();
        match patients.get(&patient.id).filter(|p| !p.is_deleted()) {
            Some(_) => {
                patients.insert(patient.id, patient.clone());
                Ok(patient.clone())
            }
            None => Err(ClinicaError::not_found("Patient", patient.id)),
        }
    }

    async fn delete(&self, id: PatientId) -> ClinicaResult<bool> {
        let mut patients = self.patients.lock().unwrap();
        match patients.get_mut(&id).filter(|p| !p.is_deleted()) {
            Some(patient) => {
                patient.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> ClinicaResult<u64> {
        Ok(self
            .patients
            .lock()
            .unwrap()
            .values()
            .filter(|p| !p.is_deleted())
            .count() as u64)
    }
}

/// In-memory user repository with per-operation call counters.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
    pub finds: AtomicUsize,
    pub lists: AtomicUsize,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(user: &User, filter: &UserFilter) -> bool {
        match filter.search.as_deref().filter(|s| !s.is_empty()) {
            Some(search) => {
                let needle = search.to_lowercase();
                user.full_name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> ClinicaResult<User> {
        let mut users = self.users.lock().unwrap();
        let taken = users
            .values()
            .filter(|u| !u.is_deleted())
            .any(|u| u.email.eq_ignore_ascii_case(&user.email));
        if taken {
            return Err(ClinicaError::conflict(format!(
                "Email '{}' already exists",
                user.email
            )));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: UserId) -> ClinicaResult<Option<User>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&id)
            .filter(|u| !u.is_deleted())
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> ClinicaResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| !u.is_deleted())
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_all(&self, page: PageRequest, filter: &UserFilter) -> ClinicaResult<Page<User>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        let mut matching: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| !u.is_deleted() && Self::matches(u, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect();
        Ok(Page::new(items, page.page, page.per_page, total))
    }

    async fn update(&self, user: &User) -> ClinicaResult<User> {
        let mut users = self.users.lock().unwrap();
        match users.get(&user.id).filter(|u| !u.is_deleted()) {
            Some(_) => {
                users.insert(user.id, user.clone());
                Ok(user.clone())
            }
            None => Err(ClinicaError::not_found("User", user.id)),
        }
    }

    async fn delete(&self, id: UserId) -> ClinicaResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id).filter(|u| !u.is_deleted()) {
            Some(user) => {
                user.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> ClinicaResult<u64> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| !u.is_deleted())
            .count() as u64)
    }
}

/// Builds a patient with distinguishable fields.
pub fn sample_patient(name: &str) -> Patient {
    Patient::new(
        name.to_string(),
        NaiveDate::from_ymd_opt(1985, 6, 20).unwrap(),
        Gender::Female,
        PatientType::General,
        "+1-555-0199".to_string(),
    )
}

/// Builds a user with the given email.
pub fn sample_user(name: &str, email: &str) -> User {
    User::new(name.to_string(), email.to_string(), "hashed".to_string())
}
