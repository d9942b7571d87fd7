//! Cache key construction.
//!
//! All keys live under a single prefix so pattern deletes can never touch
//! foreign data in a shared Redis instance. List keys encode every paging and
//! filter dimension; the field order is fixed and separators never appear in
//! the encoded values, so distinct queries always produce distinct keys.

use clinica_core::{PageRequest, PatientId, UserId};
use clinica_repository::{PatientFilter, UserFilter};

/// Prefix applied to every key written by this crate.
pub const CACHE_PREFIX: &str = "clinica:cache";

/// Key for a single patient by id.
#[must_use]
pub fn patient_by_id(id: PatientId) -> String {
    format!("{CACHE_PREFIX}:patients:id:{id}")
}

/// Key for one page of a patient listing.
#[must_use]
pub fn patient_list(page: &PageRequest, filter: &PatientFilter) -> String {
    let search = filter.search.as_deref().unwrap_or("");
    let gender = filter.gender.map(|g| g.as_str()).unwrap_or("");
    let patient_type = filter.patient_type.map(|t| t.as_str()).unwrap_or("");
    format!(
        "{CACHE_PREFIX}:patients:list:{}:{}:{search}:{gender}:{patient_type}",
        page.page, page.per_page
    )
}

/// Pattern matching every cached patient listing page.
#[must_use]
pub fn patient_list_pattern() -> String {
    format!("{CACHE_PREFIX}:patients:list:*")
}

/// Key for a single user by id.
#[must_use]
pub fn user_by_id(id: UserId) -> String {
    format!("{CACHE_PREFIX}:users:id:{id}")
}

/// Key for one page of a user listing.
#[must_use]
pub fn user_list(page: &PageRequest, filter: &UserFilter) -> String {
    let search = filter.search.as_deref().unwrap_or("");
    format!(
        "{CACHE_PREFIX}:users:list:{}:{}:{search}",
        page.page, page.per_page
    )
}

/// Pattern matching every cached user listing page.
#[must_use]
pub fn user_list_pattern() -> String {
    format!("{CACHE_PREFIX}:users:list:*")
}
