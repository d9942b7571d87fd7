//! PostgreSQL repository implementations.

mod patient_repository;
mod user_repository;

pub use patient_repository::PgPatientRepository;
pub use user_repository::PgUserRepository;
