//! # Clinica Repository
//!
//! Durable-storage layer for the Clinica backend:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn PatientRepository> / Arc<dyn UserRepository>
//! PgPatientRepository / PgUserRepository   (PostgreSQL via SQLx)
//!   ↓
//! PostgreSQL
//! ```
//!
//! Repositories own the persistent records outright: nothing above this layer
//! mutates rows directly, and the cache layer only ever holds derived copies.

pub mod pool;
pub mod postgres;
pub mod traits;

pub use pool::DatabasePool;
pub use postgres::*;
pub use traits::*;
