//! # Clinica Service
//!
//! Cache-aside service layer for the Clinica backend. Each entity type gets
//! one caching service composed from a persistent repository and the shared
//! cache port; the services own all cache/store consistency decisions.

pub mod cache;
pub mod container;
pub mod r#impl;
pub mod patient_service;
pub mod user_service;

pub use cache::*;
pub use container::*;
pub use patient_service::*;
pub use r#impl::*;
pub use user_service::*;
