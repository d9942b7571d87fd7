//! # Clinica Config
//!
//! Layered configuration loading for the Clinica backend.

pub mod app_config;
pub mod loader;
pub mod telemetry;

pub use app_config::*;
pub use loader::*;
pub use telemetry::init_tracing;
