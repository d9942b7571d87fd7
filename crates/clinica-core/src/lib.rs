//! # Clinica Core
//!
//! Core types, error taxonomy, and domain entities for the Clinica backend.
//! Everything in the data-access stack builds on the abstractions defined here.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
