//! Service implementations.

mod patient_service_impl;
mod user_service_impl;

pub use patient_service_impl::PatientServiceImpl;
pub use user_service_impl::UserServiceImpl;
