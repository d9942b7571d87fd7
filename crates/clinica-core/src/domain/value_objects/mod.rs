//! Domain value objects.

mod gender;
mod patient_type;

pub use gender::Gender;
pub use patient_type::PatientType;
