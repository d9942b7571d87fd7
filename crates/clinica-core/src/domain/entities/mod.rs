//! Domain entities.

mod patient;
mod user;

pub use patient::Patient;
pub use user::User;
