//! User service trait definition.

use async_trait::async_trait;
use clinica_core::{ClinicaResult, Page, PageRequest, User, UserId};
use clinica_repository::UserFilter;

/// User service trait.
///
/// Same cache-aside discipline as [`crate::PatientService`]: reads may be
/// served from cache, writes always hit the repository and invalidate.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Creates a new user. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, user: User) -> ClinicaResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: UserId) -> ClinicaResult<User>;

    /// Gets a user by email.
    async fn get_user_by_email(&self, email: &str) -> ClinicaResult<User>;

    /// Lists users matching the filter, with pagination.
    async fn list_users(&self, page: PageRequest, filter: UserFilter) -> ClinicaResult<Page<User>>;

    /// Updates a user's record. The stored identifier and creation time are
    /// kept regardless of what the incoming record carries.
    async fn update_user(&self, id: UserId, user: User) -> ClinicaResult<User>;

    /// Soft-deletes a user.
    async fn delete_user(&self, id: UserId) -> ClinicaResult<()>;

    /// Counts all users.
    async fn count_users(&self) -> ClinicaResult<u64>;
}
