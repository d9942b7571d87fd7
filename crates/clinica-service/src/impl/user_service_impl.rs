//! User service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface, DEFAULT_ENTRY_TTL, DEFAULT_LIST_TTL};
use crate::user_service::UserService;
use async_trait::async_trait;
use clinica_core::{ClinicaError, ClinicaResult, Page, PageRequest, User, UserId};
use clinica_repository::{UserFilter, UserRepository};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Cache-aside user service.
///
/// Users are cached by identifier only. Email lookups always hit the
/// repository and then refresh the identifier-keyed entry, so invalidation
/// never needs to know the old email address.
///
/// Note that `password_hash` is skipped during serialization, so a cache hit
/// yields a user with an empty hash. Credential checks must load through the
/// repository.
pub struct UserServiceImpl<R: UserRepository> {
    repository: Arc<R>,
    cache: Arc<dyn CacheInterface>,
    entry_ttl: Duration,
    list_ttl: Duration,
}

impl<R: UserRepository> UserServiceImpl<R> {
    /// Creates a new user service with the default TTLs.
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheInterface>) -> Self {
        Self {
            repository,
            cache,
            entry_ttl: DEFAULT_ENTRY_TTL,
            list_ttl: DEFAULT_LIST_TTL,
        }
    }

    /// Creates a user service with custom TTLs.
    pub fn with_ttls(
        repository: Arc<R>,
        cache: Arc<dyn CacheInterface>,
        entry_ttl: Duration,
        list_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            entry_ttl,
            list_ttl,
        }
    }

    /// Drops the cached entry for one user along with every listing page.
    async fn invalidate(&self, id: UserId) {
        if let Err(e) = self.cache.delete(&cache_keys::user_by_id(id)).await {
            warn!("Failed to invalidate cached user {}: {}", id, e);
        }
        self.invalidate_lists().await;
    }

    /// Drops every cached listing page.
    async fn invalidate_lists(&self) {
        if let Err(e) = self
            .cache
            .delete_pattern(&cache_keys::user_list_pattern())
            .await
        {
            warn!("Failed to invalidate cached user listings: {}", e);
        }
    }
}

#[async_trait]
impl<R: UserRepository + 'static> UserService for UserServiceImpl<R> {
    async fn create_user(&self, user: User) -> ClinicaResult<User> {
        debug!("Creating user: {}", user.email);

        // Friendlier message than the constraint violation, but the unique
        // index still backstops concurrent creates.
        if self.repository.find_by_email(&user.email).await?.is_some() {
            return Err(ClinicaError::conflict(format!(
                "Email '{}' already exists",
                user.email
            )));
        }

        let created = self.repository.create(&user).await?;

        self.invalidate_lists().await;

        info!("User created: {}", created.id);
        Ok(created)
    }

    async fn get_user(&self, id: UserId) -> ClinicaResult<User> {
        debug!("Getting user: {}", id);

        let cache_key = cache_keys::user_by_id(id);
        match self.cache.get::<User>(&cache_key).await {
            Ok(Some(user)) => {
                debug!("Cache hit for user: {}", id);
                return Ok(user);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for key '{}': {}", cache_key, e),
        }

        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ClinicaError::not_found("User", id))?;

        if let Err(e) = self.cache.set(&cache_key, &user, self.entry_ttl).await {
            warn!("Failed to cache user {}: {}", id, e);
        }

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> ClinicaResult<User> {
        debug!("Getting user by email: {}", email);

        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| ClinicaError::not_found("User", email))?;

        if let Err(e) = self
            .cache
            .set(&cache_keys::user_by_id(user.id), &user, self.entry_ttl)
            .await
        {
            warn!("Failed to cache user {}: {}", user.id, e);
        }

        Ok(user)
    }

    async fn list_users(&self, page: PageRequest, filter: UserFilter) -> ClinicaResult<Page<User>> {
        debug!(
            "Listing users, page: {}, per_page: {}",
            page.page, page.per_page
        );

        let cache_key = cache_keys::user_list(&page, &filter);
        match self.cache.get::<Page<User>>(&cache_key).await {
            Ok(Some(listing)) => {
                debug!("Cache hit for user listing");
                return Ok(listing);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for key '{}': {}", cache_key, e),
        }

        let listing = self.repository.find_all(page, &filter).await?;

        if let Err(e) = self.cache.set(&cache_key, &listing, self.list_ttl).await {
            warn!("Failed to cache user listing: {}", e);
        }

        Ok(listing)
    }

    async fn update_user(&self, id: UserId, mut user: User) -> ClinicaResult<User> {
        debug!("Updating user: {}", id);

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ClinicaError::not_found("User", id))?;

        user.preserve_identity(&existing);
        let updated = self.repository.update(&user).await?;

        self.invalidate(id).await;

        info!("User updated: {}", id);
        Ok(updated)
    }

    async fn delete_user(&self, id: UserId) -> ClinicaResult<()> {
        debug!("Deleting user: {}", id);

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(ClinicaError::not_found("User", id));
        }

        self.invalidate(id).await;

        info!("User deleted: {}", id);
        Ok(())
    }

    async fn count_users(&self) -> ClinicaResult<u64> {
        self.repository.count().await
    }
}

impl<R: UserRepository> std::fmt::Debug for UserServiceImpl<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl")
            .field("entry_ttl", &self.entry_ttl)
            .field("list_ttl", &self.list_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        Cache {}

        #[async_trait]
        impl CacheInterface for Cache {
            async fn get_raw(&self, key: &str) -> ClinicaResult<Option<String>>;
            async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> ClinicaResult<()>;
            async fn delete(&self, key: &str) -> ClinicaResult<bool>;
            async fn delete_pattern(&self, pattern: &str) -> ClinicaResult<u64>;
            async fn close(&self) -> ClinicaResult<()>;
            fn is_enabled(&self) -> bool;
        }
    }

    mock! {
        UserRepo {}

        #[async_trait]
        impl UserRepository for UserRepo {
            async fn create(&self, user: &User) -> ClinicaResult<User>;
            async fn find_by_id(&self, id: UserId) -> ClinicaResult<Option<User>>;
            async fn find_by_email(&self, email: &str) -> ClinicaResult<Option<User>>;
            async fn find_all(
                &self,
                page: PageRequest,
                filter: &UserFilter,
            ) -> ClinicaResult<Page<User>>;
            async fn update(&self, user: &User) -> ClinicaResult<User>;
            async fn delete(&self, id: UserId) -> ClinicaResult<bool>;
            async fn count(&self) -> ClinicaResult<u64>;
        }
    }

    fn sample_user(email: &str) -> User {
        User::new("Jane Roe".to_string(), email.to_string(), "hashed".to_string())
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let existing = sample_user("jane@example.com");

        let mut repo = MockUserRepo::new();
        repo.expect_find_by_email()
            .with(eq("jane@example.com"))
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_create().times(0);

        let mut cache = MockCache::new();
        cache.expect_delete_pattern().times(0);

        let service = UserServiceImpl::new(Arc::new(repo), Arc::new(cache));
        let result = service.create_user(sample_user("jane@example.com")).await;
        assert!(matches!(result, Err(ClinicaError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_email_lookup_refreshes_id_entry() {
        let user = sample_user("jane@example.com");
        let id = user.id;
        let found = user.clone();

        let mut repo = MockUserRepo::new();
        repo.expect_find_by_email()
            .with(eq("jane@example.com"))
            .return_once(move |_| Ok(Some(found)));

        let mut cache = MockCache::new();
        cache
            .expect_set_raw()
            .withf(move |key, _, _| key == cache_keys::user_by_id(id))
            .times(1)
            .return_once(|_, _, _| Ok(()));

        let service = UserServiceImpl::new(Arc::new(repo), Arc::new(cache));
        let fetched = service.get_user_by_email("jane@example.com").await.unwrap();
        assert_eq!(fetched.id, user.id);
    }

    #[tokio::test]
    async fn test_delete_invalidates_entry_and_listing_pattern() {
        let id = UserId::new();

        let mut repo = MockUserRepo::new();
        repo.expect_delete().with(eq(id)).return_once(|_| Ok(true));

        let mut cache = MockCache::new();
        cache
            .expect_delete()
            .withf(move |key| key == cache_keys::user_by_id(id))
            .times(1)
            .return_once(|_| Ok(true));
        cache
            .expect_delete_pattern()
            .withf(|pattern| pattern == cache_keys::user_list_pattern())
            .times(1)
            .return_once(|_| Ok(1));

        let service = UserServiceImpl::new(Arc::new(repo), Arc::new(cache));
        service.delete_user(id).await.unwrap();
    }
}
