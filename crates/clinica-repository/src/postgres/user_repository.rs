//! PostgreSQL user repository implementation.

use crate::{traits::UserRepository, DatabasePool, UserFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clinica_core::{ClinicaError, ClinicaResult, Page, PageRequest, User, UserId};
use sqlx::{FromRow, Postgres, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL user repository.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Arc<DatabasePool>,
}

impl PgUserRepository {
    /// Creates a new PostgreSQL user repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: uuid::Uuid,
    full_name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            full_name: row.full_name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        builder.push(" AND (full_name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR email ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> ClinicaResult<User> {
        debug!("Creating user: {}", user.id);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, full_name, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, full_name, email, password_hash, created_at, updated_at, deleted_at
            "#,
        )
        .bind(user.id.into_inner())
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(User::from(row))
    }

    async fn find_by_id(&self, id: UserId) -> ClinicaResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, full_name, email, password_hash, created_at, updated_at, deleted_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> ClinicaResult<Option<User>> {
        debug!("Finding user by email: {}", email);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, full_name, email, password_hash, created_at, updated_at, deleted_at
            FROM users
            WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_all(&self, page: PageRequest, filter: &UserFilter) -> ClinicaResult<Page<User>> {
        debug!(
            "Finding users, page: {}, per_page: {}, filter: {:?}",
            page.page, page.per_page, filter
        );

        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL");
        push_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(self.pool.inner())
            .await?;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT id, full_name, email, password_hash, created_at, updated_at, \
             deleted_at FROM users WHERE deleted_at IS NULL",
        );
        push_filters(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(page.limit() as i64);
        builder.push(" OFFSET ");
        builder.push_bind(page.offset() as i64);

        let rows: Vec<UserRow> = builder
            .build_query_as()
            .fetch_all(self.pool.inner())
            .await?;

        let users: Vec<User> = rows.into_iter().map(User::from).collect();

        Ok(Page::new(users, page.page, page.per_page, total as u64))
    }

    async fn update(&self, user: &User) -> ClinicaResult<User> {
        debug!("Updating user: {}", user.id);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET full_name = $2, email = $3, password_hash = $4, updated_at = $5
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, full_name, email, password_hash, created_at, updated_at, deleted_at
            "#,
        )
        .bind(user.id.into_inner())
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(User::from)
            .ok_or_else(|| ClinicaError::not_found("User", user.id))
    }

    async fn delete(&self, id: UserId) -> ClinicaResult<bool> {
        debug!("Soft deleting user: {}", id);

        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.into_inner())
        .execute(self.pool.inner())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> ClinicaResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(count as u64)
    }
}

impl std::fmt::Debug for PgUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgUserRepository").finish_non_exhaustive()
    }
}
