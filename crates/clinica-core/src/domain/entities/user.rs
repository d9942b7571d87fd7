//! User entity.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Staff user account.
///
/// The email address is unique across users. As with [`super::Patient`], the
/// identifier and creation timestamp never change after the first write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,

    /// User's full name.
    pub full_name: String,

    /// Unique email address.
    pub email: String,

    /// Hashed password (never exposed via API).
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,

    /// Soft-delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new user.
    #[must_use]
    pub fn new(full_name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            full_name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Returns true if the account has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Stamps the immutable fields of `existing` onto this record and
    /// refreshes `updated_at`.
    pub fn preserve_identity(&mut self, existing: &Self) {
        self.id = existing.id;
        self.created_at = existing.created_at;
        self.updated_at = Utc::now();
    }
}
