//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{User, UserChanges, UserFilter, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another record already holds the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Storage for user records.
///
/// Implementations must enforce email uniqueness atomically and return
/// records in insertion order (`created_at`, then `id`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch up to `limit` matching users starting at `offset`.
    async fn find_page(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<User>, UserPersistenceError>;

    /// Count users matching the filter.
    async fn count(&self, filter: &UserFilter) -> Result<u64, UserPersistenceError>;

    /// Apply changes and stamp `updated_at`, returning the stored record.
    ///
    /// Returns `Ok(None)` when no user has the identifier.
    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Remove a user, reporting whether a record was deleted.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
