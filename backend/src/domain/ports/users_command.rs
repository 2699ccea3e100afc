//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, User, UserChanges, UserId, UserProfile};

/// Domain use-case port for creating, updating and deleting users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create a user from a validated profile.
    async fn create_user(&self, profile: UserProfile) -> Result<User, Error>;

    /// Apply a partial update to an existing user.
    async fn update_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error>;

    /// Delete a user.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;
}
