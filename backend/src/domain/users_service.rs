//! User directory domain service.
//!
//! Implements the [`UsersQuery`] and [`UsersCommand`] driving ports on top of
//! a [`UserRepository`], translating persistence failures into domain errors.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::user_changes::EMPTY_UPDATE_MESSAGE;
use crate::domain::{Error, User, UserChanges, UserId, UserListRequest, UserProfile};

/// Conflict message when a new user reuses an email.
pub const EMAIL_TAKEN_MESSAGE: &str = "Email này đã tồn tại!";
/// Conflict message when an update moves onto another user's email.
pub const EMAIL_COLLISION_MESSAGE: &str = "Email mới bị trùng với người khác!";
/// Not-found message for updates.
pub const USER_NOT_FOUND_MESSAGE: &str = "Không tìm thấy người dùng";
/// Not-found message for deletions.
pub const DELETE_NOT_FOUND_MESSAGE: &str = "Không tìm thấy người dùng để xóa";

fn map_persistence_error(error: UserPersistenceError) -> Error {
    Error::internal(format!("Lỗi Server: {error}"))
}

fn duplicate_email(message: &str) -> Error {
    Error::conflict(message).with_details(json!({
        "field": "email",
        "code": "duplicate_email",
    }))
}

/// User service implementing both query and command ports.
#[derive(Clone)]
pub struct UsersService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> UsersService<R> {
    /// Create a service over a repository and a time source.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

#[async_trait]
impl<R> UsersQuery for UsersService<R>
where
    R: UserRepository,
{
    async fn list_users(&self, request: &UserListRequest) -> Result<Page<User>, Error> {
        let page = request.page;
        let (users, total) = tokio::try_join!(
            self.repository
                .find_page(&request.filter, page.offset(), page.limit()),
            self.repository.count(&request.filter),
        )
        .map_err(|err| {
            error!(error = %err, "listing users failed");
            map_persistence_error(err)
        })?;
        Ok(Page::new(page, total, users))
    }
}

#[async_trait]
impl<R> UsersCommand for UsersService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, profile: UserProfile) -> Result<User, Error> {
        let user = User::create(UserId::random(), profile, self.clock.utc());
        match self.repository.insert(&user).await {
            Ok(()) => {
                info!(user_id = %user.id(), "user created");
                Ok(user)
            }
            Err(UserPersistenceError::DuplicateEmail { email }) => {
                warn!(%email, "rejected user with duplicate email");
                Err(duplicate_email(EMAIL_TAKEN_MESSAGE))
            }
            Err(err) => {
                error!(error = %err, "creating user failed");
                Err(map_persistence_error(err))
            }
        }
    }

    async fn update_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error> {
        if changes.is_empty() {
            return Err(Error::invalid_request(EMPTY_UPDATE_MESSAGE));
        }
        match self.repository.update(id, &changes, self.clock.utc()).await {
            Ok(Some(user)) => {
                info!(user_id = %id, "user updated");
                Ok(user)
            }
            Ok(None) => Err(Error::not_found(USER_NOT_FOUND_MESSAGE)),
            Err(UserPersistenceError::DuplicateEmail { email }) => {
                warn!(user_id = %id, %email, "rejected update onto existing email");
                Err(duplicate_email(EMAIL_COLLISION_MESSAGE))
            }
            Err(err) => {
                error!(user_id = %id, error = %err, "updating user failed");
                Err(map_persistence_error(err))
            }
        }
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        let deleted = self.repository.delete(id).await.map_err(|err| {
            error!(user_id = %id, error = %err, "deleting user failed");
            map_persistence_error(err)
        })?;
        if !deleted {
            return Err(Error::not_found(DELETE_NOT_FOUND_MESSAGE));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "users_service_tests.rs"]
mod tests;
