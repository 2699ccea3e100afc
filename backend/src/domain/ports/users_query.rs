//! Driving port for user listing.
//!
//! Inbound adapters (HTTP handlers) use this port to read the directory
//! without importing outbound persistence concerns.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Error, User, UserListRequest};

/// Domain use-case port for listing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return one page of users matching the request filter.
    async fn list_users(&self, request: &UserListRequest) -> Result<Page<User>, Error>;
}
