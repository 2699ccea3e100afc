//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cfg(test)` and the `test-support` feature only.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{StorageProbe, UserPersistenceError, UserRepository};
use crate::domain::{User, UserChanges, UserFilter, UserId};

/// In-memory user store honouring the repository contract: insertion order,
/// email uniqueness and filter semantics.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored user, in insertion order.
    pub fn snapshot(&self) -> Vec<User> {
        self.lock().map(|users| users.clone()).unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<User>>, UserPersistenceError> {
        self.users
            .lock()
            .map_err(|_| UserPersistenceError::query("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.lock()?;
        if users.iter().any(|existing| existing.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_page(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let users = self.lock()?;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(users
            .iter()
            .filter(|user| filter.matches(user))
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, UserPersistenceError> {
        let users = self.lock()?;
        let total = users.iter().filter(|user| filter.matches(user)).count();
        Ok(u64::try_from(total).unwrap_or(u64::MAX))
    }

    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut users = self.lock()?;
        if let Some(email) = &changes.email
            && users
                .iter()
                .any(|user| user.id() != id && user.email() == email)
        {
            return Err(UserPersistenceError::duplicate_email(email.as_ref()));
        }
        let Some(user) = users.iter_mut().find(|user| user.id() == id) else {
            return Ok(None);
        };
        user.apply(changes, updated_at);
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut users = self.lock()?;
        let before = users.len();
        users.retain(|user| user.id() != id);
        Ok(users.len() != before)
    }
}

#[async_trait]
impl StorageProbe for InMemoryUserRepository {
    async fn ping(&self) -> Result<(), UserPersistenceError> {
        self.lock().map(|_| ())
    }
}

/// Clock whose time only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}
