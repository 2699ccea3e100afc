//! Readiness check against the backing store.

use async_trait::async_trait;

use super::UserPersistenceError;

/// Cheap round trip used by readiness probes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageProbe: Send + Sync {
    /// Succeeds when the store answers a trivial query.
    async fn ping(&self) -> Result<(), UserPersistenceError>;
}
