use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tenantry_core::{StoreResult, TaskRecord};

/// Durable storage of the full record collection as a single unit.
///
/// Implementations do no locking of their own across calls: callers (the
/// [`TaskStore`](crate::TaskStore)) serialize access so that a `read_all`
/// never races a `write_all` on the same backend.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Return every stored record in storage order.
    ///
    /// Returns an empty collection when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// [`StoreError::Corrupt`](tenantry_core::StoreError::Corrupt) if existing
    /// content cannot be parsed, [`StoreError::Io`](tenantry_core::StoreError::Io)
    /// if it cannot be read.
    async fn read_all(&self) -> StoreResult<Vec<TaskRecord>>;

    /// Replace the stored collection with `records`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`](tenantry_core::StoreError::Io) if the write fails.
    /// The previous content is not guaranteed to survive a failed write.
    async fn write_all(&self, records: &[TaskRecord]) -> StoreResult<()>;

    /// Where the records live, for log fields and error messages.
    fn location(&self) -> &Path;
}

#[async_trait]
impl<P: PersistentStore + ?Sized> PersistentStore for Arc<P> {
    async fn read_all(&self) -> StoreResult<Vec<TaskRecord>> {
        (**self).read_all().await
    }

    async fn write_all(&self, records: &[TaskRecord]) -> StoreResult<()> {
        (**self).write_all(records).await
    }

    fn location(&self) -> &Path {
        (**self).location()
    }
}
