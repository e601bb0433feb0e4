use std::sync::Arc;
use std::time::Duration;

use tenantry_core::{
    Description, StoreError, StoreResult, TaskId, TaskRecord, TenantId, UpdateOutcome,
};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::persistent::PersistentStore;

/// Tenant-aware store of task records.
///
/// `TaskStore` is the only component that mutates its backend. It keeps no
/// cached collection: every operation re-reads the backend, and mutations
/// write the whole collection back before releasing the lock.
///
/// # Locking
///
/// A single reader/writer lock guards the backend:
///
/// - `add` and `update` hold the exclusive half for their whole
///   read-modify-write cycle, so at most one mutation runs at a time.
/// - `list_by_tenant` and `get` hold the shared half, so reads run
///   concurrently with each other but never overlap a write.
///
/// Guards are scoped, so the lock is released on every exit path including
/// storage failures. Dropping an operation's future before it acquires the
/// lock leaves storage untouched. An optional acquisition timeout turns
/// long waits into [`StoreError::LockTimeout`].
pub struct TaskStore {
    backend: Arc<dyn PersistentStore>,
    lock: RwLock<()>,
    lock_timeout: Option<Duration>,
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("location", &self.backend.location())
            .field("lock_timeout", &self.lock_timeout)
            .finish()
    }
}

impl TaskStore {
    /// Wrap a backend. Lock acquisition waits indefinitely.
    pub fn new(backend: impl PersistentStore + 'static) -> Self {
        Self::from_shared(Arc::new(backend))
    }

    /// Wrap an already shared backend.
    pub fn from_shared(backend: Arc<dyn PersistentStore>) -> Self {
        Self {
            backend,
            lock: RwLock::new(()),
            lock_timeout: None,
        }
    }

    /// Fail operations that cannot acquire the lock within `timeout`.
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    async fn exclusive(&self) -> StoreResult<RwLockWriteGuard<'_, ()>> {
        match self.lock_timeout {
            None => Ok(self.lock.write().await),
            Some(timeout) => tokio::time::timeout(timeout, self.lock.write())
                .await
                .map_err(|_| {
                    tracing::warn!(?timeout, "Timed out acquiring exclusive store lock");
                    StoreError::LockTimeout(timeout)
                }),
        }
    }

    async fn shared(&self) -> StoreResult<RwLockReadGuard<'_, ()>> {
        match self.lock_timeout {
            None => Ok(self.lock.read().await),
            Some(timeout) => tokio::time::timeout(timeout, self.lock.read())
                .await
                .map_err(|_| {
                    tracing::warn!(?timeout, "Timed out acquiring shared store lock");
                    StoreError::LockTimeout(timeout)
                }),
        }
    }

    /// Create and persist a new record owned by `tenant`.
    ///
    /// The id and creation timestamp are assigned before the lock is taken.
    /// Either the record is durably stored when this returns `Ok`, or the
    /// error is returned and the record must be considered not created.
    ///
    /// # Errors
    ///
    /// Propagates storage failures from the backend and lock timeouts.
    pub async fn add(&self, description: Description, tenant: TenantId) -> StoreResult<TaskRecord> {
        let record = TaskRecord::new(description, tenant);

        let _guard = self.exclusive().await?;
        let mut records = self.backend.read_all().await?;
        records.push(record.clone());
        self.backend.write_all(&records).await.inspect_err(|e| {
            tracing::error!(
                tenant = %record.tenant_id(),
                id = %record.id(),
                error = %e,
                "Failed to persist new task"
            );
        })?;

        tracing::debug!(
            tenant = %record.tenant_id(),
            id = %record.id(),
            total = records.len(),
            "Added task"
        );
        Ok(record)
    }

    /// Every record owned by `tenant`, in storage (append) order.
    ///
    /// # Errors
    ///
    /// Propagates storage read failures and lock timeouts.
    pub async fn list_by_tenant(&self, tenant: &TenantId) -> StoreResult<Vec<TaskRecord>> {
        let _guard = self.shared().await?;
        let records: Vec<TaskRecord> = self
            .backend
            .read_all()
            .await?
            .into_iter()
            .filter(|r| r.is_owned_by(tenant))
            .collect();

        tracing::debug!(tenant = %tenant, count = records.len(), "Listed tasks");
        Ok(records)
    }

    /// Look up a record by id regardless of tenant.
    ///
    /// # Errors
    ///
    /// Propagates storage read failures and lock timeouts.
    pub async fn get(&self, id: &TaskId) -> StoreResult<Option<TaskRecord>> {
        let _guard = self.shared().await?;
        let records = self.backend.read_all().await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    /// Replace the description of record `id` if it exists and belongs to
    /// `tenant`.
    ///
    /// Existence is checked before ownership: an unknown id is
    /// [`UpdateOutcome::NotFound`] whichever tenant asks, and only an existing
    /// record owned by someone else is [`UpdateOutcome::NotOwned`]. Nothing is
    /// written unless the outcome is [`UpdateOutcome::Updated`].
    ///
    /// # Errors
    ///
    /// Propagates storage failures from the backend and lock timeouts.
    pub async fn update(
        &self,
        tenant: &TenantId,
        id: &TaskId,
        description: Description,
    ) -> StoreResult<UpdateOutcome> {
        let _guard = self.exclusive().await?;
        let mut records = self.backend.read_all().await?;

        let Some(index) = records.iter().position(|r| r.id() == id) else {
            tracing::debug!(tenant = %tenant, id = %id, "Update target not found");
            return Ok(UpdateOutcome::NotFound);
        };

        if !records[index].is_owned_by(tenant) {
            tracing::warn!(
                tenant = %tenant,
                owner = %records[index].tenant_id(),
                id = %id,
                "Rejected update of task owned by another tenant"
            );
            return Ok(UpdateOutcome::NotOwned);
        }

        let updated = records[index].clone().with_description(description);
        records[index] = updated.clone();
        self.backend.write_all(&records).await.inspect_err(|e| {
            tracing::error!(tenant = %tenant, id = %id, error = %e, "Failed to persist task update");
        })?;

        tracing::debug!(tenant = %tenant, id = %id, "Updated task");
        Ok(UpdateOutcome::Updated(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;

    fn tenant(id: &str) -> TenantId {
        TenantId::parse(id).unwrap()
    }

    fn description(text: &str) -> Description {
        Description::parse(text).unwrap()
    }

    #[tokio::test]
    async fn test_list_on_empty_store_is_empty() {
        let store = TaskStore::new(InMemoryStore::new());
        assert!(store.list_by_tenant(&tenant("AnyTenant")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_then_list_returns_record() {
        let store = TaskStore::new(InMemoryStore::new());

        let created = store.add(description("first"), tenant("T1")).await.unwrap();
        let listed = store.list_by_tenant(&tenant("T1")).await.unwrap();

        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(created.description().as_str(), "first");
        assert_eq!(created.tenant_id().as_str(), "T1");
    }

    #[tokio::test]
    async fn test_list_only_returns_callers_records_in_append_order() {
        let store = TaskStore::new(InMemoryStore::new());

        let a1 = store.add(description("a1"), tenant("A")).await.unwrap();
        store.add(description("b1"), tenant("B")).await.unwrap();
        let a2 = store.add(description("a2"), tenant("A")).await.unwrap();
        store.add(description("b2"), tenant("B")).await.unwrap();

        let listed = store.list_by_tenant(&tenant("A")).await.unwrap();
        assert_eq!(listed, vec![a1, a2]);
        assert!(store.list_by_tenant(&tenant("C")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = TaskStore::new(InMemoryStore::new());
        store.add(description("present"), tenant("T")).await.unwrap();

        let outcome = store
            .update(&tenant("T"), &TaskId::new("does-not-exist"), description("whatever"))
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_update_foreign_record_is_not_owned_and_unchanged() {
        let store = TaskStore::new(InMemoryStore::new());
        let record = store.add(description("orig"), tenant("T1")).await.unwrap();

        let outcome = store
            .update(&tenant("T2"), record.id(), description("hijacked"))
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NotOwned);

        let stored = store.get(record.id()).await.unwrap().unwrap();
        assert_eq!(stored.description().as_str(), "orig");
    }

    #[tokio::test]
    async fn test_update_own_record_replaces_description_only() {
        let store = TaskStore::new(InMemoryStore::new());
        let record = store.add(description("orig"), tenant("T1")).await.unwrap();

        let outcome = store
            .update(&tenant("T1"), record.id(), description("newdesc"))
            .await
            .unwrap();
        let UpdateOutcome::Updated(updated) = outcome else {
            panic!("expected Updated, got {outcome:?}");
        };

        assert_eq!(updated.description().as_str(), "newdesc");
        assert_eq!(updated.id(), record.id());
        assert_eq!(updated.created_at(), record.created_at());
        assert_eq!(updated.tenant_id(), record.tenant_id());

        let listed = store.list_by_tenant(&tenant("T1")).await.unwrap();
        assert_eq!(listed, vec![updated]);
    }

    #[tokio::test]
    async fn test_failed_add_is_not_stored_and_releases_lock() {
        let backend = InMemoryStore::new();
        let store = TaskStore::new(backend.clone()).with_lock_timeout(Duration::from_secs(1));

        backend.fail_writes(true);
        let err = store.add(description("lost"), tenant("T")).await.unwrap_err();
        assert!(err.is_storage_failure());

        backend.fail_writes(false);
        assert!(store.list_by_tenant(&tenant("T")).await.unwrap().is_empty());
        store.add(description("kept"), tenant("T")).await.unwrap();
        assert_eq!(store.list_by_tenant(&tenant("T")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_update_releases_lock() {
        let backend = InMemoryStore::new();
        let store = TaskStore::new(backend.clone()).with_lock_timeout(Duration::from_secs(1));
        let record = store.add(description("orig"), tenant("T")).await.unwrap();

        backend.fail_writes(true);
        assert!(
            store
                .update(&tenant("T"), record.id(), description("next"))
                .await
                .is_err()
        );

        backend.fail_writes(false);
        let outcome = store
            .update(&tenant("T"), record.id(), description("next"))
            .await
            .unwrap();
        assert!(outcome.is_updated());
    }

    #[tokio::test]
    async fn test_lock_timeout_while_mutation_in_flight() {
        let store = TaskStore::new(InMemoryStore::new()).with_lock_timeout(Duration::from_millis(20));

        let _held = store.lock.write().await;
        let err = store.add(description("blocked"), tenant("T")).await.unwrap_err();
        assert!(matches!(err, StoreError::LockTimeout(_)));

        let err = store.list_by_tenant(&tenant("T")).await.unwrap_err();
        assert!(matches!(err, StoreError::LockTimeout(_)));
    }

    #[tokio::test]
    async fn test_cancelled_add_before_lock_does_not_mutate() {
        let store = TaskStore::new(InMemoryStore::new());

        {
            let _held = store.lock.write().await;
            let pending = store.add(description("cancelled"), tenant("T"));
            // The future is dropped while still waiting for the lock.
            let result =
                tokio::time::timeout(Duration::from_millis(10), pending).await;
            assert!(result.is_err());
        }

        assert!(store.list_by_tenant(&tenant("T")).await.unwrap().is_empty());
    }
}
