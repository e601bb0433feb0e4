use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tenantry_core::{StoreError, StoreResult, TaskRecord};

use crate::persistent::PersistentStore;

const LOCATION: &str = ":memory:";

/// Transient backend holding the record collection in process memory.
///
/// Suitable for tests and local development; everything is lost when the
/// process exits. Clones share the same collection.
///
/// Writes can be switched to fail with [`InMemoryStore::fail_writes`], which
/// lets tests exercise the error paths of the [`TaskStore`](crate::TaskStore)
/// without touching the filesystem.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<Vec<TaskRecord>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`.
    pub fn with_records(records: Vec<TaskRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            fail_writes: Arc::default(),
        }
    }

    /// Make every subsequent `write_all` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn poisoned(e: impl std::fmt::Display) -> StoreError {
        StoreError::io(LOCATION, std::io::Error::other(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl PersistentStore for InMemoryStore {
    async fn read_all(&self) -> StoreResult<Vec<TaskRecord>> {
        let records = self.records.read().map_err(Self::poisoned)?;
        Ok(records.clone())
    }

    async fn write_all(&self, records: &[TaskRecord]) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::io(
                LOCATION,
                std::io::Error::other("simulated write failure"),
            ));
        }
        let mut stored = self.records.write().map_err(Self::poisoned)?;
        *stored = records.to_vec();
        Ok(())
    }

    fn location(&self) -> &Path {
        Path::new(LOCATION)
    }
}
