use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tenantry_core::{StoreError, StoreResult, TaskRecord};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::persistent::PersistentStore;

/// Record collection stored as one pretty-printed JSON array in a single file.
///
/// # File Access Patterns
///
/// Every `write_all` rewrites the whole file. The new document is written to
/// a uniquely named sibling temporary file, flushed, and renamed over the
/// target, so a reader sees either the previous or the next complete array,
/// never a prefix of one.
///
/// # Concurrent File Access
///
/// `JsonFileStore` itself does not serialize callers. Wrap it in a
/// [`TaskStore`](crate::TaskStore), which does. Two stores pointed at the same
/// path in one process will not lose data to torn files, but concurrent
/// read-modify-write cycles through separate stores can overwrite each other.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Point a store at `path`. Nothing is read or created until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tasks".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()))
    }

    fn parse(&self, contents: &[u8]) -> StoreResult<Vec<TaskRecord>> {
        if contents.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let records = serde_json::from_slice::<Option<Vec<TaskRecord>>>(contents)
            .map_err(|e| {
                tracing::error!(path = ?self.path, error = %e, "Failed to parse task file");
                StoreError::corrupt(&self.path, format!("invalid task document: {e}"))
            })?
            .unwrap_or_default();

        let mut seen = HashSet::with_capacity(records.len());
        if let Some(duplicate) = records.iter().find(|r| !seen.insert(r.id().clone())) {
            tracing::error!(path = ?self.path, id = %duplicate.id(), "Duplicate task id in task file");
            return Err(StoreError::corrupt(
                &self.path,
                format!("duplicate task id '{}'", duplicate.id()),
            ));
        }

        Ok(records)
    }

    async fn write_temp(&self, tmp_path: &Path, json: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(tmp_path).await?;
        file.write_all(json).await?;
        file.sync_all().await
    }
}

/// Removes a temporary file on drop unless disarmed.
///
/// Covers error returns and futures dropped mid-write (request timeouts),
/// so abandoned `.tmp` siblings do not accumulate next to the task file.
struct TempFileGuard<'a> {
    path: Option<&'a Path>,
}

impl<'a> TempFileGuard<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path: Some(path) }
    }

    /// The file was renamed into place; leave it alone.
    fn disarm(mut self) {
        self.path = None;
    }
}

impl Drop for TempFileGuard<'_> {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            match std::fs::remove_file(path) {
                Ok(()) => tracing::debug!(path = ?path, "Removed abandoned temporary task file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(path = ?path, error = %e, "Failed to remove temporary task file"),
            }
        }
    }
}

#[async_trait]
impl PersistentStore for JsonFileStore {
    async fn read_all(&self) -> StoreResult<Vec<TaskRecord>> {
        match fs::read(&self.path).await {
            Ok(contents) => {
                let records = self.parse(&contents)?;
                tracing::debug!(path = ?self.path, records = records.len(), "Loaded task file");
                Ok(records)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = ?self.path, "Task file not found, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::error!(path = ?self.path, error = %e, "Failed to read task file");
                Err(StoreError::io(&self.path, e))
            }
        }
    }

    async fn write_all(&self, records: &[TaskRecord]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                tracing::error!(dir = ?parent, error = %e, "Failed to create task file directory");
                StoreError::io(parent, e)
            })?;
        }

        let json = serde_json::to_vec_pretty(records).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialize task records");
            StoreError::io(&self.path, std::io::Error::other(e))
        })?;

        let tmp_path = self.temp_path();
        let tmp_guard = TempFileGuard::new(&tmp_path);

        if let Err(e) = self.write_temp(&tmp_path, &json).await {
            tracing::error!(path = ?tmp_path, error = %e, "Failed to write temporary task file");
            return Err(StoreError::io(&tmp_path, e));
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            tracing::error!(
                from = ?tmp_path,
                to = ?self.path,
                error = %e,
                "Failed to atomically rename task file"
            );
            return Err(StoreError::io(&self.path, e));
        }
        tmp_guard.disarm();

        tracing::debug!(path = ?self.path, records = records.len(), "Persisted task file");
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
