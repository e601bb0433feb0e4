//! Shared application state

use std::{collections::HashSet, sync::Arc};

use tenantry_core::TenantId;
use tenantry_notify::{HttpRecordNotifier, NoopNotifier, NotificationError, RecordNotifier};
use tenantry_store::{JsonFileStore, TaskStore};

use crate::runtime::config::ServerConfig;

/// State shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TaskStore>,
    pub notifier: Arc<dyn RecordNotifier>,
    blocked_tenants: Arc<HashSet<String>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("blocked_tenants", &self.blocked_tenants)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(store: TaskStore, notifier: impl RecordNotifier + 'static) -> Self {
        Self {
            store: Arc::new(store),
            notifier: Arc::new(notifier),
            blocked_tenants: Arc::new(HashSet::new()),
        }
    }

    #[must_use]
    pub fn with_blocked_tenants<I, S>(mut self, tenants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocked_tenants = Arc::new(tenants.into_iter().map(Into::into).collect());
        self
    }

    /// Build state for a configured server: a JSON file store at
    /// `tasks_file`, and an HTTP notifier if one is configured.
    ///
    /// # Errors
    ///
    /// Returns a [`NotificationError`] if the notifier URL is invalid or
    /// its HTTP client cannot be built.
    pub fn from_config(config: &ServerConfig) -> Result<Self, NotificationError> {
        let mut store = TaskStore::new(JsonFileStore::new(config.tasks_file.clone()));
        if let Some(timeout) = config.lock_timeout {
            store = store.with_lock_timeout(timeout);
        }

        let state = match &config.notifier {
            Some(notifier_config) => {
                let notifier = HttpRecordNotifier::new(notifier_config.clone())?;
                tracing::info!(endpoint = %notifier.endpoint(), "Record notification enabled");
                Self::new(store, notifier)
            }
            None => Self::new(store, NoopNotifier),
        };

        Ok(state.with_blocked_tenants(config.blocked_tenants.iter().cloned()))
    }

    /// Blocklist match is exact and case-sensitive.
    pub fn is_blocked(&self, tenant: &TenantId) -> bool {
        self.blocked_tenants.contains(tenant.as_str())
    }
}
