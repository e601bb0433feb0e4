use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tenantry_core::TaskRecord;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::NotifierConfig;
use crate::error::{NotificationError, NotificationResult};

/// Sink for newly created records.
#[async_trait]
pub trait RecordNotifier: Send + Sync {
    /// Announce `record` to the outside world.
    ///
    /// # Errors
    ///
    /// Returns a [`NotificationError`] if the announcement could not be
    /// delivered or was rejected.
    async fn notify_created(&self, record: &TaskRecord) -> NotificationResult<()>;
}

/// Notifier that only logs. Used when no remote service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl RecordNotifier for NoopNotifier {
    async fn notify_created(&self, record: &TaskRecord) -> NotificationResult<()> {
        debug!(id = %record.id(), "No notifier configured, skipping notification");
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddRecordPayload<'a> {
    user_id: &'a str,
    #[serde(rename = "passwordWS")]
    password_ws: &'a str,
    cabinet_id: &'a str,
    index_fields: [IndexField<'a>; 3],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexField<'a> {
    field_name: &'static str,
    field_value: std::borrow::Cow<'a, str>,
}

/// Posts created records to a document management service's `add-record`
/// endpoint.
///
/// Each call issues exactly one POST carrying the record's id, description
/// and creation timestamp as index fields, plus the configured credentials
/// and cabinet.
#[derive(Clone)]
pub struct HttpRecordNotifier {
    endpoint: Url,
    http: Client,
    config: NotifierConfig,
}

impl std::fmt::Debug for HttpRecordNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRecordNotifier")
            .field("endpoint", &self.endpoint.as_str())
            .field("config", &self.config)
            .finish()
    }
}

impl HttpRecordNotifier {
    /// Build a notifier from `config`.
    ///
    /// # Errors
    ///
    /// Fails if the base URL and path do not form a valid URL or the HTTP
    /// client cannot be constructed.
    pub fn new(config: NotifierConfig) -> NotificationResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("tenantry/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(NotificationError::ClientBuild)?;
        Self::with_http_client(config, http)
    }

    /// Build a notifier around an existing HTTP client.
    ///
    /// # Errors
    ///
    /// Fails if the base URL and path do not form a valid URL.
    pub fn with_http_client(config: NotifierConfig, http: Client) -> NotificationResult<Self> {
        let endpoint = Url::parse(&config.base_url)?.join(&config.path)?;
        Ok(Self {
            endpoint,
            http,
            config,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn payload<'a>(&'a self, record: &'a TaskRecord) -> AddRecordPayload<'a> {
        AddRecordPayload {
            user_id: &self.config.user,
            password_ws: &self.config.password,
            cabinet_id: &self.config.cabinet_id,
            index_fields: [
                IndexField {
                    field_name: "TASK_ID",
                    field_value: record.id().as_str().into(),
                },
                IndexField {
                    field_name: "TASK_DESCRIPTION",
                    field_value: record.description().as_str().into(),
                },
                IndexField {
                    field_name: "CREATION_DATE",
                    field_value: record.created_at().to_rfc3339().into(),
                },
            ],
        }
    }
}

#[async_trait]
impl RecordNotifier for HttpRecordNotifier {
    async fn notify_created(&self, record: &TaskRecord) -> NotificationResult<()> {
        debug!(endpoint = %self.endpoint, id = %record.id(), "Sending record notification");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&self.payload(record))
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, id = %record.id(), error = %e, "Notification transport failed");
                NotificationError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                endpoint = %self.endpoint,
                id = %record.id(),
                status = status.as_u16(),
                "Notification rejected by remote service"
            );
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(id = %record.id(), "Record notification delivered");
        Ok(())
    }
}
