//! Error handling for the HTTP adapter
//!
//! Maps store outcomes and failures to HTTP status codes and structured
//! JSON bodies, and tags every request with a request id so client-visible
//! errors can be matched to server logs.

use axum::{
    extract::{FromRequestParts, Request},
    http::{
        StatusCode,
        header::{self, HeaderValue},
        request::Parts,
    },
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use tenantry_core::{StoreError, TaskId, TenantId, ValidationError};
use tenantry_notify::NotificationError;

/// Maximum length for client-provided request IDs
const MAX_REQUEST_ID_LENGTH: usize = 128;

/// Correlation id attached to every request and every error body.
///
/// Handlers can take it as an extractor; it is read from the request
/// extensions populated by [`request_id_middleware`], or generated if the
/// middleware is not installed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Accept a client-supplied id if it is short and made only of
    /// alphanumerics, hyphens and underscores.
    pub fn parse(s: &str) -> Option<Self> {
        let valid = !s.is_empty()
            && s.len() <= MAX_REQUEST_ID_LENGTH
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(RequestId::generate))
    }
}

/// Middleware that generates or extracts request IDs
///
/// - Reuses a valid `X-Request-ID` header from the client
/// - Generates a new UUID otherwise
/// - Stores the ID in request extensions for handlers and middleware
/// - Echoes the ID in the response `X-Request-ID` header
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .and_then(RequestId::parse)
        .unwrap_or_else(RequestId::generate);

    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(
            header::HeaderName::from_static("x-request-id"),
            header_value,
        );
    }

    response
}

/// Type-safe error codes for API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Tenant header absent or blank
    MissingTenant,
    /// Tenant on the blocklist
    ForbiddenTenant,
    /// Request body failed validation
    InvalidInput,
    /// Request body exceeded the size limit
    PayloadTooLarge,
    /// No task with the requested id
    TaskNotFound,
    /// Task belongs to another tenant
    TaskNotOwned,
    /// Backing storage failed
    StorageError,
    /// Store busy past the lock timeout
    ServiceUnavailable,
    /// Task stored but the outbound notification failed
    NotificationFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingTenant => "missing_tenant",
            Self::ForbiddenTenant => "forbidden_tenant",
            Self::InvalidInput => "invalid_input",
            Self::PayloadTooLarge => "payload_too_large",
            Self::TaskNotFound => "task_not_found",
            Self::TaskNotOwned => "task_not_owned",
            Self::StorageError => "storage_error",
            Self::ServiceUnavailable => "service_unavailable",
            Self::NotificationFailed => "notification_failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error response for HTTP APIs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Request ID for tracking and debugging
    pub request_id: RequestId,
}

/// What went wrong while serving a request.
#[derive(Debug, thiserror::Error)]
pub enum ApiErrorKind {
    #[error("missing {} header", crate::runtime::tenant::TENANT_HEADER)]
    MissingTenant,

    #[error("tenant '{0}' is blocked")]
    ForbiddenTenant(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("task {id} not owned by tenant {tenant}")]
    TaskNotOwned { id: TaskId, tenant: TenantId },

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("task {task_id} stored but notification failed: {source}")]
    Notification {
        task_id: TaskId,
        #[source]
        source: NotificationError,
    },
}

/// API error carrying the id of the request that produced it.
#[derive(Debug)]
pub struct ApiError {
    kind: ApiErrorKind,
    request_id: RequestId,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl From<ValidationError> for ApiErrorKind {
    fn from(err: ValidationError) -> Self {
        ApiErrorKind::InvalidInput(err.to_string())
    }
}

impl ApiError {
    pub fn new(kind: impl Into<ApiErrorKind>, request_id: RequestId) -> Self {
        Self {
            kind: kind.into(),
            request_id,
        }
    }

    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match &self.kind {
            ApiErrorKind::MissingTenant => StatusCode::BAD_REQUEST,
            ApiErrorKind::ForbiddenTenant(_) => StatusCode::FORBIDDEN,
            ApiErrorKind::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiErrorKind::TaskNotFound(_) => StatusCode::NOT_FOUND,
            ApiErrorKind::TaskNotOwned { .. } => StatusCode::FORBIDDEN,
            ApiErrorKind::Storage(StoreError::LockTimeout(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorKind::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorKind::Notification { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match &self.kind {
            ApiErrorKind::MissingTenant => ErrorCode::MissingTenant,
            ApiErrorKind::ForbiddenTenant(_) => ErrorCode::ForbiddenTenant,
            ApiErrorKind::InvalidInput(_) => ErrorCode::InvalidInput,
            ApiErrorKind::PayloadTooLarge => ErrorCode::PayloadTooLarge,
            ApiErrorKind::TaskNotFound(_) => ErrorCode::TaskNotFound,
            ApiErrorKind::TaskNotOwned { .. } => ErrorCode::TaskNotOwned,
            ApiErrorKind::Storage(StoreError::LockTimeout(_)) => ErrorCode::ServiceUnavailable,
            ApiErrorKind::Storage(_) => ErrorCode::StorageError,
            ApiErrorKind::Notification { .. } => ErrorCode::NotificationFailed,
        }
    }

    /// Convert this error into a structured error response
    ///
    /// Storage and notification failures get generic messages; their
    /// underlying causes (paths, remote bodies) are only logged.
    pub fn to_error_response(&self) -> ErrorResponse {
        let (message, details) = match &self.kind {
            ApiErrorKind::MissingTenant => (
                format!(
                    "Missing {} header, please provide a tenant ID in the request headers.",
                    crate::runtime::tenant::TENANT_HEADER
                ),
                None,
            ),
            ApiErrorKind::ForbiddenTenant(_) => ("Forbidden tenant ID.".to_string(), None),
            ApiErrorKind::InvalidInput(reason) => (
                "Description is required in a JSON format.".to_string(),
                Some(serde_json::json!({ "reason": reason })),
            ),
            ApiErrorKind::PayloadTooLarge => ("Request body is too large.".to_string(), None),
            ApiErrorKind::TaskNotFound(id) => (format!("Task with ID {id} not found."), None),
            ApiErrorKind::TaskNotOwned { id, tenant } => (
                format!("Task with ID {id} not owned by tenant {tenant}."),
                None,
            ),
            ApiErrorKind::Storage(StoreError::LockTimeout(_)) => (
                "The task store is busy, please retry.".to_string(),
                None,
            ),
            ApiErrorKind::Storage(_) => ("Internal storage error.".to_string(), None),
            ApiErrorKind::Notification { task_id, .. } => (
                "Task was stored but the document service notification failed.".to_string(),
                Some(serde_json::json!({ "task_id": task_id })),
            ),
        };

        ErrorResponse {
            error: self.error_code().as_str().to_string(),
            message,
            details,
            request_id: self.request_id.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(
                error_code = %self.error_code(),
                request_id = %self.request_id,
                status_code = %status_code,
                error_message = %self,
                "Request failed"
            );
        } else {
            tracing::debug!(
                error_code = %self.error_code(),
                request_id = %self.request_id,
                status_code = %status_code,
                "Request rejected"
            );
        }

        (status_code, Json(self.to_error_response())).into_response()
    }
}
