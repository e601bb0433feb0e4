//! Task HTTP handlers
//!
//! All handlers here sit behind [`require_tenant`](crate::runtime::tenant::require_tenant)
//! and only ever see the caller's own tasks.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
};
use tenantry_core::{Description, TaskId, TaskRecord, UpdateOutcome};

use crate::runtime::{
    error::{ApiError, ApiErrorKind, RequestId},
    state::AppState,
    tenant::CallerTenant,
    types::TaskBody,
};

/// Validate a task body into a [`Description`].
fn description_from(
    body: Result<Json<TaskBody>, JsonRejection>,
    request_id: &RequestId,
) -> Result<Description, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        let kind = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiErrorKind::PayloadTooLarge
        } else {
            ApiErrorKind::InvalidInput(rejection.body_text())
        };
        ApiError::new(kind, request_id.clone())
    })?;

    let text = body.description.ok_or_else(|| {
        ApiError::new(
            ApiErrorKind::InvalidInput("description is missing".to_string()),
            request_id.clone(),
        )
    })?;

    Description::parse(text).map_err(|e| ApiError::new(e, request_id.clone()))
}

/// POST /tasks - Create a task owned by the calling tenant
///
/// Responds 201 with the stored record and a `Location` header. The record
/// is announced to the notifier only after it has been persisted; a failed
/// announcement yields 502 but the record stays stored.
pub async fn create_task(
    State(state): State<AppState>,
    request_id: RequestId,
    CallerTenant(tenant): CallerTenant,
    body: Result<Json<TaskBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let description = description_from(body, &request_id)?;

    let record = state
        .store
        .add(description, tenant)
        .await
        .map_err(|e| ApiError::new(e, request_id.clone()))?;

    tracing::info!(
        request_id = %request_id,
        tenant = %record.tenant_id(),
        id = %record.id(),
        "Task created"
    );

    if let Err(source) = state.notifier.notify_created(&record).await {
        return Err(ApiError::new(
            ApiErrorKind::Notification {
                task_id: record.id().clone(),
                source,
            },
            request_id,
        ));
    }

    let location = format!("/tasks/{}", record.id());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record),
    ))
}

/// GET /tasks - List the calling tenant's tasks in insertion order
pub async fn list_tasks(
    State(state): State<AppState>,
    request_id: RequestId,
    CallerTenant(tenant): CallerTenant,
) -> Result<Json<Vec<TaskRecord>>, ApiError> {
    let tasks = state
        .store
        .list_by_tenant(&tenant)
        .await
        .map_err(|e| ApiError::new(e, request_id))?;

    Ok(Json(tasks))
}

/// PUT /tasks/{id} - Replace a task's description
///
/// Existence is checked before ownership: an unknown id is 404 for every
/// tenant, a task owned by someone else is 403.
pub async fn update_task(
    State(state): State<AppState>,
    request_id: RequestId,
    CallerTenant(tenant): CallerTenant,
    Path(id): Path<String>,
    body: Result<Json<TaskBody>, JsonRejection>,
) -> Result<Json<TaskRecord>, ApiError> {
    let description = description_from(body, &request_id)?;
    let id = TaskId::new(id);

    let outcome = state
        .store
        .update(&tenant, &id, description)
        .await
        .map_err(|e| ApiError::new(e, request_id.clone()))?;

    tracing::info!(
        request_id = %request_id,
        tenant = %tenant,
        id = %id,
        outcome = outcome.as_str(),
        "Task update processed"
    );

    match outcome {
        UpdateOutcome::Updated(record) => Ok(Json(record)),
        UpdateOutcome::NotFound => Err(ApiError::new(ApiErrorKind::TaskNotFound(id), request_id)),
        UpdateOutcome::NotOwned => Err(ApiError::new(
            ApiErrorKind::TaskNotOwned { id, tenant },
            request_id,
        )),
    }
}
