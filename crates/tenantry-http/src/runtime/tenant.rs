//! # Tenant Resolution
//!
//! Every `/tasks` request names its tenant in the `X-Tenant-ID` header.
//! [`require_tenant`] validates the header before any handler runs and
//! stores the parsed [`TenantId`] in the request extensions, where the
//! [`CallerTenant`] extractor picks it up.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tenantry_core::TenantId;

use crate::runtime::{
    error::{ApiError, ApiErrorKind, RequestId},
    state::AppState,
};

/// Header carrying the caller's tenant id
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// Middleware that rejects requests without a usable tenant
///
/// - Missing, non-UTF-8 or blank header: 400 `missing_tenant`
/// - Tenant on the configured blocklist: 403 `forbidden_tenant`
pub async fn require_tenant(
    State(state): State<AppState>,
    request_id: RequestId,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(tenant) = tenant_from_headers(request.headers()) else {
        tracing::debug!(request_id = %request_id, "Request without tenant header");
        return ApiError::new(ApiErrorKind::MissingTenant, request_id).into_response();
    };

    if state.is_blocked(&tenant) {
        tracing::warn!(
            request_id = %request_id,
            tenant = %tenant,
            "Rejected request from blocked tenant"
        );
        return ApiError::new(
            ApiErrorKind::ForbiddenTenant(tenant.to_string()),
            request_id,
        )
        .into_response();
    }

    request.extensions_mut().insert(tenant);
    next.run(request).await
}

fn tenant_from_headers(headers: &HeaderMap) -> Option<TenantId> {
    headers
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| TenantId::parse(raw).ok())
}

/// Tenant of the current request, as validated by [`require_tenant`]
#[derive(Debug, Clone)]
pub struct CallerTenant(pub TenantId);

impl<S: Send + Sync> FromRequestParts<S> for CallerTenant {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(tenant) = parts.extensions.get::<TenantId>() {
            return Ok(Self(tenant.clone()));
        }

        // Route mounted without the middleware: fall back to the raw header.
        match tenant_from_headers(&parts.headers) {
            Some(tenant) => Ok(Self(tenant)),
            None => {
                let Ok(request_id) = RequestId::from_request_parts(parts, state).await;
                Err(ApiError::new(ApiErrorKind::MissingTenant, request_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_tenant_from_headers() {
        let mut headers = HeaderMap::new();
        assert!(tenant_from_headers(&headers).is_none());

        headers.insert(TENANT_HEADER, HeaderValue::from_static("   "));
        assert!(tenant_from_headers(&headers).is_none());

        headers.insert(TENANT_HEADER, HeaderValue::from_static("T1"));
        assert_eq!(tenant_from_headers(&headers).unwrap().as_str(), "T1");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("x-tenant-id", HeaderValue::from_static("acme"));
        assert_eq!(tenant_from_headers(&headers).unwrap().as_str(), "acme");
    }
}
