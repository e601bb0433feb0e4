//! HTTP router configuration
//!
//! This module provides router setup and route registration for the HTTP runtime.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, put},
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::runtime::{
    config::ServerConfig,
    error::request_id_middleware,
    handlers::{create_task, health_check, list_tasks, update_task},
    state::AppState,
    tenant::require_tenant,
};

/// Create the Axum router with all endpoints and middleware
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    // Tenant-scoped routes
    let task_routes = Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", put(update_task))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_tenant,
        ));

    // Public routes - no tenant required
    let public_routes = Router::new().route("/health", get(health_check));

    let mut router = Router::new()
        .merge(public_routes)
        .merge(task_routes)
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}
