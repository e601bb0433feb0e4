//! # Tenantry
//!
//! Multi-tenant task list over a single JSON file, served over HTTP.
//!
//! This crate re-exports the workspace members:
//!
//! - [`tenantry_core`]: task records, identifiers, validation and error types
//! - [`tenantry_store`]: the tenant-aware [`TaskStore`] and its persistence backends
//! - [`tenantry_notify`]: outbound announcement of newly created records
//! - [`tenantry_http`]: the Axum router, middleware and server loop

pub use tenantry_core;
pub use tenantry_http;
pub use tenantry_notify;
pub use tenantry_store;

pub use tenantry_core::{Description, TaskId, TaskRecord, TenantId, UpdateOutcome};
pub use tenantry_store::{JsonFileStore, TaskStore};
