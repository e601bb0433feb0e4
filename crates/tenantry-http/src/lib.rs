//! # Tenantry HTTP
//!
//! HTTP adapter for the Tenantry task store, built on Axum.
//!
//! ## Endpoints
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | `POST` | `/tasks` | Create a task for the calling tenant (201) |
//! | `GET` | `/tasks` | List the calling tenant's tasks (200) |
//! | `PUT` | `/tasks/{id}` | Replace a task's description (200 / 403 / 404) |
//! | `GET` | `/health` | Liveness probe, no tenant required |
//!
//! Every `/tasks` request must carry an `X-Tenant-ID` header. A missing
//! header is rejected with 400, a blocklisted tenant with 403.

pub mod runtime;

pub use runtime::*;
