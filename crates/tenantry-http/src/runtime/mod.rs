//! # Runtime Module
//!
//! Wiring between HTTP and the task store: configuration, application
//! state, middleware, handlers and the server loop.
//!
//! ## Usage Pattern
//!
//! ```rust,no_run
//! use tenantry_http::runtime::{ServerConfigBuilder, serve};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfigBuilder::from_env()?.build()?;
//!     serve(config).await?;
//!     Ok(())
//! }
//! ```

/// Environment-based server configuration.
pub mod config;
/// Error responses and request-id middleware.
pub mod error;
/// HTTP request handlers organized by functionality.
pub mod handlers;
/// Router configuration and route registration.
pub mod router;
/// Server startup.
pub mod server;
/// Graceful shutdown signal handling.
pub mod shutdown;
/// Shared application state.
pub mod state;
/// Tenant header extraction and blocklist middleware.
pub mod tenant;
/// Request and response bodies.
pub mod types;

pub use config::{ConfigError, ServerConfig, ServerConfigBuilder};
pub use error::{ApiError, ApiErrorKind, ErrorCode, ErrorResponse, RequestId};
pub use router::router;
pub use server::{ServerError, serve};
pub use shutdown::shutdown_signal;
pub use state::AppState;
pub use tenant::{CallerTenant, TENANT_HEADER};
