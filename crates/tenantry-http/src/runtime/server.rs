//! Server startup

use std::net::SocketAddr;

use tenantry_notify::NotificationError;
use tokio::net::TcpListener;

use crate::runtime::{
    config::ServerConfig, router::router, shutdown::shutdown_signal, state::AppState,
};

/// Errors that stop the server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to set up record notifier: {0}")]
    Notifier(#[from] NotificationError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bind `config.bind_addr` and serve until a shutdown signal arrives
///
/// # Errors
///
/// Returns [`ServerError`] if state cannot be built, the address cannot be
/// bound, or the server loop fails.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let state = AppState::from_config(&config)?;
    let app = router(state, &config);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind_addr,
            source,
        })?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        tasks_file = %config.tasks_file.display(),
        blocked_tenants = config.blocked_tenants.len(),
        "Tenantry HTTP server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server shut down");
    Ok(())
}
