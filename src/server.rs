//! Server startup and shutdown logic.
//!
//! This module contains the `run_server` function which handles:
//! - CORS registry construction
//! - Router creation
//! - Server binding and graceful shutdown

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::routes;
use crate::web_config;
use tokio::net::TcpListener;
use tracing::info;

/// Run the web server with the given configuration.
///
/// The CORS registry is built once here and handed to the router; it is
/// never modified afterwards.
///
/// # Errors
///
/// This function will return an error if:
/// - The CORS policy or its path pattern is invalid
/// - Server binding fails
/// - Server runtime error occurs
pub async fn run_server(config: Config) -> AppResult<()> {
    info!("Starting apicors server...");

    let cors_registry = web_config::cors_registry()?;
    let app = routes::create_router(cors_registry);

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(create_shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or on SIGTERM where the platform has it.
///
/// # Panics
///
/// If the signal handlers cannot be installed.
async fn create_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}
