//! HTTP server startup logic.
//!
//! Plain HTTP only; TLS termination belongs to the fronting proxy in the
//! deployments this service targets. Connection info is threaded through so
//! the rate limiter can key on the client address.

use std::net::SocketAddr;

use axum::Router;

use crate::config::AppConfig;
use crate::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Invalid listen address: {0}")]
    Addr(String),
}

/// Start the HTTP server and block until it shuts down.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .map_err(|e| ServerError::Addr(format!("Invalid http.host or http.port: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Starting HTTP server");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown::shutdown_signal())
    .await?;

    Ok(())
}
