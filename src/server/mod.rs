//! HTTP server for the upload form.
//!
//! Axum-based; one route renders the form (GET) and analyses a batch of
//! uploads (POST). The [`Analyzer`] is shared read-only across requests.

pub mod handlers;
pub mod page;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::analyze::Analyzer;
use crate::config::ServerConfig;
use crate::error::RecurioError;

pub use handlers::AppState;
pub use routes::create_router;

/// Build the application router around an analyzer.
pub fn app(analyzer: Arc<Analyzer>) -> axum::Router {
    let max_upload_bytes = analyzer.config().max_upload_bytes;
    create_router(AppState { analyzer }, max_upload_bytes)
}

/// Bind and serve until `shutdown` resolves.
pub async fn serve<F>(
    config: &ServerConfig,
    analyzer: Arc<Analyzer>,
    shutdown: F,
) -> Result<(), RecurioError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = config.listen_addr.parse().map_err(|e| {
        RecurioError::InvalidConfig(format!(
            "Invalid listen address '{}': {e}",
            config.listen_addr
        ))
    })?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| RecurioError::ServerBind {
            addr: config.listen_addr.clone(),
            source,
        })?;

    info!("Recurio listening on http://{}", addr);

    axum::serve(listener, app(analyzer))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(RecurioError::Server)?;

    info!("HTTP server shut down");
    Ok(())
}
