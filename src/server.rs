//! HTTP server initialization and runtime setup.
//!
//! Handles store connections, service wiring, and the Axum server lifecycle.

use crate::application::services::{LinkService, RateLimitService};
use crate::config::Config;
use crate::infrastructure::store::{KeyValueStore, Namespace, RedisStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - One Redis connection per namespace (links, counters)
/// - Link and rate-limit services
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Redis is unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let links: Arc<dyn KeyValueStore> = Arc::new(
        RedisStore::connect(&config.redis_url(Namespace::Links)?, Namespace::Links)
            .await
            .context("Failed to connect to Redis (links)")?,
    );
    let counters: Arc<dyn KeyValueStore> = Arc::new(
        RedisStore::connect(&config.redis_url(Namespace::Counters)?, Namespace::Counters)
            .await
            .context("Failed to connect to Redis (counters)")?,
    );

    let link_service = Arc::new(LinkService::new(
        links,
        Arc::clone(&counters),
        config.domain.clone(),
    ));
    let rate_limit_service = Arc::new(RateLimitService::new(counters, config.api_quota));

    let state = AppState::new(link_service, rate_limit_service, config.behind_proxy);

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
