// ABOUTME: HTTP server assembly: /api router, health probes, static photos and transport layers
// ABOUTME: Binds the configured address and serves until ctrl-c or SIGTERM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use crate::config::{ServerConfig, StorageBackend};
use crate::constants::network::{API_PREFIX, REQUEST_TIMEOUT_SECS};
use crate::constants::storage::LOCAL_PHOTO_ROUTE;
use crate::middleware::{
    propagate_request_id_layer, set_request_id_layer, setup_cors, trace_layer,
};
use crate::resources::ServerResources;
use crate::routes::{api_routes, HealthRoutes};

/// Build the complete application router
///
/// The request timeout is never shorter than the generation timeout, so a slow
/// generative backend still resolves to the fallback plan instead of a 408.
pub fn build_app(resources: &Arc<ServerResources>, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .nest(API_PREFIX, api_routes(resources))
        .merge(HealthRoutes::routes(resources.clone()));

    if config.storage.backend == StorageBackend::Local {
        app = app.nest_service(
            LOCAL_PHOTO_ROUTE,
            ServeDir::new(&config.storage.local_dir),
        );
    }

    let request_timeout = config
        .llm
        .timeout
        .max(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .saturating_add(Duration::from_secs(REQUEST_TIMEOUT_SECS));

    // Layers run bottom-up: the request id must exist before the trace span reads it
    app.layer(TimeoutLayer::new(request_timeout))
        .layer(setup_cors(config))
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(set_request_id_layer())
}

/// Serve the application until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the listen address cannot be bound or the server fails
pub async fn run(config: ServerConfig) -> Result<()> {
    let resources = Arc::new(
        ServerResources::from_config(&config)
            .await
            .context("Failed to initialise server resources")?,
    );
    let app = build_app(&resources, &config);

    let address = format!("{}:{}", config.host, config.http_port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!("Listening on http://{address}{API_PREFIX}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    resources.database.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}
