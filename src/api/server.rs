use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tracing::{error, info};

use super::{
    services::{health, invoke, metrics},
    state::AppState,
};
use crate::config::Config;
use crate::fetch::{HttpConfig, HttpFetcher};
use crate::pipeline::GetObjectHandler;
use crate::request::DefaultRequestValidator;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Wire the pipeline from configuration
pub fn build_handler(config: &Config) -> Result<GetObjectHandler, AnyError> {
    let registry = config.transformer_registry();
    config.ensure_transformer(&registry)?;
    let transformer = registry.get(&config.transform.transformer)?;

    let fetcher = HttpFetcher::new(HttpConfig::from(&config.fetch))?;

    Ok(GetObjectHandler::new(
        Arc::new(DefaultRequestValidator),
        Arc::new(fetcher),
        transformer,
    ))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/invoke", post(invoke))
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .with_state(state)
        // Handles Content-Encoding on the invocation body
        .layer(RequestDecompressionLayer::new())
}

pub async fn run(config: Config, address: SocketAddr) -> Result<(), AnyError> {
    let handler = build_handler(&config)?;
    info!(
        transformer = %config.transform.transformer,
        part_size = %config.transform.part_size,
        "Pipeline ready"
    );

    let app = router(AppState::new(config, handler));

    let listener = TcpListener::bind(address).await?;
    info!(%address, "transformbox listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
