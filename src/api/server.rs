//! Painel HTTP server implementation
//!
//! Serves the interactive dashboard page plus a small JSON API using Axum.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::config::PainelConfig;
use crate::excel::WorkbookCache;

/// Server bind configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Shared application state
///
/// The workbook cache lives here, so it is scoped to this server process and
/// revalidated against the file's modification time on every request.
pub struct AppState {
    pub version: String,
    pub config: PainelConfig,
    pub cache: WorkbookCache,
}

impl AppState {
    pub fn new(config: PainelConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            cache: WorkbookCache::new(),
        }
    }
}

/// Build the router (separate from [`run_api_server`] so it can be driven in tests)
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Dashboard
        .route("/", get(handlers::dashboard))
        .route("/logo", get(handlers::logo))
        // Health and info endpoints
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // JSON API
        .route("/api/v1/report", get(handlers::report))
        .route("/api/v1/cities", get(handlers::cities))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the dashboard server until Ctrl+C / SIGTERM
pub async fn run_api_server(config: ApiConfig, painel: PainelConfig) -> anyhow::Result<()> {
    info!(
        workbook = %painel.workbook.display(),
        profile = %painel.profile.name,
        "starting painel server"
    );

    // Fail fast on an unreadable workbook; requests would all error anyway
    let state = Arc::new(AppState::new(painel));
    crate::report::load_sheets(&state.cache, &state.config)?;

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Painel listening on http://{}", addr);
    info!("   Endpoints: /, /logo, /api/v1/report, /api/v1/cities");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Painel server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received, stopping server...");
}
