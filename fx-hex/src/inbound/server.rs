//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use fx_types::{HistoryStore, RateProvider};

use super::handlers::{self, AppState};
use crate::ConversionService;

/// HTTP Server for the FX converter API.
pub struct HttpServer<P: RateProvider, S: HistoryStore> {
    state: Arc<AppState<P, S>>,
}

impl<P: RateProvider, S: HistoryStore> HttpServer<P, S> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: ConversionService<P, S>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/rates", get(handlers::get_rates::<P, S>))
            .route("/api/convert", post(handlers::convert_currency::<P, S>))
            .route("/api/history", get(handlers::list_history::<P, S>))
            .route("/api/history", post(handlers::create_record::<P, S>))
            .route("/api/history/{id}", get(handlers::get_record::<P, S>))
            .route("/api/history/{id}", put(handlers::update_record::<P, S>))
            .route(
                "/api/history/{id}",
                delete(handlers::delete_record::<P, S>),
            )
            // The original surface is consumed from browsers; mirror its
            // wide-open CORS policy.
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
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

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
