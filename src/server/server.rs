//! Advisor HTTP server with axum router and graceful shutdown.

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{delete_messages, get_documents, get_messages, post_chat, post_scan};
use super::state::AppState;
use crate::config::ServerConfig;

/// HTTP server exposing the advisor API.
pub struct AdvisorServer {
    config: ServerConfig,
    state: AppState,
}

impl AdvisorServer {
    /// Create a server with default configuration.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            config: ServerConfig::default(),
            state,
        }
    }

    /// Set the server configuration (builder pattern).
    #[must_use]
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the configured address as a string.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the axum router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        let router = Router::new()
            .route("/api/scan", post(post_scan))
            .route("/api/documents", get(get_documents))
            .route("/api/messages", get(get_messages).delete(delete_messages))
            .route("/api/chat", post(post_chat))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.cors_permissive {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Run the server until the state's cancellation token fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or serve.
    pub async fn run(self) -> std::io::Result<()> {
        let addr = self.address();
        let cancel = self.state.cancel.clone();
        let app = self.build_router();

        tracing::info!(address = %addr, "Starting advisor server");

        let listener = TcpListener::bind(&addr).await?;

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel.cancelled().await;
                tracing::info!("Advisor server shutting down gracefully");
            })
            .await
    }
}
