//! HTTP server setup for the `waf-gate` binary.
//!
//! # Responsibilities
//! - Create the Axum router with the demo echo handler
//! - Put the gate in front of every route
//! - Wire up tracing and request timeout layers
//! - Serve with peer addresses and graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{Method, Uri},
    middleware,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ListenerConfig;
use crate::gate::Gate;
use crate::http::middleware::gate_middleware;

/// Wrap any router so every request passes through the gate first.
pub fn protect(router: Router, gate: Arc<Gate>) -> Router {
    router.layer(middleware::from_fn_with_state(gate, gate_middleware))
}

/// Demo server: an echo handler behind the gate.
pub struct GateServer {
    router: Router,
}

impl GateServer {
    pub fn new(gate: Arc<Gate>, config: &ListenerConfig) -> Self {
        Self {
            router: Self::build_router(gate, config),
        }
    }

    #[allow(deprecated)]
    fn build_router(gate: Arc<Gate>, config: &ListenerConfig) -> Router {
        let app = Router::new()
            .route("/", any(echo_handler))
            .route("/{*path}", any(echo_handler));

        protect(app, gate)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn echo_handler(method: Method, uri: Uri) -> String {
    format!("{} {}", method, uri.path())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
