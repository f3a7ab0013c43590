//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router answering every method and path
//! - Wire up middleware (tracing, request timeout)
//! - Serve the status page from the watcher's last published snapshot
//! - Drain gracefully on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::Method,
    response::Html,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::http::page::StatusPage;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::watcher::StatusReader;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub status: StatusReader,
    pub page: Arc<StatusPage>,
}

/// HTTP server for the status page.
pub struct StatusServer {
    router: Router,
}

impl StatusServer {
    /// Create a server reading from `status`.
    pub fn new(status: StatusReader, page: StatusPage, request_timeout: Duration) -> Self {
        let state = AppState {
            status,
            page: Arc::new(page),
        };

        Self {
            router: Self::build_router(state, request_timeout),
        }
    }

    #[allow(deprecated)]
    fn build_router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/{*path}", any(status_handler))
            .route("/", any(status_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `stop` fires, then drain open connections.
    pub async fn run(
        self,
        listener: TcpListener,
        mut stop: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown::recv(&mut stop).await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Answers every request from the cached status.
async fn status_handler(State(state): State<AppState>, method: Method) -> Html<String> {
    let snapshot = state.status.snapshot();
    metrics::record_page_hit();

    tracing::debug!(
        method = %method,
        state = ?snapshot.state,
        probes = snapshot.probes,
        last_error = ?snapshot.last_error,
        "Serving status page"
    );

    Html(state.page.render(snapshot.is_tagged()))
}
