//! HTTP application shell
//!
//! Serves the discovery root, `/health`, the API reference, and whatever
//! routers the caller mounts. Mounted routers share [`AppState`] and reach the
//! document store through it.
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::extract::State;
//! use axum::routing::get;
//! use axum::{Json, Router};
//! use holly_api::api::{self, AppState};
//! use holly_api::config::ApplicationConfig;
//! use holly_api::core::{ContainerName, DocumentStore};
//! use serde_json::Value;
//! use std::sync::Arc;
//!
//! async fn profile(State(state): State<AppState>) -> Result<Json<Option<Value>>, holly_api::domain::ApiError> {
//!     let doc = state.store.read_item(ContainerName::Profiles, "u1", "u1").await?;
//!     Ok(Json(doc))
//! }
//!
//! # fn example() -> holly_api::domain::Result<()> {
//! let store = Arc::new(DocumentStore::disconnected()?);
//! let state = AppState::new(store, ApplicationConfig::default());
//! let routes = Router::new().route("/profiles/u1", get(profile));
//! let app = api::app(state, routes);
//! # Ok(())
//! # }
//! ```

pub mod docs;
pub mod error;
pub mod handlers;
pub mod state;

pub use state::AppState;

use crate::config::ServerConfig;
use crate::domain::{ApiError, Result};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Build the application router
///
/// `routes` is merged at the root, so it should carry its own path prefixes.
pub fn app(state: AppState, routes: Router<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/docs", get(docs::scalar))
        .route(docs::OPENAPI_PATH, get(docs::openapi))
        .merge(routes)
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Bind the configured address and serve until shutdown
///
/// # Errors
///
/// Returns [`ApiError::Server`] if the address cannot be bound or the server
/// fails.
pub async fn serve(config: &ServerConfig, app: Router, shutdown: watch::Receiver<bool>) -> Result<()> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| ApiError::Server(format!("Failed to bind {address}: {e}")))?;

    serve_listener(listener, app, shutdown).await
}

/// Serve on an already bound listener until `shutdown` turns `true`
///
/// In-flight requests are drained before returning.
///
/// # Errors
///
/// Returns [`ApiError::Server`] if the server fails.
pub async fn serve_listener(
    listener: TcpListener,
    app: Router,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let address = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    tracing::info!(address = %address, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .map_err(|e| ApiError::Server(format!("HTTP server error: {e}")))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal(mut shutdown: watch::Receiver<bool>) {
    // A dropped sender can no longer signal shutdown; keep serving
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
