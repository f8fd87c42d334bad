//! Routes and the server loop.

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use studio_core::{Error, Result};

use crate::handlers;
use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(handlers::generate))
        .route("/api/preview", post(handlers::preview))
        .route("/api/posts", get(handlers::posts))
        .route("/api/posts/{slug}", get(handlers::post))
        .route("/api/categories", get(handlers::categories))
        .route("/api/contact", post(handlers::contact))
        .route("/api/newsletter", post(handlers::newsletter))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Cannot bind {addr}: {e}")))?;
    tracing::info!(%addr, "Content Studio listening");
    serve_listener(listener, state).await
}

/// Serve on an already bound listener until Ctrl-C.
pub async fn serve_listener(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::io)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
