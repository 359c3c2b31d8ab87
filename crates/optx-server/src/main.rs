//! # optx-server: HTTP Service for Join Hypergraph Inspection
//!
//! This binary crate exposes the join hypergraph builder as a network service.
//! The coordinator posts a join graph, the server builds and seals the
//! hypergraph exactly as the join enumerator would, and returns every node's
//! simple neighborhood and edge lists.
//!
//! ## Endpoints
//!
//! - `GET  /health`      - Health check
//! - `POST /hypergraph`  - Build a hypergraph from join-graph JSON and describe it
//!
//! ## Configuration
//!
//! The listen address and graph limits come from `OPTX_*` environment
//! variables (see `state`). Logging is controlled by the `RUST_LOG`
//! environment variable (defaults to `optx=debug`).

mod join_graph;
mod routes;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("optx=debug".parse()?))
        .init();

    let config = state::ServerConfig::from_env();
    let listen_addr = config.listen_addr.clone();
    let state = Arc::new(state::AppState::new(config));

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/hypergraph", post(join_graph::inspect_hypergraph))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(listen_addr.as_str()).await?;
    tracing::info!("optx-server listening on http://{}", listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
