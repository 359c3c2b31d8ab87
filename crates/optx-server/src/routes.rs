//! # HTTP Route Handlers
//!
//! Service-level routes. The hypergraph endpoint lives in `join_graph`.

use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}
