// src/handlers/health.rs

use axum::{Json, response::IntoResponse};
use chrono::Utc;
use serde_json::json;

/// Liveness check. Does not touch the database.
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "Server is running",
        "timestamp": Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
