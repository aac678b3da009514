use axum::Json;
use serde_json::{json, Value};

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// GET /
/// Service banner with the running version.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "ResumeAI API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/health"
    }))
}
